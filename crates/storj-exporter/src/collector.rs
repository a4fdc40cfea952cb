//! Per-scrape collection pass.
//!
//! [`StorjCollector::collect`] walks the node API in a fixed order:
//!
//! 1. `sno/` summary: node info, disk space, bandwidth. Without it the
//!    scrape is empty.
//! 2. `sno/estimated-payout` (if `payout` is enabled): current month payout.
//! 3. `sno/satellite/{id}` for each listed satellite (if `sat` is enabled):
//!    daily egress/ingress sums and today's storage. A summary record is
//!    emitted per satellite either way.
//!
//! Any section whose data is missing is skipped; the rest of the pass
//! carries on. The collector holds no state between scrapes.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::client::{NODE_PATH, NodeApi, PAYOUT_PATH, satellite_path};
use crate::config::Collectors;
use crate::metrics::{
    MetricRecord, NODE_INFO, PAYOUT_CURRENT_MONTH, SAT_DAY_EGRESS, SAT_DAY_INGRESS,
    SAT_DAY_STORAGE, SAT_SUMMARY, TOTAL_BANDWIDTH, TOTAL_DISKSPACE,
};
use crate::snapshot::{NodeSnapshot, SatelliteSnapshot};
use crate::value::ValueExt;

/// Builds metric records from a node's operator API on demand.
#[derive(Clone)]
pub struct StorjCollector {
    api: Arc<dyn NodeApi>,
    collectors: Collectors,
}

impl StorjCollector {
    /// Create a collector reading from `api` with the given optional stages.
    pub fn new(api: Arc<dyn NodeApi>, collectors: Collectors) -> Self {
        Self { api, collectors }
    }

    #[must_use]
    pub fn collectors(&self) -> &Collectors {
        &self.collectors
    }

    /// Run one collection pass.
    ///
    /// Never fails: upstream errors only shrink the returned set, down to
    /// empty when the node summary itself is unavailable.
    pub async fn collect(&self) -> Vec<MetricRecord> {
        let Some(node) = self
            .api
            .fetch(NODE_PATH)
            .await
            .and_then(NodeSnapshot::from_value)
        else {
            debug!("Node summary unavailable, scrape is empty");
            return Vec::new();
        };

        let mut records: Vec<MetricRecord> = [
            NODE_INFO.flatten(node.identity(), &[]),
            TOTAL_DISKSPACE.flatten(node.disk_space(), &[]),
            TOTAL_BANDWIDTH.flatten(node.bandwidth(), &[]),
        ]
        .into_iter()
        .flatten()
        .collect();

        if self.collectors.payout {
            records.extend(self.payout_records().await);
        }

        records.extend(self.satellite_records(&node).await);

        debug!(records = records.len(), "Collection pass complete");
        records
    }

    async fn payout_records(&self) -> Option<MetricRecord> {
        let payout = self.api.fetch(PAYOUT_PATH).await?;
        PAYOUT_CURRENT_MONTH.flatten(payout.field("currentMonth"), &[])
    }

    async fn satellite_records(&self, node: &NodeSnapshot) -> Vec<MetricRecord> {
        let mut records = Vec::new();

        for listing in node.satellites() {
            let Some(id) = listing.field("id").as_str() else {
                debug!("Skipping satellite listing without id");
                continue;
            };

            let detail = if self.collectors.satellites {
                self.api.fetch(&satellite_path(id)).await
            } else {
                None
            };

            let Some(sat) = SatelliteSnapshot::new(listing, detail.as_ref()) else {
                continue;
            };
            let labels = sat.label_values();

            if self.collectors.satellites {
                records.extend(day_records(&sat, &labels));
            }
            records.extend(SAT_SUMMARY.flatten(sat.summary(), &labels));
        }

        records
    }
}

fn day_records(sat: &SatelliteSnapshot, labels: &[String]) -> Vec<MetricRecord> {
    let sources = [
        (sat.egress(), SAT_DAY_EGRESS),
        (sat.ingress(), SAT_DAY_INGRESS),
        (sat.storage_today(), SAT_DAY_STORAGE),
    ];
    sources
        .into_iter()
        .filter_map(|(source, spec)| spec.flatten(source, labels))
        .collect()
}
