//! Metric records and the flattening of JSON objects into them.
//!
//! Every metric the exporter emits is described by a static [`MetricSpec`]
//! in the catalogue below. Flattening a JSON object against a spec yields a
//! [`MetricRecord`]: one sample per requested key, labeled by that key plus
//! whatever label values the caller already knows (satellite id and URL).

use serde_json::Value;

use crate::value::ValueExt;

/// Kind of a metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Point-in-time numeric reading.
    Gauge,
    /// Bundle of string-valued descriptive fields.
    Info,
}

/// Value carried by a single sample.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    /// Gauge reading.
    Number(f64),
    /// Info field: the source key and its string form.
    Info { field: String, text: String },
}

/// One datapoint of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Values for the record's label names, in order.
    pub label_values: Vec<String>,
    /// Sample value
    pub value: SampleValue,
}

/// A flattened metric, ready for exposition.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// Metric name, stable across scrapes
    pub name: &'static str,
    /// Help text
    pub help: &'static str,
    /// Gauge or info
    pub kind: MetricKind,
    /// Label schema; the first label always carries the source key
    pub label_names: &'static [&'static str],
    /// Datapoints
    pub samples: Vec<Sample>,
}

impl MetricRecord {
    /// Numeric value of the sample whose first label is `key`.
    #[must_use]
    pub fn gauge(&self, key: &str) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.label_values.first().is_some_and(|k| k == key))
            .and_then(|s| match s.value {
                SampleValue::Number(v) => Some(v),
                SampleValue::Info { .. } => None,
            })
    }
}

/// Static description of a metric family and the source keys it reads.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub keys: &'static [&'static str],
    pub labels: &'static [&'static str],
}

impl MetricSpec {
    /// Flatten `source` into a record.
    ///
    /// Returns `None` when `source` is not a non-empty object. Gauge specs
    /// produce exactly one sample per key, substituting `0.0` for absent or
    /// non-numeric values. Info specs produce one sample per present,
    /// non-null key, and `None` if no key is present at all.
    ///
    /// Each sample is labeled `[key] + label_values`.
    #[must_use]
    pub fn flatten(&self, source: &Value, label_values: &[String]) -> Option<MetricRecord> {
        if !source.is_populated_object() {
            return None;
        }

        let labels_for = |key: &str| {
            let mut values = Vec::with_capacity(label_values.len() + 1);
            values.push(key.to_string());
            values.extend(label_values.iter().cloned());
            values
        };

        let samples: Vec<Sample> = match self.kind {
            MetricKind::Gauge => self
                .keys
                .iter()
                .map(|&key| Sample {
                    label_values: labels_for(key),
                    value: SampleValue::Number(source.field(key).gauge_value().unwrap_or(0.0)),
                })
                .collect(),
            MetricKind::Info => self
                .keys
                .iter()
                .filter_map(|&key| {
                    let text = source.field(key).info_text()?;
                    Some(Sample {
                        label_values: labels_for(key),
                        value: SampleValue::Info {
                            field: key.to_string(),
                            text,
                        },
                    })
                })
                .collect(),
        };

        if samples.is_empty() {
            return None;
        }

        Some(MetricRecord {
            name: self.name,
            help: self.help,
            kind: self.kind,
            label_names: self.labels,
            samples,
        })
    }
}

const NODE_LABELS: &[&str] = &["type"];
const SAT_LABELS: &[&str] = &["type", "satellite", "url"];

/// Node identity.
pub const NODE_INFO: MetricSpec = MetricSpec {
    name: "storj_node",
    help: "Storj node info",
    kind: MetricKind::Info,
    keys: &[
        "nodeID",
        "wallet",
        "lastPinged",
        "upToDate",
        "version",
        "allowedVersion",
        "startedAt",
    ],
    labels: NODE_LABELS,
};

/// Node-wide disk usage, from `diskSpace`.
pub const TOTAL_DISKSPACE: MetricSpec = MetricSpec {
    name: "storj_total_diskspace",
    help: "Storj total diskspace metrics",
    kind: MetricKind::Gauge,
    keys: &["used", "available", "trash"],
    labels: NODE_LABELS,
};

/// Node-wide bandwidth, from `bandwidth`.
pub const TOTAL_BANDWIDTH: MetricSpec = MetricSpec {
    name: "storj_total_bandwidth",
    help: "Storj total bandwidth metrics",
    kind: MetricKind::Gauge,
    keys: &["used", "available"],
    labels: NODE_LABELS,
};

/// Estimated payout for the current month.
pub const PAYOUT_CURRENT_MONTH: MetricSpec = MetricSpec {
    name: "storj_payout_currentMonth",
    help: "Storj estimated payouts for current month",
    kind: MetricKind::Gauge,
    keys: &[
        "egressBandwidth",
        "egressBandwidthPayout",
        "egressRepairAudit",
        "egressRepairAuditPayout",
        "diskSpace",
        "diskSpacePayout",
        "heldRate",
        "payout",
        "held",
    ],
    labels: NODE_LABELS,
};

/// Per-satellite egress summed over the month's daily entries.
pub const SAT_DAY_EGRESS: MetricSpec = MetricSpec {
    name: "storj_sat_day_egress",
    help: "Storj satellite egress today",
    kind: MetricKind::Gauge,
    keys: &["repair", "audit", "usage"],
    labels: SAT_LABELS,
};

/// Per-satellite ingress summed over the month's daily entries.
pub const SAT_DAY_INGRESS: MetricSpec = MetricSpec {
    name: "storj_sat_day_ingress",
    help: "Storj satellite ingress today",
    kind: MetricKind::Gauge,
    keys: &["repair", "usage"],
    labels: SAT_LABELS,
};

/// Per-satellite data at rest, from the last `storageDaily` entry.
pub const SAT_DAY_STORAGE: MetricSpec = MetricSpec {
    name: "storj_sat_day_storage",
    help: "Storj satellite data stored on disk today",
    kind: MetricKind::Gauge,
    keys: &["atRestTotal"],
    labels: SAT_LABELS,
};

/// Per-satellite status and score summary.
pub const SAT_SUMMARY: MetricSpec = MetricSpec {
    name: "storj_sat_summary",
    help: "Storj satellite summary metrics",
    kind: MetricKind::Gauge,
    keys: &[
        "disqualified",
        "suspended",
        "nodeJoinedAt",
        "storageSummary",
        "bandwidthSummary",
        "egressSummary",
        "ingressSummary",
        "currentStorageUsed",
        "auditScore",
        "suspensionScore",
        "onlineScore",
    ],
    labels: SAT_LABELS,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gauge_one_sample_per_key() {
        let source = json!({"used": 100, "available": 400.5, "trash": 3, "extra": 9});
        let record = TOTAL_DISKSPACE.flatten(&source, &[]).unwrap();

        assert_eq!(record.name, "storj_total_diskspace");
        assert_eq!(record.samples.len(), 3);
        assert_eq!(record.gauge("used"), Some(100.0));
        assert_eq!(record.gauge("available"), Some(400.5));
        assert_eq!(record.gauge("trash"), Some(3.0));
        assert_eq!(record.gauge("extra"), None);
    }

    #[test]
    fn test_gauge_absent_and_non_numeric_keys_are_zero() {
        let source = json!({"used": "lots"});
        let record = TOTAL_DISKSPACE.flatten(&source, &[]).unwrap();

        assert_eq!(record.samples.len(), 3);
        assert_eq!(record.gauge("used"), Some(0.0));
        assert_eq!(record.gauge("available"), Some(0.0));
        assert_eq!(record.gauge("trash"), Some(0.0));
    }

    #[test]
    fn test_missing_source_yields_no_record() {
        assert!(TOTAL_DISKSPACE.flatten(&Value::Null, &[]).is_none());
        assert!(TOTAL_DISKSPACE.flatten(&json!({}), &[]).is_none());
        assert!(TOTAL_DISKSPACE.flatten(&json!([1, 2, 3]), &[]).is_none());
        assert!(NODE_INFO.flatten(&Value::Null, &[]).is_none());
    }

    #[test]
    fn test_label_prefix_follows_key() {
        let source = json!({"repair": 1, "audit": 2, "usage": 3});
        let prefix = vec!["sat-1".to_string(), "us1.storj.io:7777".to_string()];
        let record = SAT_DAY_EGRESS.flatten(&source, &prefix).unwrap();

        assert_eq!(record.label_names, &["type", "satellite", "url"]);
        assert_eq!(
            record.samples[1].label_values,
            vec!["audit", "sat-1", "us1.storj.io:7777"]
        );
        assert_eq!(record.samples[1].value, SampleValue::Number(2.0));
    }

    #[test]
    fn test_info_bundles_present_keys() {
        let source = json!({
            "nodeID": "12abc",
            "wallet": "0xdead",
            "upToDate": true,
            "version": "1.68.2",
            "lastPinged": null,
        });
        let record = NODE_INFO.flatten(&source, &[]).unwrap();

        assert_eq!(record.kind, MetricKind::Info);
        assert_eq!(record.samples.len(), 4);
        assert_eq!(record.samples[0].label_values, vec!["nodeID"]);
        assert_eq!(
            record.samples[0].value,
            SampleValue::Info {
                field: "nodeID".to_string(),
                text: "12abc".to_string(),
            }
        );
        assert_eq!(
            record.samples[2].value,
            SampleValue::Info {
                field: "upToDate".to_string(),
                text: "true".to_string(),
            }
        );
    }

    #[test]
    fn test_info_without_any_key_yields_no_record() {
        let source = json!({"diskSpace": {"used": 1}});
        assert!(NODE_INFO.flatten(&source, &[]).is_none());
    }
}
