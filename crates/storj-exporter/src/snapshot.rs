//! Scrape-scoped views over node API responses.
//!
//! A [`NodeSnapshot`] wraps the `/sno/` summary. A [`SatelliteSnapshot`] is
//! built fresh for each satellite listing by merging in the detail response
//! and deriving the monthly bandwidth sums. Nothing here mutates the fetched
//! trees; each stage produces a new value and hands it forward.

use serde_json::{Map, Value};

use crate::value::{ValueExt, safe_index};

/// Egress fields summed from `bandwidthDaily[].egress`.
pub const EGRESS_FIELDS: &[&str] = &["repair", "audit", "usage"];

/// Ingress fields summed from `bandwidthDaily[].ingress`.
pub const INGRESS_FIELDS: &[&str] = &["repair", "usage"];

/// Sum `fields` of the `path` sub-object across every day in `daily`.
///
/// Returns an empty object when `daily` is not an array. Otherwise every
/// requested field is present, starting from zero; days without the
/// sub-object and null or non-numeric values contribute nothing.
#[must_use]
pub fn sum_daily(daily: &Value, path: &str, fields: &[&str]) -> Value {
    let Some(days) = daily.as_array() else {
        return Value::Object(Map::new());
    };

    let mut totals = vec![0.0_f64; fields.len()];
    for day in days {
        let entry = day.field(path);
        for (total, field) in totals.iter_mut().zip(fields) {
            if let Some(v) = entry.field(field).as_f64() {
                *total += v;
            }
        }
    }

    fields
        .iter()
        .zip(totals)
        .map(|(field, total)| ((*field).to_string(), Value::from(total)))
        .collect::<Map<String, Value>>()
        .into()
}

/// The node summary returned by `GET /api/sno/`.
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    raw: Value,
}

impl NodeSnapshot {
    /// Wrap a summary response; `None` unless it is a non-empty object.
    #[must_use]
    pub fn from_value(raw: Value) -> Option<Self> {
        raw.is_populated_object().then_some(Self { raw })
    }

    /// Top-level object, carrying the identity fields.
    #[must_use]
    pub fn identity(&self) -> &Value {
        &self.raw
    }

    #[must_use]
    pub fn disk_space(&self) -> &Value {
        self.raw.field("diskSpace")
    }

    #[must_use]
    pub fn bandwidth(&self) -> &Value {
        self.raw.field("bandwidth")
    }

    /// Satellite listings, in the order the node reports them.
    #[must_use]
    pub fn satellites(&self) -> &[Value] {
        self.raw
            .field("satellites")
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// One satellite, with its detail merged in and aggregates derived.
#[derive(Debug, Clone)]
pub struct SatelliteSnapshot {
    id: String,
    url: String,
    summary: Value,
    egress: Value,
    ingress: Value,
    storage_today: Value,
}

impl SatelliteSnapshot {
    /// Build a snapshot from a `/sno/` satellite listing and an optional
    /// `/sno/satellite/{id}` detail response.
    ///
    /// Detail members override listing members, and the detail's `audits`
    /// object is lifted to the top level. `disqualified` and `suspended`
    /// are normalized to `1`/`0`. Returns `None` when the listing has no
    /// string `id`.
    #[must_use]
    pub fn new(listing: &Value, detail: Option<&Value>) -> Option<Self> {
        let id = listing.field("id").as_str()?.to_string();
        let url = listing.field("url").as_str().unwrap_or_default().to_string();

        let mut merged = listing.as_object().cloned().unwrap_or_default();
        if let Some(detail) = detail.and_then(Value::as_object) {
            merged.extend(detail.clone());
        }
        if let Some(audits) = merged.get("audits").and_then(Value::as_object).cloned() {
            merged.extend(audits);
        }
        for flag in ["disqualified", "suspended"] {
            let set = merged.get(flag).is_some_and(Value::is_truthy);
            merged.insert(flag.to_string(), Value::from(u8::from(set)));
        }

        let merged = Value::Object(merged);
        let daily = merged.field("bandwidthDaily");
        let egress = sum_daily(daily, "egress", EGRESS_FIELDS);
        let ingress = sum_daily(daily, "ingress", INGRESS_FIELDS);
        let empty = Value::Object(Map::new());
        let storage_today = safe_index(merged.field("storageDaily"), -1, &empty).clone();

        Some(Self {
            id,
            url,
            summary: merged,
            egress,
            ingress,
            storage_today,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Label values that follow the key label: `[id, url]`.
    #[must_use]
    pub fn label_values(&self) -> Vec<String> {
        vec![self.id.clone(), self.url.clone()]
    }

    /// Merged listing and detail fields.
    #[must_use]
    pub fn summary(&self) -> &Value {
        &self.summary
    }

    /// Monthly egress sums.
    #[must_use]
    pub fn egress(&self) -> &Value {
        &self.egress
    }

    /// Monthly ingress sums.
    #[must_use]
    pub fn ingress(&self) -> &Value {
        &self.ingress
    }

    /// Last `storageDaily` entry, assumed to be today.
    #[must_use]
    pub fn storage_today(&self) -> &Value {
        &self.storage_today
    }
}
