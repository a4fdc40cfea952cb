//! Rendering of metric records in the Prometheus text format.
//!
//! Records are converted into `prometheus` protobuf families and written by
//! its [`TextEncoder`]. Records that share a name (one per satellite) are
//! merged into a single family so HELP and TYPE are emitted once.
//!
//! Info records follow the usual info-metric convention: the family is named
//! `<name>_info`, each sample gains a `<key>="<text>"` label and has value 1.

use prometheus::proto::{Gauge, LabelPair, Metric, MetricFamily, MetricType};
use prometheus::{Encoder, TextEncoder};

use crate::error::Result;
use crate::metrics::{MetricKind, MetricRecord, Sample, SampleValue};

/// Content type of [`encode`] output.
#[must_use]
pub fn content_type() -> String {
    TextEncoder::new().format_type().to_string()
}

/// Encode `records` in the text exposition format.
pub fn encode(records: &[MetricRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families(records), &mut buffer)?;
    Ok(buffer)
}

/// Group records into metric families, preserving first-seen order.
#[must_use]
pub fn families(records: &[MetricRecord]) -> Vec<MetricFamily> {
    let mut families: Vec<MetricFamily> = Vec::new();

    for record in records {
        let name = family_name(record);
        let idx = match families.iter().position(|f| f.get_name() == name) {
            Some(idx) => idx,
            None => {
                let mut family = MetricFamily::default();
                family.set_name(name);
                family.set_help(record.help.to_string());
                family.set_field_type(MetricType::GAUGE);
                families.push(family);
                families.len() - 1
            }
        };

        let family = &mut families[idx];
        for sample in &record.samples {
            family.mut_metric().push(to_metric(record, sample));
        }
    }

    families
}

fn family_name(record: &MetricRecord) -> String {
    match record.kind {
        MetricKind::Gauge => record.name.to_string(),
        MetricKind::Info => format!("{}_info", record.name),
    }
}

fn to_metric(record: &MetricRecord, sample: &Sample) -> Metric {
    let mut metric = Metric::default();
    for (name, value) in record.label_names.iter().zip(&sample.label_values) {
        metric.mut_label().push(label_pair(name, value));
    }

    let value = match &sample.value {
        SampleValue::Number(v) => *v,
        SampleValue::Info { field, text } => {
            metric.mut_label().push(label_pair(field, text));
            1.0
        }
    };

    let mut gauge = Gauge::default();
    gauge.set_value(value);
    metric.set_gauge(gauge);
    metric
}

fn label_pair(name: &str, value: &str) -> LabelPair {
    let mut pair = LabelPair::default();
    pair.set_name(name.to_string());
    pair.set_value(value.to_string());
    pair
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{NODE_INFO, SAT_DAY_EGRESS, TOTAL_DISKSPACE};
    use serde_json::json;

    fn render(records: &[MetricRecord]) -> String {
        String::from_utf8(encode(records).unwrap()).unwrap()
    }

    #[test]
    fn test_gauge_rendering() {
        let record = TOTAL_DISKSPACE
            .flatten(&json!({"used": 1000, "available": 5000}), &[])
            .unwrap();
        let text = render(&[record]);

        assert!(text.contains("# HELP storj_total_diskspace Storj total diskspace metrics"));
        assert!(text.contains("# TYPE storj_total_diskspace gauge"));
        assert!(text.contains("storj_total_diskspace{type=\"used\"} 1000"));
        assert!(text.contains("storj_total_diskspace{type=\"available\"} 5000"));
        assert!(text.contains("storj_total_diskspace{type=\"trash\"} 0"));
    }

    #[test]
    fn test_info_rendering() {
        let record = NODE_INFO
            .flatten(&json!({"nodeID": "12abc", "version": "1.68.2"}), &[])
            .unwrap();
        let text = render(&[record]);

        assert!(text.contains("# TYPE storj_node_info gauge"));
        assert!(text.contains("storj_node_info{type=\"nodeID\",nodeID=\"12abc\"} 1"));
        assert!(text.contains("storj_node_info{type=\"version\",version=\"1.68.2\"} 1"));
    }

    #[test]
    fn test_same_name_records_share_one_family() {
        let sat_a = vec!["sat-a".to_string(), "a:7777".to_string()];
        let sat_b = vec!["sat-b".to_string(), "b:7777".to_string()];
        let source = json!({"repair": 1, "audit": 2, "usage": 3});
        let records = vec![
            SAT_DAY_EGRESS.flatten(&source, &sat_a).unwrap(),
            SAT_DAY_EGRESS.flatten(&source, &sat_b).unwrap(),
        ];

        let families = families(&records);
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].get_metric().len(), 6);

        let text = render(&records);
        assert_eq!(text.matches("# TYPE storj_sat_day_egress gauge").count(), 1);
        assert!(text.contains(
            "storj_sat_day_egress{type=\"usage\",satellite=\"sat-b\",url=\"b:7777\"} 3"
        ));
    }

    #[test]
    fn test_empty_record_set_renders_empty_body() {
        assert!(encode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_content_type() {
        assert!(content_type().starts_with("text/plain"));
    }
}
