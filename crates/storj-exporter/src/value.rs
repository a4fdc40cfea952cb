//! Safe traversal helpers over untyped node API JSON.
//!
//! The node daemon's responses are consumed as [`serde_json::Value`] trees
//! whose shape is not versioned. Every lookup here degrades to a default
//! instead of failing, so a missing or oddly typed field can only ever
//! turn into a zero or an omitted sample.

use serde_json::Value;

static NULL: Value = Value::Null;

/// Lookup and coercion helpers for [`Value`].
pub trait ValueExt {
    /// Object member `key`, or `Null` when absent or when `self` is not an object.
    fn field(&self, key: &str) -> &Value;

    /// Numeric reading of a value for a gauge sample.
    ///
    /// Numbers map to themselves and booleans to `1.0`/`0.0`. Anything else
    /// yields `None`.
    fn gauge_value(&self) -> Option<f64>;

    /// Loose truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
    fn is_truthy(&self) -> bool;

    /// String form for an info sample; `None` for `null`.
    fn info_text(&self) -> Option<String>;

    /// Whether the value is an object with at least one member.
    fn is_populated_object(&self) -> bool;
}

impl ValueExt for Value {
    fn field(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }

    fn gauge_value(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        }
    }

    fn info_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn is_populated_object(&self) -> bool {
        self.as_object().is_some_and(|map| !map.is_empty())
    }
}

/// Element `idx` of `seq`, counting from the end when `idx` is negative.
///
/// Returns `default` when `seq` is not an array or the index is out of range.
pub fn safe_index<'a>(seq: &'a Value, idx: isize, default: &'a Value) -> &'a Value {
    let Some(items) = seq.as_array() else {
        return default;
    };
    let pos = if idx < 0 {
        items.len() as isize + idx
    } else {
        idx
    };
    if pos < 0 {
        return default;
    }
    items.get(pos as usize).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_missing_is_null() {
        let value = json!({"diskSpace": {"used": 10}});
        assert_eq!(value.field("diskSpace").field("used"), &json!(10));
        assert!(value.field("bandwidth").is_null());
        assert!(value.field("bandwidth").field("used").is_null());
        assert!(json!([1, 2]).field("used").is_null());
    }

    #[test]
    fn test_gauge_value_coercion() {
        assert_eq!(json!(12.5).gauge_value(), Some(12.5));
        assert_eq!(json!(7).gauge_value(), Some(7.0));
        assert_eq!(json!(true).gauge_value(), Some(1.0));
        assert_eq!(json!(false).gauge_value(), Some(0.0));
        assert_eq!(json!("2021-01-01T00:00:00Z").gauge_value(), None);
        assert_eq!(Value::Null.gauge_value(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(json!("2021-03-04T10:00:00Z").is_truthy());
        assert!(json!(true).is_truthy());
        assert!(json!(1).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!json!(false).is_truthy());
        assert!(!json!(0).is_truthy());
        assert!(!json!("").is_truthy());
        assert!(!json!({}).is_truthy());
        assert!(!json!([]).is_truthy());
    }

    #[test]
    fn test_info_text() {
        assert_eq!(json!("v1.2.3").info_text().as_deref(), Some("v1.2.3"));
        assert_eq!(json!(true).info_text().as_deref(), Some("true"));
        assert_eq!(json!(42).info_text().as_deref(), Some("42"));
        assert_eq!(Value::Null.info_text(), None);
    }

    #[test]
    fn test_safe_index_negative() {
        let seq = json!(["a", "b", "c"]);
        let default = json!({});
        assert_eq!(safe_index(&seq, -1, &default), &json!("c"));
        assert_eq!(safe_index(&seq, 0, &default), &json!("a"));
        assert_eq!(safe_index(&seq, -3, &default), &json!("a"));
    }

    #[test]
    fn test_safe_index_out_of_range_returns_default() {
        let default = json!({});
        assert_eq!(safe_index(&json!([]), -1, &default), &default);
        assert_eq!(safe_index(&json!(["a"]), 1, &default), &default);
        assert_eq!(safe_index(&json!(["a"]), -2, &default), &default);
        assert_eq!(safe_index(&Value::Null, -1, &default), &default);
        assert_eq!(safe_index(&json!({"a": 1}), 0, &default), &default);
    }
}
