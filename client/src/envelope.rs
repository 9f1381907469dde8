//! Response-envelope handling shared by the domain adapters.

use serde_json::Value;

/// The v2 execute endpoint wraps the acted-on resource as
/// `{"data": {...}, "successful": ..., "error": ...}`. Unwrap `data` when
/// present and non-null; otherwise hand the body back untouched.
pub(crate) fn unwrap_data(raw: Value) -> Value {
    match raw {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Multi-record responses: a bare array is taken as-is, an object yields its
/// `results` array, and anything else is treated as a single record.
/// Non-object entries are dropped.
pub(crate) fn result_objects(data: &Value) -> Vec<Value> {
    let items = if let Some(items) = data.as_array() {
        items.clone()
    } else if let Some(items) = data.get("results").and_then(Value::as_array) {
        items.clone()
    } else {
        vec![data.clone()]
    };
    items.into_iter().filter(|item| item.is_object()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_data_takes_envelope_payload() {
        let raw = json!({"data": {"id": "p1"}, "successful": true, "error": null});
        assert_eq!(unwrap_data(raw), json!({"id": "p1"}));
    }

    #[test]
    fn unwrap_data_keeps_bodies_without_envelope() {
        let raw = json!({"id": "p1"});
        assert_eq!(unwrap_data(raw.clone()), raw);
        let raw = json!({"data": null, "id": "p1"});
        assert_eq!(unwrap_data(raw.clone()), raw);
    }

    #[test]
    fn result_objects_handles_all_three_shapes() {
        assert_eq!(result_objects(&json!([{"id": 1}, "junk"])).len(), 1);
        assert_eq!(
            result_objects(&json!({"results": [{"id": 1}, {"id": 2}]})).len(),
            2
        );
        // A lone record counts as a one-element result set.
        assert_eq!(result_objects(&json!({"id": 1})).len(), 1);
    }
}
