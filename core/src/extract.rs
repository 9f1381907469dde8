//! Field-extraction helpers shared by every normalizer.
//!
//! The backend spells the same attribute several ways depending on API
//! version and resource age. These helpers encode the precedence and
//! indirection rules once so each normalizer stays a flat list of field
//! mappings.

use serde_json::Value;

/// First present string among candidate flat keys, in precedence order.
pub fn str_at(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Descend a path of object keys, returning the string at the end.
/// Any non-object along the way yields `None` rather than an error.
pub fn nested_str(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    current.as_str().map(str::to_string)
}

/// String array under `key`, empty when absent or mis-shaped.
pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Unwrap a list response: a bare array is taken as-is, otherwise the first
/// present key among `keys` (e.g. `items`, then the resource-named array).
pub fn value_list(value: &Value, keys: &[&str]) -> Vec<Value> {
    if let Some(items) = value.as_array() {
        return items.clone();
    }
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

/// Concatenate the `plain_text` of every run in a rich-text array, in array
/// order, with no separator. An empty or mis-shaped array yields `None`.
pub fn plain_text(runs: &Value) -> Option<String> {
    let runs = runs.as_array()?;
    if runs.is_empty() {
        return None;
    }
    Some(
        runs.iter()
            .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
            .collect(),
    )
}

/// Scan a property bag for the first property whose `type` is `"title"` and
/// concatenate its `title` run array.
pub fn title_from_properties(props: &Value) -> Option<String> {
    let props = props.as_object()?;
    for prop in props.values() {
        if prop.get("type").and_then(Value::as_str) == Some("title") {
            return prop.get("title").and_then(plain_text);
        }
    }
    None
}

/// Two-step parent indirection: `parent.type` names the key inside the same
/// `parent` object that holds the actual parent id. Without a `type` there
/// is no id — we never guess.
pub fn parent_ref(value: &Value) -> (Option<String>, Option<String>) {
    let Some(parent) = value.get("parent") else {
        return (None, None);
    };
    let Some(parent_type) = parent.get("type").and_then(Value::as_str) else {
        return (None, None);
    };
    let parent_id = parent
        .get(parent_type)
        .and_then(Value::as_str)
        .map(str::to_string);
    (Some(parent_type.to_string()), parent_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn str_at_prefers_earlier_keys() {
        let v = json!({"slug": "notion", "key": "legacy"});
        assert_eq!(str_at(&v, &["slug", "key"]), Some("notion".to_string()));
        let v = json!({"key": "legacy"});
        assert_eq!(str_at(&v, &["slug", "key"]), Some("legacy".to_string()));
        assert_eq!(str_at(&json!({}), &["slug", "key"]), None);
    }

    #[test]
    fn nested_str_requires_objects_all_the_way_down() {
        let v = json!({"toolkit": {"slug": "github"}});
        assert_eq!(
            nested_str(&v, &["toolkit", "slug"]),
            Some("github".to_string())
        );
        let v = json!({"toolkit": "github"});
        assert_eq!(nested_str(&v, &["toolkit", "slug"]), None);
        assert_eq!(nested_str(&json!(null), &["toolkit", "slug"]), None);
    }

    #[test]
    fn value_list_accepts_bare_arrays_and_named_keys() {
        let bare = json!([{"id": 1}]);
        assert_eq!(value_list(&bare, &["items"]).len(), 1);
        let wrapped = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(value_list(&wrapped, &["items", "toolkits"]).len(), 2);
        let named = json!({"toolkits": [{"id": 1}]});
        assert_eq!(value_list(&named, &["items", "toolkits"]).len(), 1);
        assert!(value_list(&json!({}), &["items"]).is_empty());
    }

    #[test]
    fn plain_text_concatenates_runs_in_order() {
        let runs = json!([{"plain_text": "Hel"}, {"plain_text": "lo"}]);
        assert_eq!(plain_text(&runs), Some("Hello".to_string()));
    }

    #[test]
    fn plain_text_empty_array_is_none() {
        assert_eq!(plain_text(&json!([])), None);
        assert_eq!(plain_text(&json!("not an array")), None);
    }

    #[test]
    fn plain_text_skips_runs_without_text() {
        let runs = json!([{"plain_text": "A"}, {"href": null}, {"plain_text": "B"}]);
        assert_eq!(plain_text(&runs), Some("AB".to_string()));
    }

    #[test]
    fn title_scan_takes_first_title_typed_property() {
        let props = json!({
            "Status": {"type": "select", "select": {"name": "Done"}},
            "Name": {"type": "title", "title": [{"plain_text": "Hel"}, {"plain_text": "lo"}]}
        });
        assert_eq!(title_from_properties(&props), Some("Hello".to_string()));
    }

    #[test]
    fn title_scan_with_no_title_property_is_none() {
        let props = json!({"Status": {"type": "select"}});
        assert_eq!(title_from_properties(&props), None);
        assert_eq!(title_from_properties(&json!(null)), None);
    }

    #[test]
    fn parent_ref_indirects_through_type() {
        let v = json!({"parent": {"type": "page_id", "page_id": "P1"}});
        assert_eq!(
            parent_ref(&v),
            (Some("page_id".to_string()), Some("P1".to_string()))
        );
    }

    #[test]
    fn parent_ref_without_matching_key_keeps_type_only() {
        let v = json!({"parent": {"type": "workspace"}});
        assert_eq!(parent_ref(&v), (Some("workspace".to_string()), None));
    }

    #[test]
    fn parent_ref_without_type_yields_nothing() {
        let v = json!({"parent": {"page_id": "P1"}});
        assert_eq!(parent_ref(&v), (None, None));
        assert_eq!(parent_ref(&json!({})), (None, None));
    }
}
