//! Dot-notation access into decoded JSON.
//!
//! `"data.ids.0.id"` walks object keys and array indices. A key that
//! literally contains dots is matched first when it exists at the root.

use serde_json::Value;

/// Resolve `path` inside `value`. Returns `None` when any segment is absent.
pub fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(found) = value.as_object().and_then(|map| map.get(path)) {
        return Some(found);
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Project `key` out of every element of a collection.
///
/// Elements without the key contribute `Null`, so the output has one entry
/// per input element. Scalars are not collections and give `None`.
pub fn pluck(value: &Value, key: &str) -> Option<Vec<Value>> {
    let project = |item: &Value| get(item, key).cloned().unwrap_or(Value::Null);
    match value {
        Value::Array(items) => Some(items.iter().map(project).collect()),
        Value::Object(map) => Some(map.values().map(project).collect()),
        _ => None,
    }
}
