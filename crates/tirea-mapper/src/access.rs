//! Path reads and writes over JSON values.
//!
//! Both directions are total. Reads degrade to `None` on any missing or
//! mismatched segment, and writes build whatever containers the path needs,
//! overwriting scalars that stand in the way.

use crate::{Path, Seg};
use serde_json::{Map, Value};

/// Get a reference to the value at `path`.
///
/// An index segment on an object looks up the decimal key, so `"items.0"`
/// resolves against both `{"items": [..]}` and `{"items": {"0": ..}}`.
///
/// # Examples
///
/// ```
/// use tirea_mapper::{get_at_path, path};
/// use serde_json::json;
///
/// let doc = json!({"a": {"b": [10, 20]}});
/// assert_eq!(get_at_path(&doc, &path!("a", "b", 1)), Some(&json!(20)));
/// assert_eq!(get_at_path(&doc, &path!("a", "x", "y")), None);
/// ```
pub fn get_at_path<'a>(doc: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = doc;
    for seg in path {
        current = match (seg, current) {
            (Seg::Key(key), Value::Object(obj)) => obj.get(key)?,
            (Seg::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            (Seg::Index(idx), Value::Object(obj)) => obj.get(&idx.to_string())?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate containers as needed.
///
/// A missing or scalar intermediate becomes an array when the next segment is
/// an index and an object otherwise. Indices past the end of an array pad it
/// with `null`. An index more than 65536 slots past the end is
/// written as a decimal object key instead, and an existing array in that
/// position becomes an object keyed by its indices. Writing at the root path
/// replaces `doc`.
///
/// # Examples
///
/// ```
/// use tirea_mapper::{set_at_path, path};
/// use serde_json::json;
///
/// let mut doc = json!({});
/// set_at_path(&mut doc, &path!("rows", 1, "id"), json!(7));
/// assert_eq!(doc, json!({"rows": [null, {"id": 7}]}));
/// ```
pub fn set_at_path(doc: &mut Value, path: &Path, value: Value) {
    set_segments(doc, path.segments(), value);
}

fn set_segments(current: &mut Value, segments: &[Seg], value: Value) {
    let Some((seg, rest)) = segments.split_first() else {
        *current = value;
        return;
    };

    let child = match seg {
        Seg::Key(key) => {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(obj) => obj.entry(key.clone()).or_insert(Value::Null),
                _ => unreachable!("container was just ensured"),
            }
        }
        Seg::Index(idx) => {
            let paddable = match &*current {
                Value::Object(_) => true,
                Value::Array(arr) => fits_padding(arr.len(), *idx),
                _ => fits_padding(0, *idx),
            };
            if !paddable {
                *current = Value::Object(keyed_by_index(std::mem::take(current)));
            } else if !current.is_object() && !current.is_array() {
                *current = Value::Array(Vec::new());
            }
            match current {
                Value::Object(obj) => obj.entry(idx.to_string()).or_insert(Value::Null),
                Value::Array(arr) => pad_to(arr, *idx),
                _ => unreachable!("container was just ensured"),
            }
        }
    };

    set_segments(child, rest, value);
}

/// Shallow-merge `value` into `target`: each top-level key of `value`
/// overwrites the same key in `target`, nested values are not merged.
///
/// Returns `false` (and leaves `target` untouched) when `value` is not an
/// object. Arrays and strings are not expanded into index keys.
///
/// # Examples
///
/// ```
/// use tirea_mapper::merge_shallow;
/// use serde_json::{json, Map, Value};
///
/// let mut acc = Map::new();
/// merge_shallow(&mut acc, json!({"a": {"x": 1}, "b": 1}));
/// merge_shallow(&mut acc, json!({"a": {"y": 2}}));
/// assert_eq!(Value::Object(acc), json!({"a": {"y": 2}, "b": 1}));
/// ```
pub fn merge_shallow(target: &mut Map<String, Value>, value: Value) -> bool {
    match value {
        Value::Object(obj) => {
            target.extend(obj);
            true
        }
        _ => false,
    }
}

/// Most `null` slots a single write may append to an array.
const MAX_PADDING: usize = 1 << 16;

fn fits_padding(len: usize, idx: usize) -> bool {
    idx.checked_add(1)
        .map_or(false, |end| end.saturating_sub(len) <= MAX_PADDING)
}

fn keyed_by_index(value: Value) -> Map<String, Value> {
    match value {
        Value::Array(arr) => arr
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Map::new(),
    }
}

fn pad_to(arr: &mut Vec<Value>, idx: usize) -> &mut Value {
    if let Some(end) = idx.checked_add(1).filter(|end| *end > arr.len()) {
        arr.resize(end, Value::Null);
    }
    &mut arr[idx]
}
