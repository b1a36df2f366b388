//! Sequential mapper combinator.
//!
//! ```text
//! acc_0 = {}
//! acc_n = acc_{n-1} <- mapper_n(state, own_props <- acc_{n-1})
//! ```
//!
//! where `a <- b` is a shallow merge in which `b`'s top-level keys win. Each
//! mapper therefore sees the merged outputs of every mapper before it through
//! its own props.

use crate::access::merge_shallow;
use crate::error::value_type_name;
use crate::mapper::{shared, Mapper, SharedMapper};
use serde_json::{Map, Value};
use std::fmt;

/// Mappers applied left to right with accumulated outputs.
#[derive(Clone, Default)]
pub struct Combined {
    mappers: Vec<SharedMapper>,
}

impl Combined {
    /// Create an empty combinator; it maps every input to `{}`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapper and return self (builder pattern).
    #[must_use]
    pub fn then(mut self, mapper: impl Mapper + 'static) -> Self {
        self.mappers.push(shared(mapper));
        self
    }

    /// Append an already shared mapper.
    pub fn push(&mut self, mapper: SharedMapper) {
        self.mappers.push(mapper);
    }

    /// Number of mappers in the chain.
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    /// Check if the chain has no mappers.
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}

impl fmt::Debug for Combined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combined")
            .field("mappers", &self.mappers.len())
            .finish()
    }
}

impl FromIterator<SharedMapper> for Combined {
    fn from_iter<I: IntoIterator<Item = SharedMapper>>(iter: I) -> Self {
        Self {
            mappers: iter.into_iter().collect(),
        }
    }
}

impl Mapper for Combined {
    fn map(&self, state: &Value, own_props: &Value) -> Value {
        let base = own_props.as_object();
        let mut acc = Map::new();

        for (step, mapper) in self.mappers.iter().enumerate() {
            let mut props = base.cloned().unwrap_or_default();
            props.extend(acc.iter().map(|(k, v)| (k.clone(), v.clone())));

            let output = mapper.map(state, &Value::Object(props));
            let found = value_type_name(&output);
            if !merge_shallow(&mut acc, output) {
                tracing::debug!(step, found, "mapper returned a non-object; no keys merged");
            }
        }

        tracing::trace!(mappers = self.mappers.len(), keys = acc.len(), "combined mapper outputs");
        Value::Object(acc)
    }
}

/// Combine mappers into one that runs them in order, feeding each the
/// caller's own props overlaid with everything produced so far.
///
/// Outputs are merged shallowly and later keys overwrite earlier ones,
/// including keys that came from own props. Own props that are not an object
/// contribute no keys, and neither does a mapper output that is not an
/// object. Unlike JavaScript object spread, arrays and strings are not
/// expanded into index keys.
///
/// # Examples
///
/// ```
/// use tirea_mapper::{combine_mappers, mapper_fn, shared, Mapper};
/// use serde_json::json;
///
/// let combined = combine_mappers([
///     shared(mapper_fn(|_, _| json!({"a": 1}))),
///     shared(mapper_fn(|_, props| json!({"b": props["a"].as_i64().unwrap_or(0) + 1}))),
/// ]);
/// assert_eq!(combined.map(&json!({}), &json!({})), json!({"a": 1, "b": 2}));
/// ```
pub fn combine_mappers(mappers: impl IntoIterator<Item = SharedMapper>) -> Combined {
    mappers.into_iter().collect()
}

/// Combine mappers given as a list of expressions.
///
/// ```
/// use tirea_mapper::{combine, mapper_fn, Mapper};
/// use serde_json::json;
///
/// let combined = combine!(
///     mapper_fn(|state, _| json!({"n": state["n"]})),
///     mapper_fn(|_, props| json!({"twice": props["n"].as_i64().map(|n| n * 2)})),
/// );
/// assert_eq!(combined.map_state(&json!({"n": 4})), json!({"n": 4, "twice": 8}));
/// ```
#[macro_export]
macro_rules! combine {
    ($($mapper:expr),* $(,)?) => {
        $crate::Combined::new()$(.then($mapper))*
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::mapper_fn;
    use serde_json::json;

    #[test]
    fn test_empty_combinator_yields_empty_object() {
        assert_eq!(Combined::new().map(&json!({"a": 1}), &json!({"b": 2})), json!({}));
    }

    #[test]
    fn test_later_mapper_sees_earlier_output() {
        let combined = Combined::new()
            .then(mapper_fn(|_, _| json!({"a": 1})))
            .then(mapper_fn(|_, p| json!({"b": p["a"].as_i64().unwrap() + 1})));
        assert_eq!(combined.map(&json!({}), &json!({})), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_own_props_visible_but_not_returned() {
        let combined = Combined::new().then(mapper_fn(|_, p| json!({"seen": p["id"]})));
        assert_eq!(combined.map(&json!({}), &json!({"id": 7})), json!({"seen": 7}));
    }

    #[test]
    fn test_accumulated_key_shadows_own_prop() {
        let combined = Combined::new()
            .then(mapper_fn(|_, _| json!({"id": "derived"})))
            .then(mapper_fn(|_, p| json!({"seen": p["id"]})));
        let out = combined.map(&json!({}), &json!({"id": "own"}));
        assert_eq!(out, json!({"id": "derived", "seen": "derived"}));
    }

    #[test]
    fn test_later_keys_overwrite_without_deep_merge() {
        let combined = Combined::new()
            .then(mapper_fn(|_, _| json!({"view": {"a": 1}, "keep": true})))
            .then(mapper_fn(|_, _| json!({"view": {"b": 2}})));
        assert_eq!(
            combined.map(&json!({}), &json!({})),
            json!({"view": {"b": 2}, "keep": true})
        );
    }

    #[test]
    fn test_non_object_output_contributes_nothing() {
        let combined = Combined::new()
            .then(mapper_fn(|_, _| json!({"a": 1})))
            .then(mapper_fn(|_, _| json!([1, 2, 3])))
            .then(mapper_fn(|_, p| json!({"b": p["a"]})));
        assert_eq!(combined.map(&json!({}), &json!({})), json!({"a": 1, "b": 1}));
    }

    #[test]
    fn test_null_own_props() {
        let combined = Combined::new().then(mapper_fn(|_, p| json!({"props": p})));
        assert_eq!(combined.map_state(&json!({})), json!({"props": {}}));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let state = json!({"s": 1});
        let props = json!({"p": 1});
        let combined = Combined::new().then(mapper_fn(|_, _| json!({"p": 2, "s": 2})));
        let _ = combined.map(&state, &props);
        assert_eq!(state, json!({"s": 1}));
        assert_eq!(props, json!({"p": 1}));
    }

    #[test]
    fn test_combine_macro_and_function_agree() {
        let a = || mapper_fn(|s, _| json!({"x": s["x"]}));
        let b = || mapper_fn(|_, p| json!({"y": p["x"]}));
        let from_macro = combine!(a(), b());
        let from_fn = combine_mappers([shared(a()), shared(b())]);
        let state = json!({"x": 5});
        assert_eq!(from_macro.len(), 2);
        assert_eq!(from_macro.map_state(&state), from_fn.map_state(&state));
    }

    #[test]
    fn test_combined_nests() {
        let inner = combine!(mapper_fn(|_, _| json!({"a": 1})));
        let outer = combine!(inner, mapper_fn(|_, p| json!({"b": p["a"]})));
        assert_eq!(outer.map_state(&json!({})), json!({"a": 1, "b": 1}));
    }
}
