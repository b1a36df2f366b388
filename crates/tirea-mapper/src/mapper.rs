//! The mapper contract.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A pure derivation of properties from `(state, own_props)`.
///
/// Mappers never mutate their inputs; each call builds a fresh value. Every
/// combinator in this crate returns a mapper again, so compositions nest
/// freely. Plain closures become mappers through [`mapper_fn`].
///
/// # Examples
///
/// ```
/// use tirea_mapper::{mapper_fn, Mapper};
/// use serde_json::json;
///
/// let count = mapper_fn(|state, _props| {
///     json!({"count": state["items"].as_array().map_or(0, Vec::len)})
/// });
/// assert_eq!(count.map_state(&json!({"items": [1, 2]})), json!({"count": 2}));
/// ```
pub trait Mapper: Send + Sync {
    /// Derive properties from the state tree and the caller's own props.
    fn map(&self, state: &Value, own_props: &Value) -> Value;

    /// Derive properties when the caller supplies no own props.
    fn map_state(&self, state: &Value) -> Value {
        self.map(state, &Value::Null)
    }
}

/// A type-erased mapper that can be shared between compositions and threads.
pub type SharedMapper = Arc<dyn Mapper>;

impl<M: Mapper + ?Sized> Mapper for Arc<M> {
    #[inline]
    fn map(&self, state: &Value, own_props: &Value) -> Value {
        (**self).map(state, own_props)
    }
}

impl<M: Mapper + ?Sized> Mapper for Box<M> {
    #[inline]
    fn map(&self, state: &Value, own_props: &Value) -> Value {
        (**self).map(state, own_props)
    }
}

impl<M: Mapper + ?Sized> Mapper for &M {
    #[inline]
    fn map(&self, state: &Value, own_props: &Value) -> Value {
        (**self).map(state, own_props)
    }
}

/// A mapper backed by a closure. Created with [`mapper_fn`].
#[derive(Clone, Copy)]
pub struct MapperFn<F> {
    f: F,
}

impl<F> fmt::Debug for MapperFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperFn").finish_non_exhaustive()
    }
}

impl<F> Mapper for MapperFn<F>
where
    F: Fn(&Value, &Value) -> Value + Send + Sync,
{
    #[inline]
    fn map(&self, state: &Value, own_props: &Value) -> Value {
        (self.f)(state, own_props)
    }
}

/// Turn a `(state, own_props) -> props` closure into a [`Mapper`].
#[inline]
pub fn mapper_fn<F>(f: F) -> MapperFn<F>
where
    F: Fn(&Value, &Value) -> Value + Send + Sync,
{
    MapperFn { f }
}

/// Erase a mapper's concrete type.
#[inline]
pub fn shared(mapper: impl Mapper + 'static) -> SharedMapper {
    Arc::new(mapper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapper_fn_receives_both_arguments() {
        let m = mapper_fn(|state, props| json!([state, props]));
        assert_eq!(m.map(&json!(1), &json!(2)), json!([1, 2]));
    }

    #[test]
    fn test_map_state_passes_null_props() {
        let m = mapper_fn(|_, props| props.clone());
        assert_eq!(m.map_state(&json!({"s": 1})), Value::Null);
    }

    #[test]
    fn test_shared_boxed_and_borrowed_forward() {
        let m = shared(mapper_fn(|state, _| state["v"].clone()));
        let boxed: Box<dyn Mapper> = Box::new(Arc::clone(&m));
        assert_eq!(m.map(&json!({"v": 3}), &Value::Null), json!(3));
        assert_eq!(boxed.map(&json!({"v": 4}), &Value::Null), json!(4));
        assert_eq!((&boxed).map_state(&json!({"v": 5})), json!(5));
    }
}
