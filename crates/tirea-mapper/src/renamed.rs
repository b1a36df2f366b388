//! Mapper renaming wrapper.
//!
//! Lets a mapper be written against one naming convention while callers and
//! consumers use another. Own props are renamed on the way in, the mapper's
//! result on the way out. The state tree itself is never renamed.

use crate::error::MapperResult;
use crate::mapper::Mapper;
use crate::rename::{rename_paths, rename_value, RenameTable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Inbound and outbound rename tables for a mapper.
///
/// Also the configuration shape for renames loaded from JSON; both tables
/// default to empty.
///
/// ```
/// use tirea_mapper::RenameProps;
///
/// let renames = RenameProps::from_json_str(r#"{"input": {"from": "in"}}"#).unwrap();
/// assert_eq!(renames.input.len(), 1);
/// assert!(renames.output.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameProps {
    /// Applied to the caller's own props before the mapper runs.
    #[serde(default)]
    pub input: RenameTable,
    /// Applied to the mapper's result.
    #[serde(default)]
    pub output: RenameTable,
}

impl RenameProps {
    /// Load renames from a JSON document.
    pub fn from_json_str(json: &str) -> MapperResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load renames from an already-parsed JSON value.
    pub fn from_value(value: Value) -> MapperResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Wrap `mapper` so its props and result are renamed with these tables.
    pub fn wrap<M: Mapper>(&self, mapper: M) -> Renamed<M> {
        Renamed {
            renames: Arc::new(self.clone()),
            inner: mapper,
        }
    }
}

/// Build a renaming wrapper from an input and an output table.
///
/// # Examples
///
/// ```
/// use tirea_mapper::{mapper_fn, rename_props, Mapper, RenameTable};
/// use serde_json::json;
///
/// let mapper = mapper_fn(|_state, props| json!({"out": props["in"]}));
/// let wrapped = rename_props(
///     RenameTable::try_from_pairs([("from", "in")]).unwrap(),
///     RenameTable::try_from_pairs([("out", "result")]).unwrap(),
/// )
/// .wrap(mapper);
///
/// assert_eq!(wrapped.map(&json!({}), &json!({"from": 42})), json!({"result": 42}));
/// ```
pub fn rename_props(input: RenameTable, output: RenameTable) -> RenameProps {
    RenameProps { input, output }
}

/// A mapper whose own props and result pass through rename tables.
#[derive(Clone, Debug)]
pub struct Renamed<M> {
    renames: Arc<RenameProps>,
    inner: M,
}

impl<M> Renamed<M> {
    /// The rename tables in effect.
    pub fn renames(&self) -> &RenameProps {
        &self.renames
    }
}

impl<M: Mapper> Mapper for Renamed<M> {
    fn map(&self, state: &Value, own_props: &Value) -> Value {
        let props = rename_paths(&self.renames.input, own_props);
        let raw = self.inner.map(state, &props);
        rename_value(&self.renames.output, raw)
    }
}
