//! Rename tables and the path-rename engine.
//!
//! A [`RenameTable`] relocates values from source paths to destination paths.
//! [`rename_paths`] applies one to a value and produces a fresh object, or
//! hands the input back untouched when the table is empty.

use crate::access::{get_at_path, merge_shallow, set_at_path};
use crate::error::MapperResult;
use crate::path::{parse_path, Path};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// One `from -> to` relocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenameEntry {
    /// Where the value is read from.
    pub from: Path,
    /// Where the value is written to.
    pub to: Path,
}

/// An ordered mapping from source path to destination path.
///
/// Entries keep insertion order. Source paths are unique: inserting a source
/// that is already present replaces its destination in place.
///
/// # Examples
///
/// ```
/// use tirea_mapper::{rename_paths, RenameTable};
/// use serde_json::json;
///
/// let table = RenameTable::try_from_pairs([("a.b", "x.y")]).unwrap();
/// let doc = json!({"a": {"b": 5}});
/// let renamed = rename_paths(&table, &doc);
/// assert_eq!(*renamed, json!({"x": {"y": 5}}));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenameTable {
    entries: Vec<RenameEntry>,
}

impl RenameTable {
    /// Create an empty table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from dotted path strings, parsing each side.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> MapperResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = Self::new();
        for (from, to) in pairs {
            table.insert(parse_path(from.as_ref())?, parse_path(to.as_ref())?);
        }
        Ok(table)
    }

    /// Insert a relocation, returning the destination it replaced, if any.
    pub fn insert(&mut self, from: Path, to: Path) -> Option<Path> {
        match self.entries.iter_mut().find(|e| e.from == from) {
            Some(existing) => Some(std::mem::replace(&mut existing.to, to)),
            None => {
                self.entries.push(RenameEntry { from, to });
                None
            }
        }
    }

    /// Insert a relocation and return self (builder pattern).
    #[must_use]
    pub fn with(mut self, from: Path, to: Path) -> Self {
        self.insert(from, to);
        self
    }

    /// Destination for a source path.
    pub fn get(&self, from: &Path) -> Option<&Path> {
        self.entries.iter().find(|e| &e.from == from).map(|e| &e.to)
    }

    /// Check if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &RenameEntry> {
        self.entries.iter()
    }
}

impl FromIterator<(Path, Path)> for RenameTable {
    fn from_iter<I: IntoIterator<Item = (Path, Path)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (from, to) in iter {
            table.insert(from, to);
        }
        table
    }
}

impl Serialize for RenameTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.from.to_dotted(), &entry.to.to_dotted())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RenameTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RenameTableVisitor)
    }
}

struct RenameTableVisitor;

impl<'de> Visitor<'de> for RenameTableVisitor {
    type Value = RenameTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of source path to destination path")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = RenameTable::new();
        while let Some((from, to)) = access.next_entry::<String, String>()? {
            let from = parse_path(&from).map_err(de::Error::custom)?;
            let to = parse_path(&to).map_err(de::Error::custom)?;
            table.insert(from, to);
        }
        Ok(table)
    }
}

/// Relocate values of `source` according to `table`.
///
/// - An empty table returns `Cow::Borrowed(source)`: the very same value.
/// - Otherwise every entry reads from the original `source` (never from
///   earlier writes) and the value found, or `null` when the path is
///   missing, is written at the destination of a fresh single-path fragment.
/// - Fragments are merged into the result at the top level only, so a later
///   entry whose destination shares a first segment with an earlier one
///   replaces that whole top-level key. `{"a": "x.p", "b": "x.q"}` therefore
///   yields `{"x": {"q": ..}}`, not `{"x": {"p": .., "q": ..}}`.
/// - A root (empty) source path never resolves; a root destination writes
///   nothing.
///
/// # Examples
///
/// ```
/// use tirea_mapper::{rename_paths, RenameTable};
/// use serde_json::json;
/// use std::borrow::Cow;
///
/// let doc = json!({"a": 1});
/// assert!(matches!(rename_paths(&RenameTable::new(), &doc), Cow::Borrowed(_)));
///
/// let table = RenameTable::try_from_pairs([("a.b", "x")]).unwrap();
/// assert_eq!(*rename_paths(&table, &json!({})), json!({"x": null}));
/// ```
pub fn rename_paths<'a>(table: &RenameTable, source: &'a Value) -> Cow<'a, Value> {
    if table.is_empty() {
        return Cow::Borrowed(source);
    }
    Cow::Owned(relocate(table, source))
}

/// Owned variant of [`rename_paths`]: an empty table moves `source` through.
pub fn rename_value(table: &RenameTable, source: Value) -> Value {
    if table.is_empty() {
        return source;
    }
    relocate(table, &source)
}

fn relocate(table: &RenameTable, source: &Value) -> Value {
    let mut acc = Map::new();
    for RenameEntry { from, to } in table.iter() {
        if to.is_empty() {
            continue;
        }
        let value = if from.is_empty() {
            Value::Null
        } else {
            get_at_path(source, from).cloned().unwrap_or(Value::Null)
        };
        let mut fragment = Value::Object(Map::new());
        set_at_path(&mut fragment, to, value);
        merge_shallow(&mut acc, fragment);
    }
    Value::Object(acc)
}
