//! Composable mappers for deriving views of an immutable JSON state tree.
//!
//! `tirea-mapper` lets small pieces of derivation logic be written against a
//! narrow, renamed or scoped slice of a larger state document and then
//! composed into one mapper that a host calls with the full state and the
//! caller's own props.
//!
//! # Core Concepts
//!
//! - **Mapper**: a pure function `(state, own_props) -> props`
//! - **RenameTable**: ordered `source path -> destination path` relocations
//! - **Renamed**: a mapper whose own props and result pass through rename tables
//! - **Combined**: mappers applied left to right, each seeing earlier outputs
//! - **ScopedMapper**: a mapper rebased onto one branch of the state tree
//!
//! None of these read from anything but their arguments or write anywhere but
//! their return value, so every composed mapper is `Send + Sync` and safe to
//! call from many threads at once.
//!
//! # Quick Start
//!
//! ```
//! use tirea_mapper::{combine, mapper_fn, rename_props, scope_builder, Mapper, RenameTable};
//! use serde_json::json;
//!
//! let state = json!({
//!     "todos": {"items": [{"title": "a", "done": true}, {"title": "b", "done": false}]},
//!     "filter": "open"
//! });
//!
//! let todos = scope_builder("todos");
//!
//! // Count items in the `todos` branch.
//! let count = todos.finish(|args| json!({"count": args.scoped()["items"].as_array().map_or(0, Vec::len)}));
//!
//! // Pick visible titles, reading the filter from outside the branch.
//! let visible = todos
//!     .then(mapper_fn(|todos, _| todos["items"].clone()))
//!     .finish(|args| {
//!         let only_open = args.global()["filter"] == "open";
//!         let titles: Vec<_> = args.result(0).and_then(|v| v.as_array()).into_iter().flatten()
//!             .filter(|item| !only_open || item["done"] == false)
//!             .map(|item| item["title"].clone())
//!             .collect();
//!         json!({"titles": titles})
//!     });
//!
//! // Expose `titles` under the name the consumer expects.
//! let visible = rename_props(
//!     RenameTable::new(),
//!     RenameTable::try_from_pairs([("titles", "list.visible")]).unwrap(),
//! )
//! .wrap(visible);
//!
//! let props = combine!(count, visible).map(&state, &json!({}));
//! assert_eq!(props, json!({"count": 2, "list": {"visible": ["b"]}}));
//! ```

mod access;
mod combine;
mod error;
mod mapper;
mod path;
mod rename;
mod renamed;
mod scope;

pub use access::{get_at_path, merge_shallow, set_at_path};
pub use combine::{combine_mappers, Combined};
pub use error::{value_type_name, MapperError, MapperResult};
pub use mapper::{mapper_fn, shared, Mapper, MapperFn, SharedMapper};
pub use path::{parse_path, Path, Seg};
pub use rename::{rename_paths, rename_value, RenameEntry, RenameTable};
pub use renamed::{rename_props, RenameProps, Renamed};
pub use scope::{scope_builder, ScopeArgs, ScopeBuilder, ScopeChain, ScopedMapper};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
