//! Scoped mapper builders.
//!
//! A [`ScopeBuilder`] is bound to one branch of the state tree. Every mapper
//! it builds sees `state[branch]` instead of the whole tree, may run a chain of
//! intermediate mappers first, and ends in a final combiner that receives the
//! positional arguments
//!
//! ```text
//! [result_1, .., result_k, scoped_state, own_props, global_state]
//! ```
//!
//! Intermediate mappers run in the order they were added, each with
//! `(scoped_state, own_props)`.

use crate::mapper::{shared, Mapper, SharedMapper};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

static NULL: Value = Value::Null;

type CombinerFn = dyn Fn(&ScopeArgs<'_>) -> Value + Send + Sync;

/// Positional arguments handed to a final combiner.
#[derive(Debug, Clone)]
pub struct ScopeArgs<'a> {
    positional: Vec<&'a Value>,
    results: usize,
}

impl<'a> ScopeArgs<'a> {
    fn new(
        results: &'a [Value],
        scoped: &'a Value,
        own_props: &'a Value,
        global: &'a Value,
    ) -> Self {
        let mut positional = Vec::with_capacity(results.len() + 3);
        positional.extend(results);
        positional.push(scoped);
        positional.push(own_props);
        positional.push(global);
        Self {
            positional,
            results: results.len(),
        }
    }

    /// All arguments in order: intermediate results, then scoped state, own
    /// props and global state.
    #[inline]
    pub fn positional(&self) -> &[&'a Value] {
        &self.positional
    }

    /// The argument at position `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&'a Value> {
        self.positional.get(i).copied()
    }

    /// Total number of positional arguments (always at least three).
    #[inline]
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// Always `false`; present for symmetry with [`len`](Self::len).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    /// Intermediate results in chain order.
    #[inline]
    pub fn results(&self) -> &[&'a Value] {
        &self.positional[..self.results]
    }

    /// The result of the `i`-th intermediate mapper.
    #[inline]
    pub fn result(&self, i: usize) -> Option<&'a Value> {
        self.results().get(i).copied()
    }

    /// `global_state[branch]`, or `null` when the branch is missing.
    #[inline]
    pub fn scoped(&self) -> &'a Value {
        self.positional[self.results]
    }

    /// The caller's own props, untouched.
    #[inline]
    pub fn own_props(&self) -> &'a Value {
        self.positional[self.results + 1]
    }

    /// The whole state tree, for reads across branches.
    #[inline]
    pub fn global(&self) -> &'a Value {
        self.positional[self.results + 2]
    }
}

/// Create a builder for mappers scoped to `branch`.
///
/// # Examples
///
/// ```
/// use tirea_mapper::{mapper_fn, scope_builder, Mapper};
/// use serde_json::json;
///
/// let build = scope_builder("t");
/// let state = json!({"t": {"v": 9}});
///
/// let scoped = build.finish(|args| args.scoped().clone());
/// assert_eq!(scoped.map(&state, &json!({})), json!({"v": 9}));
///
/// let chained = build
///     .then(mapper_fn(|s, _| s["v"].clone()))
///     .finish(|args| json!([args.result(0), args.scoped()["v"]]));
/// assert_eq!(chained.map(&state, &json!({})), json!([9, 9]));
/// ```
pub fn scope_builder(branch: impl Into<String>) -> ScopeBuilder {
    ScopeBuilder {
        branch: Arc::from(branch.into()),
    }
}

/// Builds mappers bound to one branch of the state tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeBuilder {
    branch: Arc<str>,
}

impl ScopeBuilder {
    /// The branch every built mapper is scoped to.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Start a chain with its first intermediate mapper.
    pub fn then(&self, mapper: impl Mapper + 'static) -> ScopeChain {
        ScopeChain {
            branch: Arc::clone(&self.branch),
            intermediates: vec![shared(mapper)],
        }
    }

    /// Build a mapper with no intermediates: the combiner receives
    /// `[scoped_state, own_props, global_state]`.
    pub fn finish<F>(&self, combiner: F) -> ScopedMapper
    where
        F: Fn(&ScopeArgs<'_>) -> Value + Send + Sync + 'static,
    {
        self.build(Vec::new(), combiner)
    }

    /// Build a mapper from a runtime list of intermediates.
    pub fn build<F>(
        &self,
        intermediates: impl IntoIterator<Item = SharedMapper>,
        combiner: F,
    ) -> ScopedMapper
    where
        F: Fn(&ScopeArgs<'_>) -> Value + Send + Sync + 'static,
    {
        ScopedMapper {
            branch: Arc::clone(&self.branch),
            intermediates: intermediates.into_iter().collect(),
            combiner: Arc::new(combiner),
        }
    }
}

/// A partially built scoped mapper: intermediates collected, combiner pending.
#[derive(Clone)]
pub struct ScopeChain {
    branch: Arc<str>,
    intermediates: Vec<SharedMapper>,
}

impl ScopeChain {
    /// Append an intermediate mapper.
    #[must_use]
    pub fn then(mut self, mapper: impl Mapper + 'static) -> Self {
        self.intermediates.push(shared(mapper));
        self
    }

    /// Finish the chain with its final combiner.
    pub fn finish<F>(self, combiner: F) -> ScopedMapper
    where
        F: Fn(&ScopeArgs<'_>) -> Value + Send + Sync + 'static,
    {
        ScopedMapper {
            branch: self.branch,
            intermediates: self.intermediates.into(),
            combiner: Arc::new(combiner),
        }
    }
}

impl fmt::Debug for ScopeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeChain")
            .field("branch", &self.branch)
            .field("intermediates", &self.intermediates.len())
            .finish()
    }
}

/// A mapper that rebases state onto one branch before deriving props.
#[derive(Clone)]
pub struct ScopedMapper {
    branch: Arc<str>,
    intermediates: Arc<[SharedMapper]>,
    combiner: Arc<CombinerFn>,
}

impl ScopedMapper {
    /// The branch this mapper reads.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Number of intermediate mappers before the combiner.
    pub fn intermediates(&self) -> usize {
        self.intermediates.len()
    }
}

impl fmt::Debug for ScopedMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedMapper")
            .field("branch", &self.branch)
            .field("intermediates", &self.intermediates.len())
            .finish_non_exhaustive()
    }
}

impl Mapper for ScopedMapper {
    fn map(&self, global: &Value, own_props: &Value) -> Value {
        let scoped = match global.get(&*self.branch) {
            Some(branch) => branch,
            None => {
                tracing::trace!(branch = %self.branch, "branch missing; scoped state is null");
                &NULL
            }
        };

        let results: Vec<Value> = self
            .intermediates
            .iter()
            .map(|mapper| mapper.map(scoped, own_props))
            .collect();

        tracing::trace!(
            branch = %self.branch,
            intermediates = results.len(),
            "invoking scoped combiner"
        );
        (self.combiner)(&ScopeArgs::new(&results, scoped, own_props, global))
    }
}
