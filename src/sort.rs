//! The sort specification and its builder.
//!
//! An [`EntitySort`] is an ordered list of sort keys over an element type
//! `T`; list order determines primary/secondary/... precedence. Duplicate
//! field paths are allowed — deduplication is the caller's responsibility.
//!
//! # Examples
//!
//! ```rust
//! use entity_query::EntitySort;
//!
//! // Sort by group ascending, ties broken by name descending.
//! let sort = EntitySort::<()>::new().asc("group").desc("name");
//! assert_eq!(sort.sort_rules().len(), 2);
//! ```

use crate::rule::{SharedSortRule, SortRule};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// An ordered multi-key sort specification over an element type `T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct EntitySort<T> {
    rules: Vec<SharedSortRule>,
    #[serde(skip)]
    marker: PhantomData<fn(T)>,
}

impl<T> Default for EntitySort<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntitySort<T> {
    /// Create an empty sort.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Append a sort key.
    pub fn add(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.rules.push(Arc::new(RwLock::new(SortRule {
            name: field.into(),
            ascending,
        })));
        self
    }

    /// Append an ascending sort key.
    pub fn asc(self, field: impl Into<String>) -> Self {
        self.add(field, true)
    }

    /// Append a descending sort key.
    pub fn desc(self, field: impl Into<String>) -> Self {
        self.add(field, false)
    }

    /// The live sort rules, in precedence order.
    ///
    /// The handles alias the specification: mutating a returned rule
    /// changes what subsequent compilations observe, the same contract as
    /// [`crate::EntityFilter::flattened_rules`].
    pub fn sort_rules(&self) -> &[SharedSortRule] {
        &self.rules
    }

    /// Whether the sort has no keys.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
