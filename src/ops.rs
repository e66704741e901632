//! Comparison-expression constructors for the fluent builder surface.
//!
//! These free functions build a [`Comparison`] — one `field OP value` unit —
//! that the `*_where` methods on [`crate::EntityFilter`] consume. They map
//! one-to-one onto the relational operators: `eq` → `==`, `ne` → `!=`,
//! `gt` → `>`, `gte` → `>=`, `lt` → `<`, `lte` → `<=`.
//!
//! # Examples
//!
//! ```rust
//! use entity_query::{ops, EntityFilter};
//!
//! let filter = EntityFilter::<()>::new()
//!     .and_where(ops::gt("age", 18)).unwrap()
//!     .and_where(ops::eq("name", "Anna").case_sensitive()).unwrap();
//! assert_eq!(filter.flattened_rules().len(), 2);
//! ```

use crate::rule::FilterMatch;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};

/// A single `field OP value` comparison, ready to join a specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Dotted path of the field.
    pub field: String,
    /// The comparison operator.
    pub match_kind: FilterMatch,
    /// The value to compare against.
    pub value: FieldValue,
    /// Case-sensitive text comparison.
    pub case_sensitive: bool,
}

impl Comparison {
    fn new(field: impl Into<String>, match_kind: FilterMatch, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            match_kind,
            value: value.into(),
            case_sensitive: false,
        }
    }

    /// Compare text case-sensitively (equality comparisons only; ordering
    /// operators never apply to text).
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}

/// `field == value`.
pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Comparison {
    Comparison::new(field, FilterMatch::Equal, value)
}

/// `field != value`.
pub fn ne(field: impl Into<String>, value: impl Into<FieldValue>) -> Comparison {
    Comparison::new(field, FilterMatch::NotEqual, value)
}

/// `field > value`.
pub fn gt(field: impl Into<String>, value: impl Into<FieldValue>) -> Comparison {
    Comparison::new(field, FilterMatch::Greater, value)
}

/// `field >= value`.
pub fn gte(field: impl Into<String>, value: impl Into<FieldValue>) -> Comparison {
    Comparison::new(field, FilterMatch::GreaterOrEqual, value)
}

/// `field < value`.
pub fn lt(field: impl Into<String>, value: impl Into<FieldValue>) -> Comparison {
    Comparison::new(field, FilterMatch::Less, value)
}

/// `field <= value`.
pub fn lte(field: impl Into<String>, value: impl Into<FieldValue>) -> Comparison {
    Comparison::new(field, FilterMatch::LessOrEqual, value)
}
