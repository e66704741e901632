//! # entity-query
//!
//! Composable, strongly-typed filter and sort specifications compiled to
//! predicates over record collections.
//!
//! This crate provides:
//! - A fluent builder for AND/OR filter trees over an element type
//!   (`add`/`and`/`or`/`and_if_not_null`/grouped sub-filters)
//! - Multi-key sort specifications with ascending/descending keys
//! - A compiler that turns a specification into a reusable boolean
//!   predicate, handling nullable members, enum/int coercion, numeric
//!   widening, and null-safe text comparison
//! - A thin application layer: filter → sort → skip → take over any
//!   iterator of records, plus projection into field/value rows
//!
//! ## Filters
//!
//! Rules join left-to-right in insertion order; sub-filters added as groups
//! parenthesize:
//!
//! ```rust
//! use entity_query::{EntityFilter, FilterMatch, ops};
//!
//! // name LIKE "anna" (case-insensitive) AND group == 2
//! let filter = EntityFilter::<()>::new()
//!     .and_matching("name", "anna", FilterMatch::Like).unwrap()
//!     .and("group", 2).unwrap();
//!
//! // group > 2 AND (id == 3 OR id == 1)
//! let grouped = EntityFilter::<()>::new()
//!     .and_where(ops::gt("group", 2)).unwrap()
//!     .and_group(
//!         EntityFilter::new()
//!             .and_where(ops::eq("id", 3)).unwrap()
//!             .or_where(ops::eq("id", 1)).unwrap(),
//!     ).unwrap();
//!
//! // Optional search-model fields skip null values entirely.
//! let search = EntityFilter::<()>::new()
//!     .and_if_not_null("name", Some("Anna")).unwrap()
//!     .and_if_not_null("group", Option::<i64>::None).unwrap();
//! assert_eq!(search.flattened_rules().len(), 1);
//! ```
//!
//! ## Values
//!
//! Rule values convert from the common Rust types:
//!
//! ```rust
//! use entity_query::FieldValue;
//!
//! let val: FieldValue = 42.into();
//! assert!(matches!(val, FieldValue::Int(42)));
//!
//! let val: FieldValue = "hello".into();
//! assert!(matches!(val, FieldValue::Str(_)));
//!
//! // None maps to null; null compares only with Equal/NotEqual.
//! let val: FieldValue = Option::<bool>::None.into();
//! assert!(val.is_null());
//! ```
//!
//! ## Sorting
//!
//! ```rust
//! use entity_query::EntitySort;
//!
//! // group ascending, ties broken by name descending
//! let sort = EntitySort::<()>::new().asc("group").desc("name");
//! assert_eq!(sort.sort_rules().len(), 2);
//! ```
//!
//! ## Applying specifications
//!
//! Element types expose their fields through the [`Record`] and
//! [`Queryable`] traits; specifications then apply to any iterator:
//!
//! ```rust
//! use entity_query::{
//!     EntityFilter, EntityQueryExt, EntitySort, FieldAccess, FieldKind, FieldType,
//!     Pagination, Queryable, Record, ops,
//! };
//!
//! #[derive(Clone)]
//! struct User {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl Record for User {
//!     fn get(&self, field: &str) -> FieldAccess<'_> {
//!         match field {
//!             "name" => FieldAccess::Value(self.name.clone().into()),
//!             "age" => FieldAccess::Value(self.age.into()),
//!             _ => FieldAccess::Missing,
//!         }
//!     }
//! }
//!
//! impl Queryable for User {
//!     fn field_type(field: &str) -> Option<FieldType> {
//!         Some(match field {
//!             "name" => FieldType::scalar(FieldKind::Text),
//!             "age" => FieldType::scalar(FieldKind::Int),
//!             _ => return None,
//!         })
//!     }
//! }
//!
//! let users = vec![
//!     User { name: "Anna".into(), age: 32 },
//!     User { name: "Hanna".into(), age: 25 },
//!     User { name: "Manna".into(), age: 41 },
//! ];
//!
//! let filter = EntityFilter::new().and_where(ops::gt("age", 30)).unwrap();
//! let sort = EntitySort::new().asc("name");
//! let result = users
//!     .apply_query(Some(&filter), Some(&sort), &Pagination::first(10))
//!     .unwrap();
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].name, "Anna");
//! ```
//!
//! ## Editing a specification in place
//!
//! The rules returned by [`EntityFilter::flattened_rules`] alias the tree;
//! mutate one and recompile:
//!
//! ```rust
//! use entity_query::{EntityFilter, FilterMatch};
//!
//! let filter = EntityFilter::<()>::new().and("name", "ANNA").unwrap();
//! let rule = filter.flattened_rules().pop().unwrap();
//! rule.write().match_kind = FilterMatch::Like;
//! // The next compilation of `filter` sees the Like operator.
//! ```
//!
//! ## Error handling
//!
//! ```rust
//! use entity_query::{EntityFilter, FilterMatch, QueryError};
//!
//! // Ordering operators never apply to text values.
//! let err = EntityFilter::<()>::new()
//!     .and_matching("name", "anna", FilterMatch::Greater)
//!     .unwrap_err();
//! assert!(matches!(err, QueryError::InvalidOperator(_)));
//! ```

pub mod apply;
pub mod compile;
pub mod error;
pub mod filter;
pub mod logging;
pub mod ops;
pub mod ordering;
pub mod rule;
pub mod schema;
pub mod sort;
pub mod value;

pub use apply::{
    apply_query, filter_by_rules, order_by_rules, order_by_rules_within, select_fields,
    EntityQueryExt, FilteredRules, Pagination, ProjectedRow,
};
pub use compile::{CompilerOptions, Predicate};
pub use error::{QueryError, QueryResult};
pub use filter::EntityFilter;
pub use ops::Comparison;
pub use ordering::SortPlan;
pub use rule::{
    CompositeRule, FilterCombination, FilterMatch, FilterNode, FilterRule, SharedRule,
    SharedSortRule, SortRule,
};
pub use schema::{FieldAccess, FieldKind, FieldType, Queryable, Record, SchemaFn};
pub use sort::EntitySort;
pub use value::{EnumField, EnumValue, FieldValue, ValueKind};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::apply::{EntityQueryExt, Pagination};
    pub use crate::compile::{CompilerOptions, Predicate};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::filter::EntityFilter;
    pub use crate::ops;
    pub use crate::rule::{FilterCombination, FilterMatch};
    pub use crate::schema::{FieldAccess, FieldKind, FieldType, Queryable, Record};
    pub use crate::sort::EntitySort;
    pub use crate::value::{EnumField, FieldValue};
}
