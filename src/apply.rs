//! Applying compiled specifications to record collections: filtering,
//! ordering, pagination, and field projection.
//!
//! This layer is deliberately thin: it compiles the given specifications
//! and applies them to any iterator of records, in the fixed order
//! filter → sort → skip → take. Compilation errors surface before the
//! first record is touched; iteration itself cannot fail.
//!
//! # Examples
//!
//! ```rust
//! use entity_query::{
//!     EntityFilter, EntityQueryExt, EntitySort, FieldAccess, FieldKind, FieldType,
//!     Pagination, Queryable, Record,
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
//! ];
//!
//! let filter = EntityFilter::new().and_where(entity_query::ops::gt("age", 30)).unwrap();
//! let page = Pagination::first(10);
//! let result = users.apply_query(Some(&filter), None, &page).unwrap();
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].name, "Anna");
//! ```

use crate::compile::Predicate;
use crate::error::{QueryError, QueryResult};
use crate::filter::EntityFilter;
use crate::schema::{lookup, resolve_path, Queryable};
use crate::sort::EntitySort;
use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;
use std::cmp::Ordering;
use tracing::debug;

/// Offset pagination applied after filtering and ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of records to skip.
    pub skip: Option<usize>,
    /// Maximum number of records to take.
    pub take: Option<usize>,
}

impl Pagination {
    /// Create a pagination with no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of records to skip.
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the maximum number of records to take.
    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    /// The first `n` records.
    pub fn first(n: usize) -> Self {
        Self::new().take(n)
    }

    /// Page-based pagination (1-indexed).
    ///
    /// ```rust
    /// use entity_query::Pagination;
    ///
    /// let page = Pagination::page(3, 25);
    /// assert_eq!(page.skip, Some(50));
    /// assert_eq!(page.take, Some(25));
    /// ```
    pub fn page(page: usize, per_page: usize) -> Self {
        Self::new().skip(page.saturating_sub(1) * per_page).take(per_page)
    }

    /// Whether no pagination is specified.
    pub fn is_empty(&self) -> bool {
        self.skip.is_none() && self.take.is_none()
    }
}

/// Iterator adaptor yielding only the records matched by a compiled
/// predicate. Created by [`filter_by_rules`].
#[derive(Debug)]
pub struct FilteredRules<I, T> {
    inner: I,
    predicate: Predicate<T>,
}

impl<I, T> Iterator for FilteredRules<I, T>
where
    I: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let item = self.inner.next()?;
            if self.predicate.matches(&item) {
                return Some(item);
            }
        }
    }
}

/// Filter a sequence by a specification.
///
/// The specification compiles before iteration starts, so all validation
/// errors surface here; the returned adaptor is infallible. An empty
/// filter passes everything through.
pub fn filter_by_rules<T, I>(
    source: I,
    filter: &EntityFilter<T>,
) -> QueryResult<FilteredRules<I::IntoIter, T>>
where
    T: Queryable,
    I: IntoIterator<Item = T>,
{
    let predicate = filter.compile()?;
    Ok(FilteredRules {
        inner: source.into_iter(),
        predicate,
    })
}

/// Sort a slice in place by a specification.
///
/// The sort is stable: records comparing equal under every key keep their
/// relative order.
pub fn order_by_rules<T: Queryable>(items: &mut [T], sort: &EntitySort<T>) -> QueryResult<()> {
    let plan = sort.compile()?;
    if !plan.is_empty() {
        items.sort_by(|a, b| plan.compare(a, b));
    }
    Ok(())
}

/// Sort a slice in place, appending the specification's keys to an
/// externally produced ordering.
///
/// `first` is the caller's existing comparator; the compiled keys only
/// break its ties. This is the "already ordered" variant for callers who
/// want the specification as secondary keys.
pub fn order_by_rules_within<T, F>(
    items: &mut [T],
    first: F,
    sort: &EntitySort<T>,
) -> QueryResult<()>
where
    T: Queryable,
    F: Fn(&T, &T) -> Ordering,
{
    let plan = sort.compile()?;
    items.sort_by(|a, b| first(a, b).then_with(|| plan.compare(a, b)));
    Ok(())
}

/// Apply filter, sort, and pagination to a sequence, in that fixed order.
///
/// Both specifications are optional; pagination applies skip before take.
pub fn apply_query<T: Queryable>(
    source: impl IntoIterator<Item = T>,
    filter: Option<&EntityFilter<T>>,
    sort: Option<&EntitySort<T>>,
    page: &Pagination,
) -> QueryResult<Vec<T>> {
    let mut items: Vec<T> = match filter {
        Some(filter) => filter_by_rules(source, filter)?.collect(),
        None => source.into_iter().collect(),
    };
    debug!(matched = items.len(), "applied filter rules");

    if let Some(sort) = sort {
        order_by_rules(&mut items, sort)?;
    }

    if let Some(skip) = page.skip {
        if skip >= items.len() {
            items.clear();
        } else {
            items.drain(..skip);
        }
    }
    if let Some(take) = page.take {
        items.truncate(take);
    }
    Ok(items)
}

/// A projected row: requested dotted paths mapped to their values, in
/// request order.
pub type ProjectedRow = IndexMap<String, FieldValue>;

/// Project each record into a row containing exactly the requested dotted
/// field paths.
///
/// A null or absent member projects as [`FieldValue::Null`]. Fails with
/// [`QueryError::InvalidArgument`] when `fields` is empty, and with
/// [`QueryError::UnknownField`] when a path does not resolve.
pub fn select_fields<T: Queryable>(
    source: impl IntoIterator<Item = T>,
    fields: &[impl AsRef<str>],
) -> QueryResult<Vec<ProjectedRow>> {
    if fields.is_empty() {
        return Err(QueryError::invalid_argument("cannot select zero fields"));
    }

    let mut paths: Vec<(String, SmallVec<[SmolStr; 4]>)> = Vec::with_capacity(fields.len());
    for field in fields {
        let field = field.as_ref();
        let resolved = resolve_path::<T>(field)?;
        paths.push((field.to_string(), resolved.segments));
    }

    Ok(source
        .into_iter()
        .map(|item| {
            paths
                .iter()
                .map(|(name, segments)| (name.clone(), lookup(&item, segments)))
                .collect()
        })
        .collect())
}

/// Extension methods applying specifications directly to any iterable of
/// records.
pub trait EntityQueryExt<T>: IntoIterator<Item = T> + Sized {
    /// Filter by a specification; see [`filter_by_rules`].
    fn filter_by_rules(
        self,
        filter: &EntityFilter<T>,
    ) -> QueryResult<FilteredRules<Self::IntoIter, T>>
    where
        T: Queryable,
    {
        filter_by_rules(self, filter)
    }

    /// Apply filter, sort and pagination; see [`apply_query`].
    fn apply_query(
        self,
        filter: Option<&EntityFilter<T>>,
        sort: Option<&EntitySort<T>>,
        page: &Pagination,
    ) -> QueryResult<Vec<T>>
    where
        T: Queryable,
    {
        apply_query(self, filter, sort, page)
    }

    /// Project into rows of requested fields; see [`select_fields`].
    fn select_fields(self, fields: &[&str]) -> QueryResult<Vec<ProjectedRow>>
    where
        T: Queryable,
    {
        select_fields(self, fields)
    }
}

impl<T, I: IntoIterator<Item = T>> EntityQueryExt<T> for I {}
