//! The filter specification and its fluent builder.
//!
//! An [`EntityFilter`] is an ordered tree of comparison rules over an
//! element type `T`. Rules join left-to-right with AND/OR in insertion
//! order; sub-filters added as groups combine as a single parenthesized
//! unit. The specification is pure data — compiling it into a predicate
//! (see [`crate::Predicate`]) never mutates it, so a filter can be built
//! once, inspected, edited by rule reference, and compiled again.
//!
//! A specification may be compiled from several threads at once; each rule
//! sits behind its own lock, so concurrent compilation is safe even while
//! another thread edits an extracted rule. Appending rules is a
//! single-owner operation (the builder methods consume and return the
//! filter).
//!
//! # Examples
//!
//! ```rust
//! use entity_query::{EntityFilter, FilterMatch};
//!
//! // name LIKE "anna" AND group == 2
//! let filter = EntityFilter::<()>::new()
//!     .and_matching("name", "anna", FilterMatch::Like).unwrap()
//!     .and("group", 2).unwrap();
//!
//! // A.or(B).and(C) groups as (A or B) and C; explicit groups re-parenthesize:
//! // group > 1 and (name == "Anna" or name == "Hanna")
//! let names = EntityFilter::<()>::new()
//!     .and("name", "Anna").unwrap()
//!     .or("name", "Hanna").unwrap();
//! let filter = EntityFilter::<()>::new()
//!     .and_where(entity_query::ops::gt("group", 1)).unwrap()
//!     .and_group(names).unwrap();
//! assert_eq!(filter.nodes().len(), 2);
//! ```

use crate::error::{QueryError, QueryResult};
use crate::ops::Comparison;
use crate::rule::{
    CompositeRule, FilterCombination, FilterMatch, FilterNode, FilterRule, SharedRule,
};
use crate::value::{FieldValue, ValueKind};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// An ordered, composable filter specification over an element type `T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct EntityFilter<T> {
    nodes: Vec<FilterNode>,
    #[serde(skip)]
    marker: PhantomData<fn(T)>,
}

impl<T> Default for EntityFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityFilter<T> {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Append a comparison rule.
    ///
    /// The first rule of a filter must use [`FilterCombination::None`];
    /// every later rule must use `And` or `Or`. With
    /// `allow_silent_creation`, appending to an empty filter quietly forces
    /// the new rule's combination to `None` regardless of what was asked
    /// for — this is what the `and`/`or` shorthands rely on.
    pub fn add(
        mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
        combination: FilterCombination,
        match_kind: FilterMatch,
        case_sensitive: bool,
        allow_silent_creation: bool,
    ) -> QueryResult<Self> {
        let value = value.into();
        validate_rule_value(&value, match_kind, case_sensitive)?;
        self.validate_sequencing(combination, allow_silent_creation)?;

        let combination = if self.nodes.is_empty() {
            FilterCombination::None
        } else {
            combination
        };
        self.nodes.push(FilterNode::Rule(Arc::new(RwLock::new(FilterRule {
            name: field.into(),
            value,
            combination,
            match_kind,
            case_sensitive,
        }))));
        Ok(self)
    }

    /// AND an equality rule (case-insensitive for text), creating the
    /// filter silently if it has no rules yet.
    pub fn and(self, field: impl Into<String>, value: impl Into<FieldValue>) -> QueryResult<Self> {
        self.add(field, value, FilterCombination::And, FilterMatch::Equal, false, true)
    }

    /// OR an equality rule (case-insensitive for text), creating the
    /// filter silently if it has no rules yet.
    pub fn or(self, field: impl Into<String>, value: impl Into<FieldValue>) -> QueryResult<Self> {
        self.add(field, value, FilterCombination::Or, FilterMatch::Equal, false, true)
    }

    /// AND a rule with an explicit match kind.
    pub fn and_matching(
        self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
        match_kind: FilterMatch,
    ) -> QueryResult<Self> {
        self.add(field, value, FilterCombination::And, match_kind, false, true)
    }

    /// OR a rule with an explicit match kind.
    pub fn or_matching(
        self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
        match_kind: FilterMatch,
    ) -> QueryResult<Self> {
        self.add(field, value, FilterCombination::Or, match_kind, false, true)
    }

    /// AND an equality rule, or return the filter unchanged when the value
    /// converts to null. Useful when filtering from optional search-model
    /// fields.
    pub fn and_if_not_null(
        self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> QueryResult<Self> {
        self.and_matching_if_not_null(field, value, FilterMatch::Equal)
    }

    /// OR an equality rule, or return the filter unchanged when the value
    /// converts to null.
    pub fn or_if_not_null(
        self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> QueryResult<Self> {
        self.or_matching_if_not_null(field, value, FilterMatch::Equal)
    }

    /// AND a rule with an explicit match kind, skipping null values.
    pub fn and_matching_if_not_null(
        self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
        match_kind: FilterMatch,
    ) -> QueryResult<Self> {
        let value = value.into();
        if value.is_null() {
            Ok(self)
        } else {
            self.add(field, value, FilterCombination::And, match_kind, false, true)
        }
    }

    /// OR a rule with an explicit match kind, skipping null values.
    pub fn or_matching_if_not_null(
        self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
        match_kind: FilterMatch,
    ) -> QueryResult<Self> {
        let value = value.into();
        if value.is_null() {
            Ok(self)
        } else {
            self.add(field, value, FilterCombination::Or, match_kind, false, true)
        }
    }

    /// Append a comparison expression built with [`crate::ops`].
    pub fn add_where(
        self,
        comparison: Comparison,
        combination: FilterCombination,
        allow_silent_creation: bool,
    ) -> QueryResult<Self> {
        self.add(
            comparison.field,
            comparison.value,
            combination,
            comparison.match_kind,
            comparison.case_sensitive,
            allow_silent_creation,
        )
    }

    /// AND a comparison expression, creating the filter silently.
    pub fn and_where(self, comparison: Comparison) -> QueryResult<Self> {
        self.add_where(comparison, FilterCombination::And, true)
    }

    /// OR a comparison expression, creating the filter silently.
    pub fn or_where(self, comparison: Comparison) -> QueryResult<Self> {
        self.add_where(comparison, FilterCombination::Or, true)
    }

    /// AND a comparison expression, or return the filter unchanged when its
    /// value is null.
    pub fn and_where_if_not_null(self, comparison: Comparison) -> QueryResult<Self> {
        if comparison.value.is_null() {
            Ok(self)
        } else {
            self.and_where(comparison)
        }
    }

    /// OR a comparison expression, or return the filter unchanged when its
    /// value is null.
    pub fn or_where_if_not_null(self, comparison: Comparison) -> QueryResult<Self> {
        if comparison.value.is_null() {
            Ok(self)
        } else {
            self.or_where(comparison)
        }
    }

    /// Append a sub-filter as one grouped unit.
    ///
    /// The group's rules keep their own left-to-right combination among
    /// themselves; the group joins this filter's rules as a single
    /// parenthesized operand. Sequencing validation is the same as
    /// [`EntityFilter::add`].
    pub fn add_group(
        mut self,
        group: EntityFilter<T>,
        combination: FilterCombination,
        allow_silent_creation: bool,
    ) -> QueryResult<Self> {
        self.validate_sequencing(combination, allow_silent_creation)?;

        let combination = if self.nodes.is_empty() {
            FilterCombination::None
        } else {
            combination
        };
        self.nodes.push(FilterNode::Group(CompositeRule {
            combination,
            nodes: group.nodes,
        }));
        Ok(self)
    }

    /// AND a sub-filter as one grouped unit, creating the filter silently.
    pub fn and_group(self, group: EntityFilter<T>) -> QueryResult<Self> {
        self.add_group(group, FilterCombination::And, true)
    }

    /// OR a sub-filter as one grouped unit, creating the filter silently.
    pub fn or_group(self, group: EntityFilter<T>) -> QueryResult<Self> {
        self.add_group(group, FilterCombination::Or, true)
    }

    /// The root rule list, in insertion order.
    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    /// Whether the filter has no rules.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Collect every leaf rule in tree order.
    ///
    /// The returned handles alias the tree: mutating a returned rule's
    /// match kind or value changes what subsequent compilations of this
    /// filter observe. This is the supported way to edit a specification
    /// in place and reuse it.
    pub fn flattened_rules(&self) -> Vec<SharedRule> {
        let mut collector = Vec::new();
        collect_rules(&self.nodes, &mut collector);
        collector
    }

    fn validate_sequencing(
        &self,
        combination: FilterCombination,
        allow_silent_creation: bool,
    ) -> QueryResult<()> {
        if self.nodes.is_empty() {
            if combination != FilterCombination::None && !allow_silent_creation {
                return Err(QueryError::invalid_specification(
                    "this filter has no rules; the first rule must use the None combination",
                ));
            }
        } else if combination == FilterCombination::None {
            return Err(QueryError::invalid_specification(
                "this filter has rules; use And or Or to add more",
            ));
        }
        Ok(())
    }
}

fn collect_rules(nodes: &[FilterNode], collector: &mut Vec<SharedRule>) {
    for node in nodes {
        match node {
            FilterNode::Rule(rule) => collector.push(Arc::clone(rule)),
            FilterNode::Group(group) => collect_rules(&group.nodes, collector),
        }
    }
}

fn validate_rule_value(
    value: &FieldValue,
    match_kind: FilterMatch,
    case_sensitive: bool,
) -> QueryResult<()> {
    if value.is_null() {
        if !matches!(match_kind, FilterMatch::Equal | FilterMatch::NotEqual) {
            return Err(QueryError::invalid_operator(
                "null values can be compared only with the Equal and NotEqual operators",
            ));
        }
        return Ok(());
    }

    match value.kind() {
        ValueKind::Float => {
            if let FieldValue::Float(f) = value {
                if f.is_nan() {
                    return Err(QueryError::invalid_value("NaN cannot be used to filter fields"));
                }
            }
        }
        ValueKind::Text => {
            if match_kind.is_ordering() {
                return Err(QueryError::invalid_operator(
                    "ordering operators cannot be used with text values",
                ));
            }
        }
        _ => {}
    }

    if value.kind() != ValueKind::Text {
        if case_sensitive {
            return Err(QueryError::invalid_operator(
                "case sensitivity applies only to text values",
            ));
        }
        if match_kind.is_text() {
            return Err(QueryError::invalid_operator(
                "Like, StartsWith and EndsWith apply only to text values",
            ));
        }
    }
    Ok(())
}
