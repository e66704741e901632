//! The rule model: serializable leaf and composite filter rules, and sort
//! rules.
//!
//! Rules are plain data. A specification's tree is made of [`FilterNode`]s,
//! a closed union of leaf rules and composite groups; the compilers match
//! exhaustively over it, so there is no "unknown rule kind" at runtime.
//!
//! Leaf rules are shared by reference ([`SharedRule`]): the handles returned
//! by [`crate::EntityFilter::flattened_rules`] alias the tree, so mutating a
//! returned rule changes what subsequent compilations of the owning
//! specification observe. Sort rules share the same contract.

use crate::value::FieldValue;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a rule joins the predicate accumulated from the rules before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterCombination {
    /// Combine with logical AND.
    And,
    /// Combine with logical OR.
    Or,
    /// No combination; only valid for the first rule of a list.
    #[default]
    None,
}

/// The comparison a rule applies between a member and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterMatch {
    /// Substring test; text fields only.
    Like,
    /// Prefix test; text fields only.
    StartsWith,
    /// Suffix test; text fields only.
    EndsWith,
    /// Equality.
    Equal,
    /// Inequality.
    NotEqual,
    /// Strictly greater.
    Greater,
    /// Strictly less.
    Less,
    /// Greater or equal.
    GreaterOrEqual,
    /// Less or equal.
    LessOrEqual,
}

impl FilterMatch {
    /// Whether this is one of the relational (ordering) operators.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::Greater | Self::Less | Self::GreaterOrEqual | Self::LessOrEqual
        )
    }

    /// Whether this is one of the text-only operators.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Like | Self::StartsWith | Self::EndsWith)
    }
}

impl fmt::Display for FilterMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Like => "Like",
            Self::StartsWith => "StartsWith",
            Self::EndsWith => "EndsWith",
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::Greater => "Greater",
            Self::Less => "Less",
            Self::GreaterOrEqual => "GreaterOrEqual",
            Self::LessOrEqual => "LessOrEqual",
        };
        f.write_str(name)
    }
}

/// A single field comparison rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Dotted path of the field to compare.
    pub name: String,
    /// The value to compare against.
    pub value: FieldValue,
    /// How this rule joins the rules before it.
    pub combination: FilterCombination,
    /// The comparison to apply.
    pub match_kind: FilterMatch,
    /// Case-sensitive text comparison. Ignored for non-text values.
    pub case_sensitive: bool,
}

/// A leaf rule shared between the owning specification and any caller that
/// extracted it via [`crate::EntityFilter::flattened_rules`].
pub type SharedRule = Arc<RwLock<FilterRule>>;

/// A group of rules combined as a single unit.
///
/// Grouping is what gives a subtree its own parenthesization: the group's
/// children combine left-to-right among themselves, and the result joins
/// the group's siblings via the group's own combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeRule {
    /// How the group joins the rules before it.
    pub combination: FilterCombination,
    /// The group's children, in insertion order.
    pub nodes: Vec<FilterNode>,
}

/// A node in a specification's rule tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FilterNode {
    /// A single comparison.
    Rule(SharedRule),
    /// A grouped subtree.
    Group(CompositeRule),
}

impl FilterNode {
    /// How this node joins the nodes before it.
    pub fn combination(&self) -> FilterCombination {
        match self {
            Self::Rule(rule) => rule.read().combination,
            Self::Group(group) => group.combination,
        }
    }
}

/// A single sort key: a dotted field path and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRule {
    /// Dotted path of the field to sort by.
    pub name: String,
    /// Sort ascending when true, descending otherwise.
    pub ascending: bool,
}

/// A sort rule shared between the owning specification and any caller that
/// extracted it via [`crate::EntitySort::sort_rules`].
pub type SharedSortRule = Arc<RwLock<SortRule>>;
