//! Error types for specification building and predicate compilation.
//!
//! Every error in this crate is a synchronous, non-retryable validation
//! failure raised while a specification is being built or compiled. The
//! compiled predicate itself never fails at evaluation time; anything that
//! can go wrong is reported before the first record is inspected.
//!
//! Builder methods either return the mutated specification or fail outright,
//! leaving the specification in its prior valid state. There is no partial
//! application of a failed `add`.
//!
//! # Examples
//!
//! ```rust
//! use entity_query::{EntityFilter, FilterCombination, FilterMatch, QueryError};
//!
//! // Appending with `None` combination to a non-empty filter is rejected.
//! let filter = EntityFilter::<()>::new().and("name", "Anna").unwrap();
//! let err = filter
//!     .add("name", "Hanna", FilterCombination::None, FilterMatch::Equal, false, false)
//!     .unwrap_err();
//! assert!(matches!(err, QueryError::InvalidSpecification(_)));
//! ```

use thiserror::Error;

/// Result type for specification building and compilation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while building or compiling a filter/sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Malformed combination sequencing: the first rule must use `None`,
    /// every subsequent rule must use `And` or `Or`.
    #[error("invalid filter specification: {0}")]
    InvalidSpecification(String),

    /// The value cannot participate in filtering (e.g. a NaN float).
    #[error("invalid filter value: {0}")]
    InvalidValue(String),

    /// The match kind is incompatible with the value's type or nullness.
    #[error("invalid filter operator: {0}")]
    InvalidOperator(String),

    /// The member's declared type and the rule's value type cannot be
    /// reconciled by any supported coercion.
    #[error("the field `{field}` of type {expected} cannot be compared to a value of type {found}")]
    TypeMismatch {
        /// Dotted path of the offending field.
        field: String,
        /// The member's declared kind.
        expected: String,
        /// The value's kind.
        found: String,
    },

    /// The match kind is not supported for the member's declared type
    /// (e.g. an ordering operator on a boolean field).
    #[error("operator {operator} is not supported for field `{field}` of type {kind}")]
    UnsupportedOperator {
        /// Dotted path of the offending field.
        field: String,
        /// The rejected match kind.
        operator: String,
        /// The member's declared kind.
        kind: String,
    },

    /// A dotted path did not resolve to a scalar field of the element type.
    #[error("unknown or non-scalar field path `{0}`")]
    UnknownField(String),

    /// An argument outside a specification was invalid (e.g. an empty
    /// projection list).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl QueryError {
    /// Create a [`QueryError::InvalidSpecification`] error.
    pub fn invalid_specification(message: impl Into<String>) -> Self {
        Self::InvalidSpecification(message.into())
    }

    /// Create a [`QueryError::InvalidValue`] error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Create a [`QueryError::InvalidOperator`] error.
    pub fn invalid_operator(message: impl Into<String>) -> Self {
        Self::InvalidOperator(message.into())
    }

    /// Create a [`QueryError::UnknownField`] error.
    pub fn unknown_field(path: impl Into<String>) -> Self {
        Self::UnknownField(path.into())
    }

    /// Create a [`QueryError::InvalidArgument`] error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
