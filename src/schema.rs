//! The element type description consumed by the compilers.
//!
//! The compilers never see concrete Rust field types; they see a small
//! schema surface implemented by the element type:
//!
//! - [`Record`] provides field access by name at evaluation time, and
//! - [`Queryable`] provides the static field layout used to resolve dotted
//!   paths and check coercions at predicate compile time.
//!
//! # Examples
//!
//! ```rust
//! use entity_query::{FieldAccess, FieldKind, FieldType, Queryable, Record};
//!
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
//! ```

use crate::error::{QueryError, QueryResult};
use crate::value::FieldValue;
use smallvec::SmallVec;
use smol_str::SmolStr;

/// Resolves nested path segments for a [`FieldKind::Nested`] field.
pub type SchemaFn = fn(&str) -> Option<FieldType>;

/// The declared kind of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Boolean field.
    Bool,
    /// Integer field (any width).
    Int,
    /// Floating point field.
    Float,
    /// Decimal field.
    Decimal,
    /// Text field.
    Text,
    /// UTC timestamp field.
    DateTime,
    /// Signed duration field.
    Duration,
    /// UUID field.
    Uuid,
    /// Enum field, tagged with the enum type name.
    Enum(&'static str),
    /// A nested record; the function resolves its own field layout.
    Nested(SchemaFn),
}

impl FieldKind {
    /// Human-readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::DateTime => "datetime",
            Self::Duration => "duration",
            Self::Uuid => "uuid",
            Self::Enum(_) => "enum",
            Self::Nested(_) => "record",
        }
    }

    /// Whether relational operators (`Greater`, `Less`, ...) apply.
    ///
    /// Booleans, UUIDs and enums compare only for equality, the way the
    /// original host types expose no relational operators for them. Text
    /// ordering is excluded as well; only equality and the substring family
    /// apply to text.
    pub(crate) fn is_orderable(&self) -> bool {
        matches!(
            self,
            Self::Int | Self::Float | Self::Decimal | Self::DateTime | Self::Duration
        )
    }
}

/// The declared type of a field: its kind plus nullability.
#[derive(Debug, Clone, Copy)]
pub struct FieldType {
    /// The field's kind.
    pub kind: FieldKind,
    /// Whether the field can be null (an `Option` in the element type).
    pub nullable: bool,
}

impl FieldType {
    /// A non-nullable field of the given kind.
    pub const fn scalar(kind: FieldKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// A nullable field of the given kind.
    pub const fn nullable(kind: FieldKind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }
}

/// The result of looking up a single field on a record.
pub enum FieldAccess<'a> {
    /// A scalar value (use [`FieldValue::Null`] for a null scalar).
    Value(FieldValue),
    /// A nested record to continue path traversal into.
    Nested(&'a dyn Record),
    /// The field is absent, or a nested record is null.
    Missing,
}

/// Field access by name at evaluation time.
///
/// Implementations return [`FieldAccess::Missing`] for unknown names; the
/// schema check at compile time guarantees the compilers only ask for
/// declared fields.
pub trait Record {
    /// Look up a single (non-dotted) field by name.
    fn get(&self, field: &str) -> FieldAccess<'_>;
}

/// Static field layout of an element type.
///
/// This is what makes dotted member paths resolvable, and coercions
/// checkable, before any record is inspected.
pub trait Queryable: Record + 'static {
    /// The declared type of a single (non-dotted) field, or `None` if the
    /// element type has no such field.
    fn field_type(field: &str) -> Option<FieldType>;
}

/// A dotted path resolved against an element type's schema.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedPath {
    pub segments: SmallVec<[SmolStr; 4]>,
    pub ty: FieldType,
}

/// Resolve a dotted path against `T`'s schema.
///
/// Fails with [`QueryError::UnknownField`] when a segment does not exist,
/// when a scalar appears mid-path, or when the path terminates on a nested
/// record instead of a scalar.
pub(crate) fn resolve_path<T: Queryable>(path: &str) -> QueryResult<ResolvedPath> {
    let mut segments: SmallVec<[SmolStr; 4]> = SmallVec::new();
    let mut current: Option<FieldType> = None;

    for segment in path.split('.') {
        if segment.is_empty() {
            return Err(QueryError::unknown_field(path));
        }
        let next = match current {
            None => T::field_type(segment),
            Some(FieldType {
                kind: FieldKind::Nested(lookup),
                ..
            }) => lookup(segment),
            Some(_) => None,
        };
        let Some(ty) = next else {
            return Err(QueryError::unknown_field(path));
        };
        segments.push(SmolStr::new(segment));
        current = Some(ty);
    }

    match current {
        Some(ty) if !matches!(ty.kind, FieldKind::Nested(_)) => Ok(ResolvedPath { segments, ty }),
        _ => Err(QueryError::unknown_field(path)),
    }
}

/// Walk a resolved path on a record and produce the member value.
///
/// A null nested record anywhere along the path yields [`FieldValue::Null`],
/// the same way a null intermediate makes the whole member null for
/// comparison purposes.
pub(crate) fn lookup(record: &dyn Record, segments: &[SmolStr]) -> FieldValue {
    let mut current = record;
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        match current.get(segment) {
            FieldAccess::Value(value) => {
                return if last { value } else { FieldValue::Null };
            }
            FieldAccess::Nested(next) => {
                if last {
                    return FieldValue::Null;
                }
                current = next;
            }
            FieldAccess::Missing => return FieldValue::Null,
        }
    }
    FieldValue::Null
}
