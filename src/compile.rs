//! The expression compiler: turns a filter specification into a single
//! boolean predicate over an element type.
//!
//! Compilation is a recursive descent over the rule tree in insertion
//! order. Leaves become comparison closures; a composite group compiles to
//! one sub-predicate that joins its siblings as a single unit, which is
//! what gives groups their parenthesization. The running result
//! re-associates left-to-right: `A.or(B).and(C)` compiles as
//! `(A or B) and C`.
//!
//! All path resolution and type coercion happens here, before the first
//! record is inspected. The compiled [`Predicate`] itself cannot fail.
//!
//! Coercions applied while normalizing a rule's value against the member's
//! declared type:
//! - case-insensitive text comparisons lowercase the constant once, and the
//!   member at evaluation time;
//! - integer constants lift to the member's enum type, for nullable and
//!   non-nullable enum members alike;
//! - integer constants widen to float or decimal members;
//! - a null constant against a non-nullable member is a [`QueryError::TypeMismatch`].

use crate::error::{QueryError, QueryResult};
use crate::filter::EntityFilter;
use crate::rule::{FilterCombination, FilterMatch, FilterNode, FilterRule};
use crate::schema::{lookup, resolve_path, FieldKind, FieldType, Queryable};
use crate::value::{EnumValue, FieldValue, ValueKind};
use std::marker::PhantomData;
use tracing::debug;

/// Options controlling predicate compilation.
#[derive(Debug, Clone, Copy)]
pub struct CompilerOptions {
    /// Guard text comparisons against null members by treating a null text
    /// member as the empty string, the way an in-memory sequence needs.
    ///
    /// Turn this off when the predicate's semantics should mirror a remote
    /// query engine that handles null text itself: a null member then never
    /// satisfies a substring or case-insensitive comparison.
    pub null_safe_text: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            null_safe_text: true,
        }
    }
}

type EvalFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A compiled boolean predicate over an element type.
pub struct Predicate<T> {
    eval: EvalFn<T>,
    marker: PhantomData<fn(&T)>,
}

impl<T> Predicate<T> {
    fn new(eval: EvalFn<T>) -> Self {
        Self {
            eval,
            marker: PhantomData,
        }
    }

    /// Evaluate the predicate against a record.
    pub fn matches(&self, item: &T) -> bool {
        (self.eval)(item)
    }
}

impl<T> std::fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}

impl<T: Queryable> EntityFilter<T> {
    /// Compile this specification into a predicate with default options.
    ///
    /// Compilation snapshots the current rule state and never mutates the
    /// specification; mutating a shared rule afterwards affects only later
    /// compilations. An empty filter compiles to a predicate that matches
    /// everything.
    pub fn compile(&self) -> QueryResult<Predicate<T>> {
        self.compile_with(CompilerOptions::default())
    }

    /// Compile this specification into a predicate.
    pub fn compile_with(&self, options: CompilerOptions) -> QueryResult<Predicate<T>> {
        debug!(nodes = self.nodes().len(), "compiling filter specification");
        match compile_nodes::<T>(self.nodes(), options)? {
            Some(eval) => Ok(Predicate::new(eval)),
            None => Ok(Predicate::new(Box::new(|_| true))),
        }
    }
}

fn compile_nodes<T: Queryable>(
    nodes: &[FilterNode],
    options: CompilerOptions,
) -> QueryResult<Option<EvalFn<T>>> {
    let mut acc: Option<EvalFn<T>> = None;

    for node in nodes {
        let (combination, sub) = match node {
            FilterNode::Rule(rule) => {
                // Snapshot the rule so the compiled predicate is detached
                // from later mutations of the shared rule.
                let rule = rule.read().clone();
                (rule.combination, Some(compile_rule::<T>(&rule, options)?))
            }
            FilterNode::Group(group) => {
                (group.combination, compile_nodes::<T>(&group.nodes, options)?)
            }
        };
        // An empty group contributes nothing.
        let Some(sub) = sub else { continue };

        acc = Some(match acc {
            // The first contributing node seeds the result; its combination
            // is not consulted.
            None => sub,
            Some(prev) => match combination {
                FilterCombination::And => Box::new(move |item: &T| prev(item) && sub(item)),
                FilterCombination::Or => Box::new(move |item: &T| prev(item) || sub(item)),
                FilterCombination::None => {
                    return Err(QueryError::invalid_specification(
                        "only the first rule of a list may use the None combination",
                    ));
                }
            },
        });
    }

    Ok(acc)
}

fn compile_rule<T: Queryable>(rule: &FilterRule, options: CompilerOptions) -> QueryResult<EvalFn<T>> {
    let path = resolve_path::<T>(&rule.name)?;
    let ty = path.ty;

    if !matches!(ty.kind, FieldKind::Text) {
        if rule.case_sensitive {
            return Err(unsupported(rule, &ty, "case-sensitive comparison"));
        }
        if rule.match_kind.is_text() {
            return Err(unsupported_operator(rule, &ty));
        }
    }
    if rule.match_kind.is_ordering() && !ty.kind.is_orderable() {
        return Err(unsupported_operator(rule, &ty));
    }

    let value = normalize_value(rule, &ty)?;

    let segments = path.segments;
    let match_kind = rule.match_kind;
    let case_sensitive = rule.case_sensitive;
    let null_safe_text = options.null_safe_text;

    Ok(Box::new(move |item: &T| {
        let member = lookup(item, &segments);
        eval_compare(&member, &value, match_kind, case_sensitive, null_safe_text)
    }))
}

/// Reconcile the rule's value with the member's declared type, producing
/// the constant the predicate will compare against.
fn normalize_value(rule: &FilterRule, ty: &FieldType) -> QueryResult<FieldValue> {
    let value = &rule.value;

    if value.is_null() {
        if !ty.nullable {
            return Err(type_mismatch(rule, ty, ValueKind::Null));
        }
        return Ok(FieldValue::Null);
    }

    match (ty.kind, value) {
        (FieldKind::Text, FieldValue::Str(s)) => Ok(FieldValue::Str(if rule.case_sensitive {
            s.clone()
        } else {
            s.to_lowercase()
        })),
        (FieldKind::Bool, FieldValue::Bool(_))
        | (FieldKind::Int, FieldValue::Int(_))
        | (FieldKind::Float, FieldValue::Float(_))
        | (FieldKind::Decimal, FieldValue::Decimal(_))
        | (FieldKind::DateTime, FieldValue::DateTime(_))
        | (FieldKind::Duration, FieldValue::Duration(_))
        | (FieldKind::Uuid, FieldValue::Uuid(_)) => Ok(value.clone()),
        // Numeric widening of integer constants.
        (FieldKind::Float, FieldValue::Int(i)) => Ok(FieldValue::Float(*i as f64)),
        (FieldKind::Decimal, FieldValue::Int(i)) => Ok(FieldValue::Decimal((*i).into())),
        // Integer constants lift to the member's enum type.
        (FieldKind::Enum(type_name), FieldValue::Int(i)) => {
            Ok(FieldValue::Enum(EnumValue::new(type_name, *i)))
        }
        (FieldKind::Enum(type_name), FieldValue::Enum(e)) => {
            if e.type_name == type_name {
                Ok(value.clone())
            } else {
                Err(type_mismatch(rule, ty, ValueKind::Enum))
            }
        }
        _ => Err(type_mismatch(rule, ty, value.kind())),
    }
}

fn eval_compare(
    member: &FieldValue,
    value: &FieldValue,
    match_kind: FilterMatch,
    case_sensitive: bool,
    null_safe_text: bool,
) -> bool {
    use FilterMatch::*;

    match match_kind {
        Like | StartsWith | EndsWith => {
            let FieldValue::Str(needle) = value else {
                return false;
            };
            let member = match member {
                FieldValue::Str(s) => s.as_str(),
                FieldValue::Null if null_safe_text => "",
                _ => return false,
            };
            // The needle was lowercased at compile time for the
            // case-insensitive variants.
            let lowered;
            let haystack = if case_sensitive {
                member
            } else {
                lowered = member.to_lowercase();
                lowered.as_str()
            };
            match match_kind {
                Like => haystack.contains(needle.as_str()),
                StartsWith => haystack.starts_with(needle.as_str()),
                _ => haystack.ends_with(needle.as_str()),
            }
        }

        Equal | NotEqual => {
            let eq = if value.is_null() {
                member.is_null()
            } else if let FieldValue::Str(needle) = value {
                let member = match member {
                    FieldValue::Str(s) => Some(s.as_str()),
                    FieldValue::Null if !case_sensitive && null_safe_text => Some(""),
                    _ => None,
                };
                match member {
                    Some(s) if case_sensitive => s == needle.as_str(),
                    Some(s) => s.to_lowercase() == needle.as_str(),
                    None => false,
                }
            } else if member.is_null() {
                false
            } else {
                member == value
            };
            if match_kind == Equal { eq } else { !eq }
        }

        Greater | GreaterOrEqual | Less | LessOrEqual => {
            if member.is_null() || value.is_null() {
                return false;
            }
            let Some(ord) = member.compare(value) else {
                return false;
            };
            match match_kind {
                Greater => ord.is_gt(),
                GreaterOrEqual => ord.is_ge(),
                Less => ord.is_lt(),
                _ => ord.is_le(),
            }
        }
    }
}

fn type_mismatch(rule: &FilterRule, ty: &FieldType, found: ValueKind) -> QueryError {
    QueryError::TypeMismatch {
        field: rule.name.clone(),
        expected: ty.kind.name().to_string(),
        found: found.name().to_string(),
    }
}

fn unsupported_operator(rule: &FilterRule, ty: &FieldType) -> QueryError {
    QueryError::UnsupportedOperator {
        field: rule.name.clone(),
        operator: rule.match_kind.to_string(),
        kind: ty.kind.name().to_string(),
    }
}

fn unsupported(rule: &FilterRule, ty: &FieldType, what: &str) -> QueryError {
    QueryError::UnsupportedOperator {
        field: rule.name.clone(),
        operator: what.to_string(),
        kind: ty.kind.name().to_string(),
    }
}
