//! The sort compiler: turns a sort specification into a chained multi-key
//! comparator.
//!
//! The first key orders the sequence; every subsequent key breaks ties left
//! by the keys before it, the ordering equivalent of an initial order
//! followed by "then by" orders. Null members sort first in ascending
//! order.

use crate::error::QueryResult;
use crate::schema::{lookup, resolve_path, Queryable, Record};
use crate::sort::EntitySort;
use smallvec::SmallVec;
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::marker::PhantomData;
use tracing::debug;

struct SortKey {
    segments: SmallVec<[SmolStr; 4]>,
    ascending: bool,
}

/// A compiled multi-key ordering over an element type.
pub struct SortPlan<T> {
    keys: Vec<SortKey>,
    marker: PhantomData<fn(&T)>,
}

impl<T: Queryable> EntitySort<T> {
    /// Compile this specification into a sort plan.
    ///
    /// Compilation snapshots the current rule state; mutating a shared sort
    /// rule afterwards affects only later compilations. Any scalar field
    /// kind is sortable.
    pub fn compile(&self) -> QueryResult<SortPlan<T>> {
        debug!(keys = self.sort_rules().len(), "compiling sort specification");
        let mut keys = Vec::with_capacity(self.sort_rules().len());
        for rule in self.sort_rules() {
            let rule = rule.read().clone();
            let path = resolve_path::<T>(&rule.name)?;
            keys.push(SortKey {
                segments: path.segments,
                ascending: rule.ascending,
            });
        }
        Ok(SortPlan {
            keys,
            marker: PhantomData,
        })
    }
}

impl<T: Record> SortPlan<T> {
    /// Compare two records under this plan.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        for key in &self.keys {
            let va = lookup(a, &key.segments);
            let vb = lookup(b, &key.segments);
            let ord = va.compare(&vb).unwrap_or(Ordering::Equal);
            let ord = if key.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Whether the plan has no keys (compares everything equal).
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<T> std::fmt::Debug for SortPlan<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortPlan")
            .field("keys", &self.keys.len())
            .finish()
    }
}
