//! Purpose: Project a dense inventory table into an external schema's ordering.
//! Exports: `ItemNames`, `SchemaLookup`, `ClampPolicy`, `remap`.
//! Role: Lookup tables are injected through the traits; remapping holds no schema data itself.
//! Invariants: The input table is only read; each call builds a fresh `ExternalTable`.
//! Invariants: Ids without a name, or names without an order, are dropped silently.
//! Invariants: Colliding orders resolve last write wins.
use crate::core::table::{DenseTable, ExternalTable, ItemId};
use serde::{Deserialize, Serialize};

/// Total map from item id to canonical name; `""` means the id has no canonical name.
pub trait ItemNames {
    fn name_of(&self, id: ItemId) -> &str;
}

/// One target schema's ordering and optional per-item caps.
pub trait SchemaLookup {
    /// Number of slots in the schema's ordering.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn order_of(&self, name: &str) -> Option<usize>;

    fn cap_of(&self, name: &str) -> Option<i32>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClampPolicy {
    /// Clamp every count into `[min, max]`; negatives become `min`.
    Fixed { min: i32, max: i32 },
    /// Cap each count at the schema's per-item maximum; uncapped or negative entries are dropped.
    PerItemCap,
}

impl ClampPolicy {
    /// Fixed 0..=7 inventory range used by planners that store counts as a small enum.
    pub const INVENTORY: ClampPolicy = ClampPolicy::Fixed { min: 0, max: 7 };

    /// True when every count this policy can yield lies inside `INVENTORY`.
    pub fn within_inventory(&self) -> bool {
        match (*self, Self::INVENTORY) {
            (ClampPolicy::Fixed { min, max }, ClampPolicy::Fixed { min: lo, max: hi }) => {
                lo <= min && min <= max && max <= hi
            }
            _ => false,
        }
    }

    /// Final count for one entry, or `None` when the entry must be left out.
    pub fn apply(&self, raw: i32, cap: Option<i32>) -> Option<i32> {
        match *self {
            ClampPolicy::Fixed { min, max } => Some(raw.clamp(min, max)),
            ClampPolicy::PerItemCap => {
                let count = raw.min(cap?);
                (count >= 0).then_some(count)
            }
        }
    }
}

pub fn remap<N, S>(table: &DenseTable, names: &N, schema: &S, policy: ClampPolicy) -> ExternalTable
where
    N: ItemNames + ?Sized,
    S: SchemaLookup + ?Sized,
{
    let mut out = ExternalTable::new(schema.len());
    for (id, raw) in table.iter() {
        let name = names.name_of(id);
        if name.is_empty() {
            continue;
        }
        let Some(order) = schema.order_of(name) else {
            continue;
        };
        let cap = match policy {
            ClampPolicy::PerItemCap => schema.cap_of(name),
            ClampPolicy::Fixed { .. } => None,
        };
        if let Some(count) = policy.apply(raw, cap) {
            out.set(order, count);
        }
    }
    out
}
