//! Purpose: Dense count tables before and after schema projection.
//! Exports: `ItemId`, `DenseTable`, `ExternalTable`.
//! Role: `DenseTable` is indexed by `id - min_id`; `ExternalTable` by a schema's order.
//! Invariants: `DenseTable` has exactly one slot per id in range and is immutable once built.
//! Invariants: `ExternalTable` distinguishes "absent" from "zero"; encoders pick the rendering.

pub type ItemId = i32;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DenseTable {
    min_id: ItemId,
    counts: Vec<i32>,
}

impl DenseTable {
    pub(crate) fn from_counts(min_id: ItemId, counts: Vec<i32>) -> Self {
        Self { min_id, counts }
    }

    pub fn min_id(&self) -> ItemId {
        self.min_id
    }

    pub fn max_id(&self) -> ItemId {
        self.min_id + self.counts.len() as ItemId - 1
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[i32] {
        &self.counts
    }

    /// Count for `id`, or `None` when `id` is outside the table's range.
    pub fn get(&self, id: ItemId) -> Option<i32> {
        let index = id.checked_sub(self.min_id)?;
        usize::try_from(index)
            .ok()
            .and_then(|index| self.counts.get(index))
            .copied()
    }

    /// `(id, count)` pairs in id order, including zero slots.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, i32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(move |(index, count)| (self.min_id + index as ItemId, *count))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalTable {
    slots: Vec<Option<i32>>,
}

impl ExternalTable {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Writes `count` at `order`; last write wins. Orders past the end are ignored.
    pub fn set(&mut self, order: usize, count: i32) {
        if let Some(slot) = self.slots.get_mut(order) {
            *slot = Some(count);
        }
    }

    pub fn get(&self, order: usize) -> Option<i32> {
        self.slots.get(order).copied().flatten()
    }

    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Values in order with absent slots rendered as 0.
    pub fn values_or_zero(&self) -> impl Iterator<Item = i32> + '_ {
        self.slots.iter().map(|slot| slot.unwrap_or(0))
    }
}
