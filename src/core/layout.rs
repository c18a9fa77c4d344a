//! Purpose: Centralize the fixed byte layout of decoration inventory regions.
//! Exports: layout constants and `RegionLayout`.
//! Role: Caller-supplied geometry for `decode_region`; nothing here is inferred from data.
//! Invariants: A record is two little-endian i32 values (identifier, then count).
//! Invariants: `min_id <= max_id`; `num_items()` is the dense table length.
//! Invariants: Geometry accessors are checked and return `None` instead of wrapping.

use crate::core::error::{Error, ErrorKind};

pub const MIN_ITEM_ID: i32 = 727;
pub const MAX_ITEM_ID: i32 = 2272;

// 10 pages, 50 decorations per page.
pub const RECORDS_PER_REGION: usize = 50 * 10;
pub const RECORD_WIDTH: usize = 8;

/// Offsets of the three save slots' decoration lists in a decrypted save.
pub const SAVE_SLOT_OFFSETS: [usize; 3] = [4_302_696, 6_439_464, 8_576_232];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegionLayout {
    pub record_count: usize,
    pub record_width: usize,
    pub min_id: i32,
    pub max_id: i32,
    pub offsets: Vec<usize>,
}

impl Default for RegionLayout {
    fn default() -> Self {
        Self {
            record_count: RECORDS_PER_REGION,
            record_width: RECORD_WIDTH,
            min_id: MIN_ITEM_ID,
            max_id: MAX_ITEM_ID,
            offsets: SAVE_SLOT_OFFSETS.to_vec(),
        }
    }
}

impl RegionLayout {
    pub fn with_offsets(mut self, offsets: impl Into<Vec<usize>>) -> Self {
        self.offsets = offsets.into();
        self
    }

    /// Dense table length, or `None` when the id range is inverted or overflows.
    pub fn num_items(&self) -> Option<usize> {
        let span = self.max_id.checked_sub(self.min_id)?.checked_add(1)?;
        usize::try_from(span).ok()
    }

    pub fn region_len(&self) -> Option<usize> {
        self.record_count.checked_mul(self.record_width)
    }

    pub fn contains(&self, id: i32) -> bool {
        id >= self.min_id && id <= self.max_id
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.min_id > self.max_id {
            return Err(Error::new(ErrorKind::Config)
                .with_message(format!(
                    "item id range is inverted ({}..={})",
                    self.min_id, self.max_id
                )));
        }
        if self.num_items().is_none() {
            return Err(Error::new(ErrorKind::Config).with_message(format!(
                "item id range {}..={} is too wide",
                self.min_id, self.max_id
            )));
        }
        if self.min_id <= 0 {
            return Err(Error::new(ErrorKind::Config)
                .with_message("minimum item id must be positive; 0 marks an empty slot"));
        }
        if self.record_width != RECORD_WIDTH {
            return Err(Error::new(ErrorKind::Config).with_message(format!(
                "unsupported record width {} (expected {RECORD_WIDTH})",
                self.record_width
            )));
        }
        if self.region_len().is_none() {
            return Err(Error::new(ErrorKind::Config).with_message(format!(
                "region of {} records overflows",
                self.record_count
            )));
        }
        if self.offsets.is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("no region offsets configured")
                .with_hint("Pass at least one --offset, or omit it to use the save slot defaults."));
        }
        Ok(())
    }
}
