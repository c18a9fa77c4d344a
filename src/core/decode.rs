//! Purpose: Decode one inventory region into a dense count table.
//! Exports: `decode_region`, `DecodeOutcome`, `DecodeIssue`.
//! Role: Pure parse over caller-owned bytes; never panics on short or malformed input.
//! Invariants: Any out-of-range identifier discards the whole region; no partial tables.
//! Invariants: `Empty` is returned when no record carries a strictly positive count.
//! Invariants: Negative counts are stored as decoded; clamping happens at remap time.
//! Invariants: An unusable `RegionLayout` yields `Invalid(Layout)` before any byte is read.
use crate::core::error::{Error, ErrorKind};
use crate::core::layout::{RECORD_WIDTH, RegionLayout};
use crate::core::record::Record;
use crate::core::table::DenseTable;
use tracing::{debug, warn};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeOutcome {
    Decoded(DenseTable),
    Empty,
    Invalid(DecodeIssue),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeIssue {
    OutOfRangeIdentifier {
        index: usize,
        identifier: i32,
        count: i32,
    },
    Truncated {
        needed: usize,
        available: usize,
    },
    Layout {
        record_width: usize,
        min_id: i32,
        max_id: i32,
    },
}

impl DecodeOutcome {
    pub fn table(&self) -> Option<&DenseTable> {
        match self {
            DecodeOutcome::Decoded(table) => Some(table),
            _ => None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            DecodeOutcome::Decoded(_) => "decoded",
            DecodeOutcome::Empty => "empty",
            DecodeOutcome::Invalid(_) => "invalid",
        }
    }
}

impl DecodeIssue {
    pub fn code(&self) -> &'static str {
        match self {
            DecodeIssue::OutOfRangeIdentifier { .. } => "out_of_range_identifier",
            DecodeIssue::Truncated { .. } => "truncated",
            DecodeIssue::Layout { .. } => "layout",
        }
    }

    pub fn message(&self) -> String {
        match self {
            DecodeIssue::OutOfRangeIdentifier {
                index,
                identifier,
                count,
            } => format!(
                "error parsing decorations: index={index} id={identifier} count={count}"
            ),
            DecodeIssue::Truncated { needed, available } => format!(
                "region needs {needed} bytes but buffer holds {available}"
            ),
            DecodeIssue::Layout {
                record_width,
                min_id,
                max_id,
            } => format!(
                "unusable region layout: record_width={record_width} ids={min_id}..={max_id}"
            ),
        }
    }

    /// Converts the issue into a hard error for callers that do not skip bad regions.
    pub fn into_error(self, offset: usize) -> Error {
        let kind = match self {
            DecodeIssue::Layout { .. } => ErrorKind::Config,
            _ => ErrorKind::Corrupt,
        };
        let err = Error::new(kind)
            .with_message(self.message())
            .with_offset(offset as u64);
        match self {
            DecodeIssue::OutOfRangeIdentifier { index, .. } => err.with_index(index).with_hint(
                "The region offset does not point at a decoration list. Check the save is decrypted and the slot offsets are right.",
            ),
            DecodeIssue::Truncated { .. } => {
                err.with_hint("The buffer is too short for this slot. Is it a full decrypted save?")
            }
            DecodeIssue::Layout { .. } => err.with_hint(format!(
                "Records are {RECORD_WIDTH} bytes wide and the id range must not be inverted."
            )),
        }
    }
}

/// Decodes `layout.record_count` records starting at `offset`.
pub fn decode_region(buf: &[u8], offset: usize, layout: &RegionLayout) -> DecodeOutcome {
    let geometry = match (layout.num_items(), layout.region_len()) {
        (Some(num_items), Some(region_len)) if layout.record_width == RECORD_WIDTH => {
            Some((num_items, region_len))
        }
        _ => None,
    };
    let Some((num_items, region_len)) = geometry else {
        warn!(
            record_width = layout.record_width,
            min_id = layout.min_id,
            max_id = layout.max_id,
            "unusable region layout"
        );
        return DecodeOutcome::Invalid(DecodeIssue::Layout {
            record_width: layout.record_width,
            min_id: layout.min_id,
            max_id: layout.max_id,
        });
    };

    let needed = offset.saturating_add(region_len);
    if buf.len() < needed {
        warn!(offset, needed, available = buf.len(), "decoration region truncated");
        return DecodeOutcome::Invalid(DecodeIssue::Truncated {
            needed,
            available: buf.len(),
        });
    }

    let mut counts = vec![0i32; num_items];
    let mut any_positive = false;

    for index in 0..layout.record_count {
        let record = Record::decode_at(buf, offset + index * RECORD_WIDTH);
        if record.is_empty() {
            continue;
        }
        if !layout.contains(record.id) {
            warn!(
                offset,
                index,
                id = record.id,
                count = record.count,
                "decoration id out of range"
            );
            return DecodeOutcome::Invalid(DecodeIssue::OutOfRangeIdentifier {
                index,
                identifier: record.id,
                count: record.count,
            });
        }
        if record.count > 0 {
            any_positive = true;
        }
        counts[(record.id - layout.min_id) as usize] = record.count;
    }

    if !any_positive {
        debug!(offset, "decoration region holds no counts");
        return DecodeOutcome::Empty;
    }
    debug!(offset, "decoration region decoded");
    DecodeOutcome::Decoded(DenseTable::from_counts(layout.min_id, counts))
}
