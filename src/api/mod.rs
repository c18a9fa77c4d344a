//! Purpose: Define the public Rust API boundary for deco-export.
//! Exports: Core types and operations needed by the CLI and library users.
//! Role: Public, additive-only surface over the decode/remap/encode core.
//! Invariants: Lookup tables enter only through `Catalog` or the core lookup traits.

mod export;
mod report;

pub use crate::catalog::{Catalog, CatalogFile, ItemEntry, Schema, SchemaEntry, SchemaFile};
pub use crate::core::decode::{DecodeIssue, DecodeOutcome, decode_region};
pub use crate::core::encode::{OutputFormat, encode_delimited, encode_keyed};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::layout::{
    MAX_ITEM_ID, MIN_ITEM_ID, RECORD_WIDTH, RECORDS_PER_REGION, RegionLayout, SAVE_SLOT_OFFSETS,
};
pub use crate::core::record::Record;
pub use crate::core::save::SaveBuffer;
pub use crate::core::schema::{ClampPolicy, ItemNames, SchemaLookup, remap};
pub use crate::core::table::{DenseTable, ExternalTable, ItemId};
pub use export::{Exporter, InventoryItem, Payload, SlotExport, SlotStatus};
pub use report::{inventory_json, issue_json, slot_json};
