//! Purpose: Run the decode -> remap -> encode pipeline for each save slot.
//! Exports: `Exporter`, `SlotExport`, `SlotStatus`, `Payload`, `InventoryItem`.
//! Role: Orchestration over the pure core; callers decide how to write or report results.
//! Invariants: Slots are independent; one invalid slot never affects another.
//! Invariants: Payloads are produced only for slots that decoded with signal.
use crate::catalog::{Catalog, Schema};
use crate::core::decode::{DecodeIssue, DecodeOutcome, decode_region};
use crate::core::error::Error;
use crate::core::layout::RegionLayout;
use crate::core::schema::{ItemNames, remap};
use crate::core::table::{DenseTable, ItemId};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payload {
    pub schema: String,
    pub file_name: String,
    pub text: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SlotStatus {
    Exported(Vec<Payload>),
    Empty,
    Invalid(DecodeIssue),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotExport {
    /// 1-based slot number.
    pub slot: usize,
    pub offset: usize,
    pub status: SlotStatus,
}

impl SlotExport {
    pub fn status_label(&self) -> &'static str {
        match self.status {
            SlotStatus::Exported(_) => "exported",
            SlotStatus::Empty => "empty",
            SlotStatus::Invalid(_) => "invalid",
        }
    }

    pub fn payloads(&self) -> &[Payload] {
        match &self.status {
            SlotStatus::Exported(payloads) => payloads,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub count: i32,
}

#[derive(Clone, Debug)]
pub struct Exporter {
    catalog: Catalog,
    layout: RegionLayout,
    lang: Option<String>,
}

impl Exporter {
    pub fn new(catalog: Catalog, layout: RegionLayout) -> Result<Self, Error> {
        layout.validate()?;
        Ok(Self {
            catalog,
            layout,
            lang: None,
        })
    }

    pub fn with_lang(mut self, lang: Option<String>) -> Self {
        self.lang = lang;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &RegionLayout {
        &self.layout
    }

    /// Decodes the region for a 1-based slot, or `None` when no such slot is configured.
    pub fn decode_slot(&self, buf: &[u8], slot: usize) -> Option<DecodeOutcome> {
        let offset = *self.layout.offsets.get(slot.checked_sub(1)?)?;
        Some(decode_region(buf, offset, &self.layout))
    }

    pub fn encode_schema(&self, schema: &Schema, table: &DenseTable) -> String {
        let external = remap(table, self.catalog.names(), schema, schema.policy());
        schema.encode(&external, self.lang.as_deref())
    }

    /// One payload per catalog schema, in catalog order.
    pub fn export_table(&self, slot: usize, table: &DenseTable) -> Vec<Payload> {
        self.catalog
            .schemas()
            .iter()
            .map(|schema| Payload {
                schema: schema.id().to_string(),
                file_name: schema.output_name(slot),
                text: self.encode_schema(schema, table),
            })
            .collect()
    }

    pub fn export_buffer(&self, buf: &[u8]) -> Vec<SlotExport> {
        self.layout
            .offsets
            .iter()
            .enumerate()
            .map(|(idx, &offset)| {
                let slot = idx + 1;
                let status = match decode_region(buf, offset, &self.layout) {
                    DecodeOutcome::Decoded(table) => {
                        SlotStatus::Exported(self.export_table(slot, &table))
                    }
                    DecodeOutcome::Empty => SlotStatus::Empty,
                    DecodeOutcome::Invalid(issue) => SlotStatus::Invalid(issue),
                };
                let export = SlotExport {
                    slot,
                    offset,
                    status,
                };
                tracing::debug!(slot, offset, status = export.status_label(), "slot processed");
                export
            })
            .collect()
    }

    /// Named items with their raw counts; zero counts and unnamed ids are kept only with `all`.
    pub fn inventory(&self, table: &DenseTable, all: bool) -> Vec<InventoryItem> {
        let names = self.catalog.names();
        table
            .iter()
            .filter_map(|(id, count)| {
                let name = names.name_of(id);
                if !all && (name.is_empty() || count == 0) {
                    return None;
                }
                Some(InventoryItem {
                    id,
                    name: name.to_string(),
                    count,
                })
            })
            .collect()
    }
}
