//! Purpose: Shared JSON envelopes for slot results and inventory listings.
//! Exports: `slot_json`, `issue_json`, `inventory_json`.
//! Role: Keep CLI stdout shapes consistent across `export` and `inspect`.
//! Invariants: Stable key names; fields are additive-only.
//! Invariants: Payload text is never embedded, only file names.
use super::export::{InventoryItem, SlotExport, SlotStatus};
use crate::core::decode::DecodeIssue;
use serde_json::{Map, Value, json};

pub fn issue_json(issue: &DecodeIssue) -> Value {
    let mut map = Map::new();
    map.insert("code".to_string(), json!(issue.code()));
    map.insert("message".to_string(), json!(issue.message()));
    match *issue {
        DecodeIssue::OutOfRangeIdentifier {
            index,
            identifier,
            count,
        } => {
            map.insert("index".to_string(), json!(index));
            map.insert("id".to_string(), json!(identifier));
            map.insert("count".to_string(), json!(count));
        }
        DecodeIssue::Truncated { needed, available } => {
            map.insert("needed".to_string(), json!(needed));
            map.insert("available".to_string(), json!(available));
        }
        DecodeIssue::Layout {
            record_width,
            min_id,
            max_id,
        } => {
            map.insert("record_width".to_string(), json!(record_width));
            map.insert("min_id".to_string(), json!(min_id));
            map.insert("max_id".to_string(), json!(max_id));
        }
    }
    Value::Object(map)
}

pub fn slot_json(export: &SlotExport, files: &[String]) -> Value {
    let mut map = Map::new();
    map.insert("slot".to_string(), json!(export.slot));
    map.insert("offset".to_string(), json!(export.offset));
    map.insert("status".to_string(), json!(export.status_label()));
    if let SlotStatus::Invalid(issue) = &export.status {
        map.insert("issue".to_string(), issue_json(issue));
    }
    map.insert("files".to_string(), json!(files));
    Value::Object(map)
}

pub fn inventory_json(items: &[InventoryItem]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| json!({ "id": item.id, "name": item.name, "count": item.count }))
            .collect(),
    )
}
