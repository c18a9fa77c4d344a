//! Purpose: End-to-end coverage of the public decode -> remap -> encode API.
//! Exports: Integration tests only.
//! Role: Exercise `api` the way an embedding caller would, with hand-built saves.
//! Invariants: Fixtures are synthetic; no real save data is required.

use deco_export::api::{
    Catalog, ClampPolicy, DecodeOutcome, Exporter, ItemNames, RegionLayout, Record, SaveBuffer,
    SchemaLookup, SlotStatus, decode_region, encode_delimited, encode_keyed, remap,
};
use serde_json::{Value, json};

fn catalog_json() -> Value {
    json!({
        "items": [
            { "id": 727, "name": "Attack Jewel 1" },
            { "id": 728, "name": "Defense Jewel 1" },
            { "id": 729, "name": "Vitality Jewel 4" },
            { "id": 2272, "name": "Guardian Jewel 2" }
        ],
        "schemas": [
            {
                "id": "honeyhunter",
                "format": "delimited",
                "policy": { "kind": "per_item_cap" },
                "output": "honeyhunter-{slot}.txt",
                "entries": [
                    { "name": "Attack Jewel 1", "cap": 3 },
                    { "name": "Defense Jewel 1", "cap": 7 },
                    { "name": "Vitality Jewel 4" },
                    { "name": "Guardian Jewel 2", "cap": 2 }
                ]
            },
            {
                "id": "wikidb",
                "format": "keyed",
                "policy": { "kind": "fixed", "min": 0, "max": 7 },
                "output": "mhw-wiki-db-{slot}.txt",
                "entries": [
                    { "name": "Defense Jewel 1", "labels": { "japanese": "防御珠【１】" } },
                    { "name": "Attack Jewel 1", "labels": { "japanese": "攻撃珠【１】" } },
                    { "name": "Guardian Jewel 2" }
                ]
            }
        ]
    })
}

fn layout() -> RegionLayout {
    RegionLayout::default().with_offsets(vec![64, 64 + 4000, 64 + 8000])
}

fn save_bytes(layout: &RegionLayout, slots: &[&[Record]]) -> Vec<u8> {
    let mut buf = vec![0u8; 64 + layout.region_len().expect("region len") * 3];
    for (slot, records) in slots.iter().enumerate() {
        for (index, record) in records.iter().enumerate() {
            let at = layout.offsets[slot] + index * layout.record_width;
            buf[at..at + layout.record_width].copy_from_slice(&record.encode());
        }
    }
    buf
}

fn exporter(layout: &RegionLayout) -> Exporter {
    let catalog = Catalog::from_json_str(&catalog_json().to_string(), layout).expect("catalog");
    Exporter::new(catalog, layout.clone()).expect("exporter")
}

#[test]
fn full_save_exports_each_schema_per_slot() {
    let layout = layout();
    let buf = save_bytes(
        &layout,
        &[
            &[
                Record::new(727, 99),
                Record::new(0, 0),
                Record::new(728, 4),
                Record::new(729, 6),
                Record::new(2272, -3),
            ],
            &[],
            &[Record::new(3000, 1)],
        ],
    );
    let save = SaveBuffer::from_bytes(buf);
    let slots = exporter(&layout).export_buffer(&save);

    let payloads = slots[0].payloads();
    assert_eq!(payloads.len(), 2);
    // Vitality Jewel 4 has no cap and Guardian Jewel 2 is negative: both stay 0.
    assert_eq!(payloads[0].text, "3,4,0,0");
    let wiki: Value = serde_json::from_str(&payloads[1].text).expect("json");
    assert_eq!(
        wiki,
        json!({ "Defense Jewel 1": 4, "Attack Jewel 1": 7, "Guardian Jewel 2": 0 })
    );

    assert_eq!(slots[1].status, SlotStatus::Empty);
    assert!(slots[1].payloads().is_empty());
    assert!(matches!(slots[2].status, SlotStatus::Invalid(_)));
}

#[test]
fn remap_round_trips_counts_under_caps() {
    let layout = layout();
    let exporter = exporter(&layout);
    let buf = save_bytes(
        &layout,
        &[&[Record::new(727, 2), Record::new(728, 5), Record::new(2272, 1)]],
    );
    let outcome = decode_region(&buf, layout.offsets[0], &layout);
    let table = outcome.table().expect("decoded");
    let names = exporter.catalog().names();

    for schema in exporter.catalog().schemas() {
        let external = remap(table, names, schema, schema.policy());
        for (id, count) in table.iter() {
            let name = names.name_of(id);
            if name.is_empty() {
                continue;
            }
            let Some(order) = schema.order_of(name) else {
                continue;
            };
            if schema.policy() == ClampPolicy::PerItemCap && schema.cap_of(name).is_none() {
                assert_eq!(external.get(order), None);
                continue;
            }
            assert_eq!(external.get(order), Some(count), "{} {name}", schema.id());
        }
    }
}

#[test]
fn fixed_policy_always_lands_in_inventory_range() {
    let layout = layout();
    let exporter = exporter(&layout);
    let schema = exporter.catalog().schema("wikidb").expect("schema");
    for raw in [i32::MIN, -1, 0, 3, 7, 8, i32::MAX] {
        let buf = save_bytes(&layout, &[&[Record::new(728, raw), Record::new(727, 1)]]);
        let DecodeOutcome::Decoded(table) = decode_region(&buf, layout.offsets[0], &layout) else {
            panic!("slot should decode");
        };
        let external = remap(&table, exporter.catalog().names(), schema, ClampPolicy::INVENTORY);
        let value = external.get(0).expect("populated");
        assert!((0..=7).contains(&value), "raw {raw} -> {value}");
    }
}

#[test]
fn keyed_output_keeps_every_key_when_nothing_resolves() {
    let layout = layout();
    let exporter = exporter(&layout);
    let schema = exporter.catalog().schema("wikidb").expect("schema");
    let buf = save_bytes(&layout, &[&[Record::new(1500, 3)]]);
    let outcome = decode_region(&buf, layout.offsets[0], &layout);
    let table = outcome.table().expect("decoded");

    let external = remap(table, exporter.catalog().names(), schema, schema.policy());
    assert_eq!(external.populated(), 0);
    assert_eq!(
        encode_keyed(&external, &schema.keys(Some("japanese"))),
        r#"{"防御珠【１】":0,"攻撃珠【１】":0,"Guardian Jewel 2":0}"#
    );
    assert_eq!(encode_delimited(&external), "0,0,0");
}

#[test]
fn all_empty_region_is_no_signal() {
    let layout = RegionLayout::default();
    let buf = vec![0u8; layout.region_len().expect("region len")];
    assert_eq!(decode_region(&buf, 0, &layout), DecodeOutcome::Empty);
}
