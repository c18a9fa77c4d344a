//! Purpose: Load the injected name, order, cap and label tables from a JSON catalog.
//! Exports: `Catalog`, `ItemNameTable`, `Schema`, and the serde file model.
//! Role: Data-driven lookup services behind `ItemNames`/`SchemaLookup`; adding a schema is a data change.
//! Invariants: A schema entry's position is its external order.
//! Invariants: Catalogs are validated once at load; lookups afterwards are infallible.
use crate::core::encode::{OutputFormat, encode_delimited, encode_keyed};
use crate::core::error::{Error, ErrorKind};
use crate::core::layout::RegionLayout;
use crate::core::schema::{ClampPolicy, ItemNames, SchemaLookup};
use crate::core::table::{ExternalTable, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::path::{Component, Path};

pub const SLOT_PLACEHOLDER: &str = "{slot}";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub items: Vec<ItemEntry>,
    #[serde(default)]
    pub schemas: Vec<SchemaFile>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemEntry {
    pub id: ItemId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    pub id: String,
    pub format: OutputFormat,
    pub policy: ClampPolicy,
    pub output: String,
    pub entries: Vec<SchemaEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// Dense id -> name table; ids outside the range or never listed map to `""`.
#[derive(Clone, Debug)]
pub struct ItemNameTable {
    min_id: ItemId,
    names: Vec<String>,
}

impl ItemNameTable {
    fn build(items: &[ItemEntry], layout: &RegionLayout) -> Result<Self, Error> {
        let len = layout.num_items().ok_or_else(|| {
            Error::new(ErrorKind::Config).with_message(format!(
                "item id range {}..={} is unusable",
                layout.min_id, layout.max_id
            ))
        })?;
        let mut names = vec![String::new(); len];
        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if !layout.contains(item.id) {
                return Err(Error::new(ErrorKind::Config).with_message(format!(
                    "item id {} is outside {}..={}",
                    item.id, layout.min_id, layout.max_id
                )));
            }
            if !seen.insert(item.id) {
                return Err(Error::new(ErrorKind::Config)
                    .with_message(format!("duplicate item id {}", item.id)));
            }
            names[(item.id - layout.min_id) as usize] = item.name.clone();
        }
        Ok(Self {
            min_id: layout.min_id,
            names,
        })
    }
}

impl ItemNames for ItemNameTable {
    fn name_of(&self, id: ItemId) -> &str {
        id.checked_sub(self.min_id)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.names.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Clone, Debug)]
pub struct Schema {
    id: String,
    format: OutputFormat,
    policy: ClampPolicy,
    output: String,
    entries: Vec<SchemaEntry>,
    order: HashMap<String, usize>,
}

impl Schema {
    fn build(file: SchemaFile) -> Result<Self, Error> {
        let config_err = |message: String| {
            Error::new(ErrorKind::Config).with_message(format!("schema `{}`: {message}", file.id))
        };
        if file.id.trim().is_empty() {
            return Err(Error::new(ErrorKind::Config).with_message("schema id is empty"));
        }
        if !file.output.contains(SLOT_PLACEHOLDER) {
            return Err(config_err(format!(
                "output template must contain {SLOT_PLACEHOLDER}"
            )));
        }
        if !is_bare_file_name(&file.output) {
            return Err(config_err(format!(
                "output template `{}` must be a bare file name",
                file.output
            )));
        }
        if let ClampPolicy::Fixed { min, max } = file.policy {
            if min > max {
                return Err(config_err(format!("fixed policy range {min}..={max} is inverted")));
            }
        }
        // Keyed consumers store counts as 0..=7.
        if file.format == OutputFormat::Keyed && !file.policy.within_inventory() {
            return Err(config_err(
                "keyed output needs a fixed policy inside 0..=7".to_string(),
            ));
        }
        let mut order = HashMap::with_capacity(file.entries.len());
        for (position, entry) in file.entries.iter().enumerate() {
            if entry.name.is_empty() {
                return Err(config_err(format!("entry {position} has an empty name")));
            }
            if order.insert(entry.name.clone(), position).is_some() {
                return Err(config_err(format!("duplicate entry `{}`", entry.name)));
            }
        }
        Ok(Self {
            id: file.id,
            format: file.format,
            policy: file.policy,
            output: file.output,
            entries: file.entries,
            order,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn policy(&self) -> ClampPolicy {
        self.policy
    }

    /// Output file name for a 1-based slot number.
    pub fn output_name(&self, slot: usize) -> String {
        self.output.replace(SLOT_PLACEHOLDER, &slot.to_string())
    }

    /// Keys in schema order; `lang` picks a label set, falling back to the canonical name.
    pub fn keys(&self, lang: Option<&str>) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| {
                lang.and_then(|lang| entry.labels.get(lang))
                    .map(String::as_str)
                    .unwrap_or(entry.name.as_str())
            })
            .collect()
    }

    pub fn encode(&self, table: &ExternalTable, lang: Option<&str>) -> String {
        match self.format {
            OutputFormat::Delimited => encode_delimited(table),
            OutputFormat::Keyed => encode_keyed(table, &self.keys(lang)),
        }
    }
}

/// One normal path component: no separators, no `.`/`..`, not absolute.
fn is_bare_file_name(template: &str) -> bool {
    if template.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(template).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl SchemaLookup for Schema {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn order_of(&self, name: &str) -> Option<usize> {
        self.order.get(name).copied()
    }

    fn cap_of(&self, name: &str) -> Option<i32> {
        self.entries.get(self.order_of(name)?)?.cap
    }
}

#[derive(Clone, Debug)]
pub struct Catalog {
    names: ItemNameTable,
    schemas: Vec<Schema>,
}

impl Catalog {
    pub fn from_file(file: CatalogFile, layout: &RegionLayout) -> Result<Self, Error> {
        let names = ItemNameTable::build(&file.items, layout)?;
        let mut seen = HashSet::new();
        let mut schemas = Vec::with_capacity(file.schemas.len());
        for schema in file.schemas {
            if !seen.insert(schema.id.clone()) {
                return Err(Error::new(ErrorKind::Config)
                    .with_message(format!("duplicate schema id `{}`", schema.id)));
            }
            schemas.push(Schema::build(schema)?);
        }
        Ok(Self { names, schemas })
    }

    pub fn from_json_str(text: &str, layout: &RegionLayout) -> Result<Self, Error> {
        let file: CatalogFile = serde_json::from_str(text).map_err(|err| {
            Error::new(ErrorKind::Config)
                .with_message("invalid catalog json")
                .with_source(err)
        })?;
        Self::from_file(file, layout)
    }

    pub fn load(path: &Path, layout: &RegionLayout) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            let kind = if err.kind() == io::ErrorKind::NotFound {
                ErrorKind::NotFound
            } else {
                ErrorKind::Io
            };
            Error::new(kind)
                .with_message("failed to read catalog")
                .with_path(path)
                .with_source(err)
        })?;
        let catalog = Self::from_json_str(&text, layout).map_err(|err| err.with_path(path))?;
        tracing::debug!(
            path = %path.display(),
            schemas = catalog.schemas.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn names(&self) -> &ItemNameTable {
        &self.names
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn schema(&self, id: &str) -> Option<&Schema> {
        self.schemas.iter().find(|schema| schema.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::core::encode::OutputFormat;
    use crate::core::error::ErrorKind;
    use crate::core::layout::RegionLayout;
    use crate::core::schema::{ClampPolicy, ItemNames, SchemaLookup};
    use crate::core::table::ExternalTable;
    use serde_json::json;

    fn catalog_json() -> serde_json::Value {
        json!({
            "items": [
                { "id": 727, "name": "Attack Jewel 1" },
                { "id": 728, "name": "Defense Jewel 1" }
            ],
            "schemas": [
                {
                    "id": "honeyhunter",
                    "format": "delimited",
                    "policy": { "kind": "per_item_cap" },
                    "output": "honeyhunter-{slot}.txt",
                    "entries": [
                        { "name": "Defense Jewel 1", "cap": 5 },
                        { "name": "Attack Jewel 1", "cap": 3 }
                    ]
                },
                {
                    "id": "wikidb",
                    "format": "keyed",
                    "policy": { "kind": "fixed", "min": 0, "max": 7 },
                    "output": "mhw-wiki-db-{slot}.txt",
                    "entries": [
                        { "name": "Attack Jewel 1", "labels": { "japanese": "攻撃珠【１】" } },
                        { "name": "Defense Jewel 1" }
                    ]
                }
            ]
        })
    }

    fn load(value: serde_json::Value) -> Result<Catalog, crate::core::error::Error> {
        Catalog::from_json_str(&value.to_string(), &RegionLayout::default())
    }

    #[test]
    fn names_are_total_over_ids() {
        let catalog = load(catalog_json()).expect("catalog");
        assert_eq!(catalog.names().name_of(727), "Attack Jewel 1");
        assert_eq!(catalog.names().name_of(729), "");
        assert_eq!(catalog.names().name_of(0), "");
        assert_eq!(catalog.names().name_of(i32::MAX), "");
    }

    #[test]
    fn schema_lookups_follow_entry_order() {
        let catalog = load(catalog_json()).expect("catalog");
        let hh = catalog.schema("honeyhunter").expect("schema");
        assert_eq!(hh.format(), OutputFormat::Delimited);
        assert_eq!(hh.policy(), ClampPolicy::PerItemCap);
        assert_eq!(hh.order_of("Attack Jewel 1"), Some(1));
        assert_eq!(hh.cap_of("Attack Jewel 1"), Some(3));
        assert_eq!(hh.order_of("Vitality Jewel 4"), None);
        assert_eq!(hh.output_name(2), "honeyhunter-2.txt");
    }

    #[test]
    fn localized_keys_fall_back_to_names() {
        let catalog = load(catalog_json()).expect("catalog");
        let wiki = catalog.schema("wikidb").expect("schema");
        assert_eq!(wiki.keys(None), vec!["Attack Jewel 1", "Defense Jewel 1"]);
        assert_eq!(
            wiki.keys(Some("japanese")),
            vec!["攻撃珠【１】", "Defense Jewel 1"]
        );
        assert_eq!(
            wiki.encode(&ExternalTable::new(2), Some("japanese")),
            r#"{"攻撃珠【１】":0,"Defense Jewel 1":0}"#
        );
    }

    #[test]
    fn out_of_range_item_is_config_error() {
        let mut value = catalog_json();
        value["items"][0]["id"] = json!(5000);
        let err = load(value).expect_err("bad id");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn duplicate_entries_and_schemas_are_rejected() {
        let mut value = catalog_json();
        value["schemas"][0]["entries"][1]["name"] = json!("Defense Jewel 1");
        assert_eq!(load(value).expect_err("dup entry").kind(), ErrorKind::Config);

        let mut value = catalog_json();
        value["schemas"][1]["id"] = json!("honeyhunter");
        assert_eq!(load(value).expect_err("dup schema").kind(), ErrorKind::Config);
    }

    #[test]
    fn output_template_needs_slot_placeholder() {
        let mut value = catalog_json();
        value["schemas"][0]["output"] = json!("honeyhunter.txt");
        assert_eq!(load(value).expect_err("template").kind(), ErrorKind::Config);
    }

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let mut value = catalog_json();
        value["items"][1]["id"] = json!(727);
        let err = load(value).expect_err("dup item");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message().unwrap_or_default().contains("727"));
    }

    #[test]
    fn unusable_layout_is_config_error() {
        let inverted = RegionLayout {
            min_id: 10,
            max_id: 5,
            ..RegionLayout::default()
        };
        let err = Catalog::from_json_str(&json!({}).to_string(), &inverted).expect_err("inverted");
        assert_eq!(err.kind(), ErrorKind::Config);

        let wide = RegionLayout {
            min_id: i32::MIN,
            max_id: i32::MAX,
            ..RegionLayout::default()
        };
        let err = Catalog::from_json_str(&json!({}).to_string(), &wide).expect_err("wide");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn output_template_must_stay_inside_out_dir() {
        for template in [
            "/tmp/escape-{slot}.txt",
            "../x-{slot}.txt",
            "sub/x-{slot}.txt",
            "sub\\x-{slot}.txt",
        ] {
            let mut value = catalog_json();
            value["schemas"][0]["output"] = json!(template);
            let err = load(value).expect_err(template);
            assert_eq!(err.kind(), ErrorKind::Config, "{template}");
        }

        let mut value = catalog_json();
        value["schemas"][0]["output"] = json!("..honeyhunter-{slot}.txt");
        load(value).expect("dots inside a file name are fine");
    }

    #[test]
    fn keyed_schema_needs_inventory_range_policy() {
        let mut value = catalog_json();
        value["schemas"][1]["policy"] = json!({ "kind": "per_item_cap" });
        value["schemas"][1]["entries"][0]["cap"] = json!(50);
        let err = load(value).expect_err("keyed per-item cap");
        assert_eq!(err.kind(), ErrorKind::Config);

        let mut value = catalog_json();
        value["schemas"][1]["policy"] = json!({ "kind": "fixed", "min": 0, "max": 99 });
        assert_eq!(load(value).expect_err("wide fixed").kind(), ErrorKind::Config);

        let mut value = catalog_json();
        value["schemas"][0]["policy"] = json!({ "kind": "fixed", "min": 0, "max": 99 });
        load(value).expect("delimited schemas may use any fixed range");
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = Catalog::from_json_str("{\"items\":", &RegionLayout::default())
            .expect_err("parse");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.json");
        let err = Catalog::load(&path, &RegionLayout::default()).expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.path(), Some(path.as_path()));
    }
}
