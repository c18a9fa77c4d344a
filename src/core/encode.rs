//! Purpose: Render schema-ordered tables as planner text payloads.
//! Exports: `OutputFormat`, `encode_delimited`, `encode_keyed`.
//! Role: Small, pure formatters; no I/O and no clamping of their own.
//! Invariants: Both formats cover every schema slot; absent slots render as 0.
//! Invariants: No trailing delimiter after the last value in either format.
use crate::core::table::ExternalTable;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `3,0,7,...` over the full ordering.
    Delimited,
    /// `{"key":3,...}` over the schema key list.
    Keyed,
}

pub fn encode_delimited(table: &ExternalTable) -> String {
    let mut out = String::new();
    for (idx, value) in table.values_or_zero().enumerate() {
        if idx != 0 {
            out.push(',');
        }
        let _ = write!(out, "{value}");
    }
    out
}

/// `keys[i]` names slot `i`; the key list, not the table, decides which slots appear.
pub fn encode_keyed<K: AsRef<str>>(table: &ExternalTable, keys: &[K]) -> String {
    let mut out = String::from("{");
    for (idx, key) in keys.iter().enumerate() {
        if idx != 0 {
            out.push(',');
        }
        let encoded =
            serde_json::to_string(key.as_ref()).unwrap_or_else(|_| "\"\"".to_string());
        out.push_str(&encoded);
        out.push(':');
        let _ = write!(out, "{}", table.get(idx).unwrap_or(0));
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::{OutputFormat, encode_delimited, encode_keyed};
    use crate::core::table::ExternalTable;
    use serde_json::Value;

    #[test]
    fn delimited_defaults_absent_to_zero_without_trailing_comma() {
        let mut table = ExternalTable::new(4);
        table.set(0, 3);
        table.set(2, 7);
        assert_eq!(encode_delimited(&table), "3,0,7,0");
    }

    #[test]
    fn delimited_empty_schema_is_empty_string() {
        assert_eq!(encode_delimited(&ExternalTable::new(0)), "");
    }

    #[test]
    fn keyed_lists_every_key_even_when_unpopulated() {
        let table = ExternalTable::new(3);
        let keys = ["Attack Jewel 1", "Defense Jewel 1", "Vitality Jewel 4"];
        let text = encode_keyed(&table, &keys);
        assert_eq!(
            text,
            r#"{"Attack Jewel 1":0,"Defense Jewel 1":0,"Vitality Jewel 4":0}"#
        );
    }

    #[test]
    fn keyed_escapes_and_keeps_unicode() {
        let mut table = ExternalTable::new(2);
        table.set(1, 5);
        let keys = ["攻撃珠【１】", "Quote \"Jewel\""];
        let text = encode_keyed(&table, &keys);
        let parsed: Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(parsed["攻撃珠【１】"], 0);
        assert_eq!(parsed["Quote \"Jewel\""], 5);
        assert!(text.contains("攻撃珠【１】"));
    }

    #[test]
    fn format_names_are_snake_case() {
        let format: OutputFormat = serde_json::from_str("\"keyed\"").expect("format");
        assert_eq!(format, OutputFormat::Keyed);
    }
}
