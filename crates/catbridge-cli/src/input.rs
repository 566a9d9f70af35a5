//! JSON snapshot loading for the CLI.

use std::path::Path;

use anyhow::Context;
use catbridge_core::{AuxiliaryTable, Catalog, CatalogRecord};

/// Reads a JSON array of records and stamps them with `catalog`.
///
/// Records may omit the `catalog` field; any value they carry is replaced.
pub(crate) fn load_catalog(path: &Path, catalog: Catalog) -> anyhow::Result<Vec<CatalogRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {catalog} from {}", path.display()))?;
    parse_catalog(&content, catalog)
        .with_context(|| format!("failed to parse catalog {catalog} from {}", path.display()))
}

pub(crate) fn parse_catalog(content: &str, catalog: Catalog) -> anyhow::Result<Vec<CatalogRecord>> {
    let rows: Vec<RawRecord> = serde_json::from_str(content)?;
    let records: Vec<CatalogRecord> = rows
        .into_iter()
        .map(|row| CatalogRecord {
            catalog,
            id: row.id,
            attributes: row.attributes,
            barcodes: row.barcodes,
        })
        .collect();
    tracing::debug!(%catalog, records = records.len(), "catalog loaded");
    Ok(records)
}

pub(crate) fn load_auxiliary(path: Option<&Path>) -> anyhow::Result<AuxiliaryTable> {
    let Some(path) = path else {
        return Ok(AuxiliaryTable::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read auxiliary table from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse auxiliary table from {}", path.display()))
}

/// A record as it appears on disk, catalog tag optional.
#[derive(serde::Deserialize)]
struct RawRecord {
    id: String,
    #[serde(default)]
    attributes: std::collections::BTreeMap<String, Option<catbridge_core::AttributeValue>>,
    #[serde(default)]
    barcodes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_catalog_stamps_catalog_and_keeps_nulls() {
        let json = r#"[
            {"id": "a1", "barcodes": "4601234567890", "attributes": {"color": "black", "stock": 4, "heel": null}},
            {"catalog": "b", "id": "a2"}
        ]"#;
        let records = parse_catalog(json, Catalog::A).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.catalog == Catalog::A));
        assert_eq!(records[0].text("color").as_deref(), Some("black"));
        assert_eq!(records[0].stock(), Some(4));
        assert!(records[0].value("heel").is_none());
        assert!(records[1].barcodes.is_none());
    }

    #[test]
    fn parse_catalog_rejects_non_array() {
        assert!(parse_catalog(r#"{"id": "a1"}"#, Catalog::A).is_err());
    }

    #[test]
    fn missing_auxiliary_path_is_empty_table() {
        assert!(load_auxiliary(None).unwrap().is_empty());
    }
}
