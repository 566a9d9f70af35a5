//! Read interface to the catalog ingestion layer.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::catalog::{AttributeValue, Catalog, CatalogRecord};
use crate::error::SourceError;

/// Supplementary attribute values keyed by catalog-A record id.
pub type AuxiliaryTable = HashMap<String, BTreeMap<String, AttributeValue>>;

/// Bulk read access to catalog snapshots.
///
/// Every call is a single bulk read; passing `None` for `ids` reads the
/// whole catalog. Unknown ids are simply absent from the result.
pub trait CatalogSource: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SourceError`] if the catalog cannot be read.
    fn records(
        &self,
        catalog: Catalog,
        ids: Option<&[String]>,
    ) -> Result<Vec<CatalogRecord>, SourceError>;

    /// # Errors
    ///
    /// Returns [`SourceError`] if the auxiliary table cannot be read.
    fn auxiliary(&self, ids: Option<&[String]>) -> Result<AuxiliaryTable, SourceError>;
}

/// An in-memory [`CatalogSource`] over already-loaded snapshots.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    catalog_a: Vec<CatalogRecord>,
    catalog_b: Vec<CatalogRecord>,
    auxiliary: AuxiliaryTable,
}

impl SnapshotSource {
    #[must_use]
    pub fn new(
        catalog_a: Vec<CatalogRecord>,
        catalog_b: Vec<CatalogRecord>,
        auxiliary: AuxiliaryTable,
    ) -> Self {
        Self {
            catalog_a,
            catalog_b,
            auxiliary,
        }
    }

    #[must_use]
    pub fn catalog(&self, catalog: Catalog) -> &[CatalogRecord] {
        match catalog {
            Catalog::A => &self.catalog_a,
            Catalog::B => &self.catalog_b,
        }
    }
}

impl CatalogSource for SnapshotSource {
    fn records(
        &self,
        catalog: Catalog,
        ids: Option<&[String]>,
    ) -> Result<Vec<CatalogRecord>, SourceError> {
        let rows = self.catalog(catalog);
        Ok(match ids {
            None => rows.to_vec(),
            Some(ids) => {
                let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
                rows.iter()
                    .filter(|r| wanted.contains(r.id.as_str()))
                    .cloned()
                    .collect()
            }
        })
    }

    fn auxiliary(&self, ids: Option<&[String]>) -> Result<AuxiliaryTable, SourceError> {
        Ok(match ids {
            None => self.auxiliary.clone(),
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.auxiliary.get(id).map(|row| (id.clone(), row.clone())))
                .collect(),
        })
    }
}
