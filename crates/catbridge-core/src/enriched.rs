use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{AttributeValue, CatalogRecord};

/// A catalog record plus attributes borrowed from its linked counterparts
/// and the auxiliary reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub base: CatalogRecord,
    pub enriched_attrs: BTreeMap<String, AttributeValue>,
    /// Fraction of required attributes that resolved, in `[0, 1]`.
    pub enrichment_score: f64,
    /// Per attribute, how many linked records voted for each value.
    pub source_breakdown: BTreeMap<String, BTreeMap<String, usize>>,
    /// Number of distinct linked records that contributed.
    pub linked_count: usize,
    /// Whether any attribute came from the auxiliary table.
    pub aux_used: bool,
}

impl EnrichedRecord {
    /// Wraps a record without any enrichment.
    #[must_use]
    pub fn bare(base: CatalogRecord) -> Self {
        Self {
            base,
            enriched_attrs: BTreeMap::new(),
            enrichment_score: 0.0,
            source_breakdown: BTreeMap::new(),
            linked_count: 0,
            aux_used: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.base.id
    }

    /// Resolves an attribute: enriched value first, then the record's own.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.enriched_attrs
            .get(name)
            .and_then(AttributeValue::as_text)
            .or_else(|| self.base.text(name))
    }

    /// `false` when nothing was borrowed from linked records or the
    /// auxiliary table.
    #[must_use]
    pub fn has_enrichment(&self) -> bool {
        !self.enriched_attrs.is_empty()
    }
}
