//! Attribute enrichment from linked catalog-B records.

use std::collections::{BTreeMap, HashMap, HashSet};

use catbridge_core::attributes::ENRICHED_ATTRIBUTES;
use catbridge_core::{
    AttributeValue, AuxiliaryTable, CatalogRecord, EnrichedRecord, LinkEdge, ScoringConfig,
};

use crate::vote::{majority_vote, tally};

/// Id lookup over a catalog that remembers each record's catalog position.
///
/// When an id occurs more than once, the first row wins.
#[derive(Debug)]
pub struct RecordLookup<'a> {
    by_id: HashMap<&'a str, (usize, &'a CatalogRecord)>,
}

impl<'a> RecordLookup<'a> {
    #[must_use]
    pub fn new(records: &'a [CatalogRecord]) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            by_id.entry(record.id.as_str()).or_insert((position, record));
        }
        Self { by_id }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'a CatalogRecord> {
        self.by_id.get(id).map(|(_, record)| *record)
    }

    #[must_use]
    pub fn with_position(&self, id: &str) -> Option<(usize, &'a CatalogRecord)> {
        self.by_id.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Builds [`EnrichedRecord`]s by majority vote over linked records, with the
/// auxiliary table as a secondary source.
#[derive(Debug, Clone)]
pub struct EnrichmentCollector {
    required: Vec<String>,
    attributes: Vec<String>,
}

impl EnrichmentCollector {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let required: Vec<String> = required
            .into_iter()
            .map(Into::into)
            .filter(|a: &String| !a.trim().is_empty())
            .collect();

        let mut attributes: Vec<String> =
            ENRICHED_ATTRIBUTES.iter().map(|a| (*a).to_string()).collect();
        for attr in &required {
            if !attributes.contains(attr) {
                attributes.push(attr.clone());
            }
        }

        Self {
            required,
            attributes,
        }
    }

    #[must_use]
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.required_attributes.iter().cloned())
    }

    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Enriches `record` from the catalog-B records its edges point at.
    ///
    /// Only edges whose `a_id` is the record's id are considered, and each
    /// linked record counts once however many edges reach it. Linked records
    /// vote in catalog-B order, so ties go to the value that appears first
    /// in that catalog. Attributes no linked record carries fall back to the
    /// auxiliary row for the record's id.
    #[must_use]
    pub fn enrich(
        &self,
        record: &CatalogRecord,
        edges: &[LinkEdge],
        catalog_b: &RecordLookup<'_>,
        aux: &AuxiliaryTable,
    ) -> EnrichedRecord {
        let mut seen = HashSet::new();
        let mut linked: Vec<(usize, &CatalogRecord)> = Vec::new();
        for edge in edges.iter().filter(|e| e.a_id == record.id) {
            if !seen.insert(edge.b_id.as_str()) {
                continue;
            }
            match catalog_b.with_position(&edge.b_id) {
                Some(entry) => linked.push(entry),
                None => {
                    tracing::debug!(
                        a_id = %record.id,
                        b_id = %edge.b_id,
                        "linked record missing from catalog b"
                    );
                }
            }
        }
        linked.sort_by_key(|(position, _)| *position);

        let aux_row = aux.get(&record.id);
        let mut enriched_attrs = BTreeMap::new();
        let mut source_breakdown = BTreeMap::new();
        let mut aux_used = false;

        for attr in &self.attributes {
            let values: Vec<String> = linked
                .iter()
                .filter_map(|(_, linked_record)| linked_record.text(attr))
                .collect();

            if let Some(winner) = majority_vote(values.iter().cloned()) {
                source_breakdown.insert(attr.clone(), tally(&values));
                enriched_attrs.insert(attr.clone(), AttributeValue::Text(winner));
            } else if let Some(value) = aux_row
                .and_then(|row| row.get(attr))
                .and_then(AttributeValue::as_text)
            {
                aux_used = true;
                enriched_attrs.insert(attr.clone(), AttributeValue::Text(value));
            }
        }

        let resolved = self
            .required
            .iter()
            .filter(|attr| enriched_attrs.contains_key(*attr))
            .count();
        let enrichment_score = if self.required.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let ratio = resolved as f64 / self.required.len() as f64;
            ratio
        };

        EnrichedRecord {
            base: record.clone(),
            enriched_attrs,
            enrichment_score,
            source_breakdown,
            linked_count: linked.len(),
            aux_used,
        }
    }
}
