//! Candidate pools shared by every source record in a group.

use std::collections::HashMap;

use catbridge_core::attributes::{BRAND, CATEGORY, GENDER};
use catbridge_core::{CatalogRecord, EnrichedRecord};

/// Coarse partition key. Values are lower-cased; a missing value only
/// groups with other missing values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub category: Option<String>,
    pub gender: Option<String>,
    pub brand: Option<String>,
}

impl GroupKey {
    #[must_use]
    pub fn of(record: &EnrichedRecord) -> Self {
        let lower = |attr: &str| record.attr(attr).map(|v| v.to_lowercase());
        Self {
            category: lower(CATEGORY),
            gender: lower(GENDER),
            brand: lower(BRAND),
        }
    }

    /// Whether `record` can land in this group going by its raw values:
    /// each raw component is absent or equal to the key's, ignoring case.
    pub(crate) fn admits_raw(&self, record: &CatalogRecord) -> bool {
        let fits = |attr: &str, want: Option<&str>| match record.text(attr) {
            Some(value) => want == Some(value.to_lowercase().as_str()),
            None => true,
        };
        fits(CATEGORY, self.category.as_deref())
            && fits(GENDER, self.gender.as_deref())
            && fits(BRAND, self.brand.as_deref())
    }
}

/// Raw brand and category of a record, both required.
fn coarse_key(record: &CatalogRecord) -> Option<(String, String)> {
    let brand = record.text(BRAND)?.to_lowercase();
    let category = record.text(CATEGORY)?.to_lowercase();
    Some((brand, category))
}

/// Whether both records carry the same raw brand and category.
pub(crate) fn same_coarse_key(a: &CatalogRecord, b: &CatalogRecord) -> bool {
    coarse_key(a).is_some_and(|key| coarse_key(b).as_ref() == Some(&key))
}

/// Every enriched catalog-A record, indexed by id, group and raw coarse
/// attributes. Built once per run and only read afterwards.
#[derive(Debug, Default)]
pub(crate) struct CandidateIndex {
    records: Vec<EnrichedRecord>,
    by_id: HashMap<String, usize>,
    groups: HashMap<GroupKey, Vec<usize>>,
    coarse: HashMap<(String, String), Vec<usize>>,
}

impl CandidateIndex {
    /// Indexes records in catalog order. A repeated id keeps its first row.
    pub(crate) fn build(enriched: Vec<EnrichedRecord>) -> Self {
        let mut index = Self::default();
        let mut duplicates = 0usize;

        for record in enriched {
            if index.by_id.contains_key(record.id()) {
                duplicates += 1;
                continue;
            }
            let slot = index.records.len();
            index.by_id.insert(record.id().to_string(), slot);
            index
                .groups
                .entry(GroupKey::of(&record))
                .or_default()
                .push(slot);
            if let Some(key) = coarse_key(&record.base) {
                index.coarse.entry(key).or_default().push(slot);
            }
            index.records.push(record);
        }

        if duplicates > 0 {
            tracing::warn!(duplicates, "catalog a contains repeated ids; first row kept");
        }
        index
    }

    pub(crate) fn get(&self, id: &str) -> Option<&EnrichedRecord> {
        self.by_id.get(id).map(|&slot| &self.records[slot])
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Members of the source's group, the source itself excluded.
    pub(crate) fn pool<'a>(
        &'a self,
        source: &'a EnrichedRecord,
    ) -> impl Iterator<Item = &'a EnrichedRecord> + 'a {
        self.members(self.groups.get(&GroupKey::of(source)), source)
    }

    /// Records sharing the source's raw brand and category, itself excluded.
    pub(crate) fn coarse_matches<'a>(
        &'a self,
        source: &'a EnrichedRecord,
    ) -> impl Iterator<Item = &'a EnrichedRecord> + 'a {
        let slots = coarse_key(&source.base).and_then(|key| self.coarse.get(&key));
        self.members(slots, source)
    }

    fn members<'a>(
        &'a self,
        slots: Option<&'a Vec<usize>>,
        source: &'a EnrichedRecord,
    ) -> impl Iterator<Item = &'a EnrichedRecord> + 'a {
        slots
            .into_iter()
            .flatten()
            .map(|&slot| &self.records[slot])
            .filter(move |candidate| candidate.id() != source.id())
    }
}
