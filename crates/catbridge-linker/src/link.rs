//! Cross-catalog linkage on normalized barcodes.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use catbridge_core::{Catalog, CatalogRecord, LinkEdge, LinkRow};

use crate::barcode::{normalize, DEFAULT_DELIMITERS};

/// Restricts one side of a link run to a set of record ids.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    side: Catalog,
    ids: HashSet<String>,
}

impl LinkFilter {
    pub fn a_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            side: Catalog::A,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn b_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            side: Catalog::B,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn side(&self) -> Catalog {
        self.side
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// Where a B-side code occurs.
struct Hit<'r> {
    b_id: &'r str,
    b_order: usize,
    position: usize,
}

/// Joins catalog A to catalog B on shared barcodes.
#[derive(Debug, Clone)]
pub struct CrossCatalogLinker {
    delimiters: Vec<char>,
}

impl Default for CrossCatalogLinker {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITERS.to_vec())
    }
}

impl CrossCatalogLinker {
    #[must_use]
    pub fn new(delimiters: Vec<char>) -> Self {
        Self { delimiters }
    }

    #[must_use]
    pub fn delimiters(&self) -> &[char] {
        &self.delimiters
    }

    /// Links every record of `catalog_a` against every record of `catalog_b`.
    ///
    /// Returns at most one edge per `(a_id, b_id)` pair, ordered by first
    /// appearance in catalog A and then in catalog B. An empty catalog on
    /// either side yields an empty list.
    #[must_use]
    pub fn link(&self, catalog_a: &[CatalogRecord], catalog_b: &[CatalogRecord]) -> Vec<LinkEdge> {
        self.link_records(catalog_a.iter(), catalog_b.iter())
    }

    /// Like [`link`](Self::link), but records on the filtered side whose id is
    /// not in the filter are skipped before their barcodes are even parsed.
    #[must_use]
    pub fn link_filtered(
        &self,
        filter: &LinkFilter,
        catalog_a: &[CatalogRecord],
        catalog_b: &[CatalogRecord],
    ) -> Vec<LinkEdge> {
        match filter.side() {
            Catalog::A => self.link_records(
                catalog_a.iter().filter(|r| filter.contains(&r.id)),
                catalog_b.iter(),
            ),
            Catalog::B => self.link_records(
                catalog_a.iter(),
                catalog_b.iter().filter(|r| filter.contains(&r.id)),
            ),
        }
    }

    fn link_records<'r>(
        &self,
        catalog_a: impl Iterator<Item = &'r CatalogRecord>,
        catalog_b: impl Iterator<Item = &'r CatalogRecord>,
    ) -> Vec<LinkEdge> {
        let mut b_orders: HashMap<&str, usize> = HashMap::new();
        let mut index: HashMap<String, Vec<Hit<'r>>> = HashMap::new();
        let mut b_codes = 0usize;

        for record in catalog_b {
            let next = b_orders.len();
            let b_order = *b_orders.entry(record.id.as_str()).or_insert(next);
            for entry in normalize(&record.id, record.barcodes.as_deref(), &self.delimiters) {
                b_codes += 1;
                index.entry(entry.code).or_default().push(Hit {
                    b_id: record.id.as_str(),
                    b_order,
                    position: entry.position,
                });
            }
        }

        if index.is_empty() {
            tracing::debug!(b_records = b_orders.len(), "no catalog-B barcodes to link against");
            return Vec::new();
        }

        let mut a_orders: HashMap<&str, usize> = HashMap::new();
        let mut best: HashMap<(&str, &str), (usize, usize, LinkEdge)> = HashMap::new();
        let mut candidates = 0usize;

        for record in catalog_a {
            let next = a_orders.len();
            let a_order = *a_orders.entry(record.id.as_str()).or_insert(next);
            for entry in normalize(&record.id, record.barcodes.as_deref(), &self.delimiters) {
                let Some(hits) = index.get(&entry.code) else {
                    continue;
                };
                for hit in hits {
                    candidates += 1;
                    let edge = LinkEdge::new(
                        record.id.as_str(),
                        hit.b_id,
                        entry.code.as_str(),
                        entry.position,
                        hit.position,
                    );
                    match best.entry((record.id.as_str(), hit.b_id)) {
                        Entry::Occupied(mut slot) => {
                            if edge.preferred_over(&slot.get().2) {
                                slot.get_mut().2 = edge;
                            }
                        }
                        Entry::Vacant(slot) => {
                            slot.insert((a_order, hit.b_order, edge));
                        }
                    }
                }
            }
        }

        let mut ordered: Vec<(usize, usize, LinkEdge)> = best.into_values().collect();
        ordered.sort_by_key(|(a_order, b_order, _)| (*a_order, *b_order));
        let edges: Vec<LinkEdge> = ordered.into_iter().map(|(_, _, edge)| edge).collect();

        tracing::debug!(
            a_records = a_orders.len(),
            b_records = b_orders.len(),
            b_codes,
            candidates,
            edges = edges.len(),
            "cross-catalog link complete"
        );

        edges
    }
}

/// Groups edges by catalog-A id, first collapsing any repeated
/// `(a_id, b_id)` pair with the usual preference rule.
///
/// Edges handed in from outside may contain duplicates; aggregating over
/// them without this step double-counts linked records.
#[must_use]
pub fn edges_by_source(edges: &[LinkEdge]) -> HashMap<String, Vec<LinkEdge>> {
    let mut grouped: HashMap<String, Vec<LinkEdge>> = HashMap::new();
    let mut dropped = 0usize;

    for edge in edges {
        let group = grouped.entry(edge.a_id.clone()).or_default();
        if let Some(existing) = group.iter_mut().find(|e| e.b_id == edge.b_id) {
            dropped += 1;
            if edge.preferred_over(existing) {
                *existing = edge.clone();
            }
        } else {
            group.push(edge.clone());
        }
    }

    if dropped > 0 {
        tracing::warn!(dropped, "collapsed duplicate link edges");
    }

    grouped
}

/// Exported link table.
#[must_use]
pub fn link_table(edges: &[LinkEdge]) -> Vec<LinkRow> {
    edges.iter().map(LinkRow::from).collect()
}
