#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use catbridge_core::{
    AuxiliaryTable, Catalog, CatalogRecord, CatalogSource, SnapshotSource, SourceError,
};

pub const LINKED: usize = 95;
pub const TOTAL: usize = 100;

pub fn a_id(i: usize) -> String {
    format!("a{i:03}")
}

fn barcode(i: usize) -> String {
    format!("4601000000{i:03}")
}

/// 100 boots from one brand. The first 95 share a barcode with a fully
/// described catalog-B record; the last 5 have no barcode, sizes or stock
/// and carry only their raw brand and category.
pub fn footwear_catalogs() -> SnapshotSource {
    let mut catalog_a = Vec::with_capacity(TOTAL);
    let mut catalog_b = Vec::with_capacity(LINKED);

    for i in 0..TOTAL {
        let record = CatalogRecord::new(Catalog::A, a_id(i))
            .with_attr("category", "boots")
            .with_attr("brand", "Nord");
        if i < LINKED {
            catalog_a.push(
                record
                    .with_barcodes(format!("{};00000000", barcode(i)))
                    .with_attr("sizes", "38,39,40")
                    .with_attr("stock", 30_i64)
                    .with_attr("price", "100.00"),
            );
            catalog_b.push(
                CatalogRecord::new(Catalog::B, format!("b{i:03}"))
                    .with_barcodes(barcode(i))
                    .with_attr("category", "Boots")
                    .with_attr("gender", "female")
                    .with_attr("brand", "Nord")
                    .with_attr("season", "winter")
                    .with_attr("color", "black")
                    .with_attr("last_code", "L1"),
            );
        } else {
            catalog_a.push(record.with_attr("stock", 0_i64));
        }
    }

    SnapshotSource::new(catalog_a, catalog_b, AuxiliaryTable::new())
}

pub fn all_ids() -> Vec<String> {
    (0..TOTAL).map(a_id).collect()
}

pub fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

/// Counts every read reaching the wrapped source.
pub struct CountingSource<S> {
    inner: S,
    reads: AtomicUsize,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl<S: CatalogSource> CatalogSource for CountingSource<S> {
    fn records(
        &self,
        catalog: Catalog,
        ids: Option<&[String]>,
    ) -> Result<Vec<CatalogRecord>, SourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.records(catalog, ids)
    }

    fn auxiliary(&self, ids: Option<&[String]>) -> Result<AuxiliaryTable, SourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.auxiliary(ids)
    }
}

/// A source whose catalog B is always down.
pub struct BrokenCatalogB(pub SnapshotSource);

impl CatalogSource for BrokenCatalogB {
    fn records(
        &self,
        catalog: Catalog,
        ids: Option<&[String]>,
    ) -> Result<Vec<CatalogRecord>, SourceError> {
        match catalog {
            Catalog::A => self.0.records(catalog, ids),
            Catalog::B => Err(SourceError::Unavailable {
                catalog,
                reason: "connection refused".to_string(),
            }),
        }
    }

    fn auxiliary(&self, ids: Option<&[String]>) -> Result<AuxiliaryTable, SourceError> {
        self.0.auxiliary(ids)
    }
}
