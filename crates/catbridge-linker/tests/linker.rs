//! Integration tests for `CrossCatalogLinker` over generated catalogs.
//!
//! Catalogs are generated from a seeded `StdRng` so runs are reproducible.

use std::collections::HashSet;

use catbridge_core::{Catalog, CatalogRecord};
use catbridge_linker::{codes, CrossCatalogLinker, LinkFilter, DEFAULT_DELIMITERS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds a catalog whose barcodes are drawn from a small shared pool so
/// that many-to-many collisions are common.
fn generate_catalog(
    catalog: Catalog,
    prefix: &str,
    size: usize,
    rng: &mut StdRng,
) -> Vec<CatalogRecord> {
    (0..size)
        .map(|i| {
            let count = rng.random_range(0..4);
            let field = (0..count)
                .map(|_| format!("46000000{:05}", rng.random_range(0..40)))
                .collect::<Vec<_>>()
                .join(";");
            CatalogRecord::new(catalog, format!("{prefix}{i}")).with_barcodes(field)
        })
        .collect()
}

#[test]
fn example_primary_position_is_preferred() {
    let a = vec![CatalogRecord::new(Catalog::A, "a1").with_barcodes("4600000000001;4600000000002")];
    let b = vec![
        CatalogRecord::new(Catalog::B, "b_rec1").with_barcodes("4600000000002"),
        CatalogRecord::new(Catalog::B, "b_rec2").with_barcodes("4600000000001"),
    ];

    let edges = CrossCatalogLinker::default().link(&a, &b);
    let best = edges
        .iter()
        .max_by(|x, y| x.confidence.total_cmp(&y.confidence))
        .expect("at least one edge");

    assert_eq!(best.b_id, "b_rec2");
    assert_eq!(best.matched_code, "4600000000001");
    assert_eq!(best.a_position, 0);
    assert!((best.confidence - 1.0).abs() < f64::EPSILON);
}

#[test]
fn link_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    let a = generate_catalog(Catalog::A, "a", 200, &mut rng);
    let b = generate_catalog(Catalog::B, "b", 200, &mut rng);
    let linker = CrossCatalogLinker::default();

    let first = linker.link(&a, &b);
    let second = linker.link(&a, &b);
    assert!(!first.is_empty(), "generator should produce collisions");
    assert_eq!(first, second);
}

#[test]
fn at_most_one_edge_per_pair() {
    for seed in 1..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = generate_catalog(Catalog::A, "a", 60, &mut rng);
        let b = generate_catalog(Catalog::B, "b", 60, &mut rng);
        let edges = CrossCatalogLinker::default().link(&a, &b);

        let mut seen = HashSet::new();
        for edge in &edges {
            assert!(
                seen.insert((edge.a_id.clone(), edge.b_id.clone())),
                "seed {seed}: duplicate edge for ({}, {})",
                edge.a_id,
                edge.b_id
            );
        }
    }
}

#[test]
fn chosen_edge_has_minimal_a_position() {
    let mut rng = StdRng::seed_from_u64(42);
    let a = generate_catalog(Catalog::A, "a", 80, &mut rng);
    let b = generate_catalog(Catalog::B, "b", 80, &mut rng);
    let edges = CrossCatalogLinker::default().link(&a, &b);

    for edge in &edges {
        let a_codes = codes(
            a.iter().find(|r| r.id == edge.a_id).and_then(|r| r.barcodes.as_deref()),
            DEFAULT_DELIMITERS,
        );
        let b_codes: HashSet<String> = codes(
            b.iter().find(|r| r.id == edge.b_id).and_then(|r| r.barcodes.as_deref()),
            DEFAULT_DELIMITERS,
        )
        .into_iter()
        .collect();
        let first_shared = a_codes
            .iter()
            .position(|c| b_codes.contains(c))
            .expect("edge implies a shared code");
        assert_eq!(edge.a_position, first_shared);
        assert_eq!(edge.matched_code, a_codes[first_shared]);
    }
}

#[test]
fn filtered_link_is_a_subset_of_full_link() {
    let mut rng = StdRng::seed_from_u64(99);
    let a = generate_catalog(Catalog::A, "a", 100, &mut rng);
    let b = generate_catalog(Catalog::B, "b", 100, &mut rng);
    let linker = CrossCatalogLinker::default();

    let full = linker.link(&a, &b);
    let wanted = ["a3", "a10", "a57"];
    let filtered = linker.link_filtered(&LinkFilter::a_ids(wanted), &a, &b);

    let expected: Vec<_> = full
        .iter()
        .filter(|e| wanted.contains(&e.a_id.as_str()))
        .cloned()
        .collect();
    assert_eq!(filtered, expected);
}
