use std::path::Path;

use catbridge_core::{AppConfig, Catalog};
use catbridge_linker::{link_table, CrossCatalogLinker};

use crate::input::load_catalog;

/// Links the two snapshots and prints the link table.
pub(crate) fn run_link(
    config: &AppConfig,
    catalog_a: &Path,
    catalog_b: &Path,
) -> anyhow::Result<()> {
    let catalog_a = load_catalog(catalog_a, Catalog::A)?;
    let catalog_b = load_catalog(catalog_b, Catalog::B)?;

    let linker = CrossCatalogLinker::new(config.barcode_delimiters.clone());
    let edges = linker.link(&catalog_a, &catalog_b);
    let rows = link_table(&edges);
    tracing::info!(
        catalog_a = catalog_a.len(),
        catalog_b = catalog_b.len(),
        links = rows.len(),
        "link table built"
    );

    println!("{}", crate::render_json(&config.env, &rows)?);
    Ok(())
}
