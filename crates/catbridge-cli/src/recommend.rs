use std::path::PathBuf;

use catbridge_core::{AppConfig, Catalog, SnapshotSource};
use catbridge_recommend::{BatchReport, RecommendationOrchestrator, RunOptions, TtlCache};

use crate::input::{load_auxiliary, load_catalog};
use crate::ModeArg;

#[derive(Debug)]
pub(crate) struct RecommendArgs {
    pub catalog_a: PathBuf,
    pub catalog_b: PathBuf,
    pub aux: Option<PathBuf>,
    pub ids: Vec<String>,
    pub profile: Option<String>,
    pub mode: ModeArg,
}

/// Runs one recommendation pass over the snapshots and prints the report.
pub(crate) async fn run_recommend(config: &AppConfig, args: RecommendArgs) -> anyhow::Result<()> {
    let profile = args.profile.as_deref().unwrap_or(&config.scoring_profile);
    let scoring = crate::profiles::resolve(config, profile)?;

    let catalog_a = load_catalog(&args.catalog_a, Catalog::A)?;
    let catalog_b = load_catalog(&args.catalog_b, Catalog::B)?;
    let aux = load_auxiliary(args.aux.as_deref())?;

    let ids = if args.ids.is_empty() {
        catalog_a.iter().map(|r| r.id.clone()).collect()
    } else {
        args.ids
    };

    let source = SnapshotSource::new(catalog_a, catalog_b, aux);
    let cache = TtlCache::new();
    let orchestrator =
        RecommendationOrchestrator::new(&source, scoring, RunOptions::from_app_config(config))?
            .with_cache(&cache);

    let mut progress = |processed: usize, total: usize, message: &str| {
        tracing::info!(processed, total, message, "progress");
    };

    let report: BatchReport = match args.mode {
        ModeArg::Auto => orchestrator.run(&ids, &mut progress)?,
        ModeArg::Batch => orchestrator.run_batch(&ids, &mut progress)?,
        ModeArg::PerItem => orchestrator.run_per_item(&ids, &mut progress)?,
        ModeArg::Parallel => orchestrator.run_batch_parallel(&ids, &mut progress).await?,
    };

    let counts = report.counts();
    tracing::info!(
        run_id = %report.run_id,
        success = counts.success,
        insufficient = counts.insufficient,
        error = counts.error,
        "recommendations ready"
    );
    println!("{}", crate::render_json(&config.env, &report)?);
    Ok(())
}
