//! Batch recommendation runs over a [`CatalogSource`].
//!
//! Batch mode reads catalog A, catalog B and the auxiliary table once,
//! links and enriches every catalog-A record, and groups them by
//! [`GroupKey`] so each group's candidate pool is built a single time.
//! Per-item mode re-reads its inputs for every id and builds a pool from
//! the catalog-A rows that can share the source's group. It is meant for
//! small requests only. See [`RecommendationOrchestrator::run`].

mod parallel;
mod pool;
mod select;

use std::collections::HashSet;

use catbridge_core::{
    AuxiliaryTable, Catalog, CatalogRecord, CatalogSource, ConfigError, LinkEdge, ScoringConfig,
};
use catbridge_linker::{edges_by_source, CrossCatalogLinker, LinkFilter};
use chrono::Utc;
use uuid::Uuid;

pub use pool::GroupKey;

use crate::cache::{CacheKey, RecommendationCache};
use crate::enrich::{EnrichmentCollector, RecordLookup};
use crate::error::RecommendError;
use crate::types::{BatchReport, RecommendationResult, RecommendationStatus, RunMode, RunOptions};
use pool::{same_coarse_key, CandidateIndex};
use select::recommend_for;

/// Progress observer: `(processed, total, message)`.
pub type Progress<'p> = &'p mut dyn FnMut(usize, usize, &str);

pub struct RecommendationOrchestrator<'a> {
    source: &'a dyn CatalogSource,
    config: ScoringConfig,
    options: RunOptions,
    cache: Option<&'a dyn RecommendationCache>,
    fingerprint: String,
    linker: CrossCatalogLinker,
    collector: EnrichmentCollector,
}

impl<'a> RecommendationOrchestrator<'a> {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidScoring`] if `config` fails
    /// [`ScoringConfig::validate`].
    pub fn new(
        source: &'a dyn CatalogSource,
        config: ScoringConfig,
        options: RunOptions,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let fingerprint = config.fingerprint();
        let linker = CrossCatalogLinker::new(options.delimiters.clone());
        let collector = EnrichmentCollector::from_config(&config);
        Ok(Self {
            source,
            config,
            options,
            cache: None,
            fingerprint,
            linker,
            collector,
        })
    }

    /// Consults `cache` before computing an id and stores finished results.
    #[must_use]
    pub fn with_cache(mut self, cache: &'a dyn RecommendationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    #[must_use]
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Per-item mode for inputs of at most `per_item_max` distinct ids,
    /// batch mode above that.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::Source`] if a batch-mode bulk read fails.
    pub fn run(
        &self,
        ids: &[String],
        progress: Progress<'_>,
    ) -> Result<BatchReport, RecommendError> {
        if dedup_ids(ids).len() <= self.options.per_item_max {
            self.run_per_item(ids, progress)
        } else {
            self.run_batch(ids, progress)
        }
    }

    /// Preloads everything with three bulk reads, then processes ids in
    /// input order.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::Source`] if any of the bulk reads fails.
    /// Unknown ids are reported per id and never fail the run.
    pub fn run_batch(
        &self,
        ids: &[String],
        progress: Progress<'_>,
    ) -> Result<BatchReport, RecommendError> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        let ids = dedup_ids(ids);
        tracing::info!(
            %run_id,
            mode = %RunMode::Batch,
            ids = ids.len(),
            "recommendation run started"
        );

        let index = self.preload()?;
        let (results, cancelled) = self.process_chunks(&ids, progress, |id| match index.get(id) {
            Some(source) => recommend_for(source, &index, &self.config),
            None => {
                let err = RecommendError::RecordNotFound { id: id.to_string() };
                RecommendationResult::failed(id, err)
            }
        });

        Ok(self.finish(run_id, started_at, RunMode::Batch, cancelled, results))
    }

    /// Naive mode: every id triggers its own reads of the record, its
    /// auxiliary row, catalog B and catalog A. Only catalog-A rows whose raw
    /// category, gender and brand fit the source's group, or that share its
    /// raw brand and category, are linked and enriched as candidates. Read
    /// failures become per-id errors.
    ///
    /// # Errors
    ///
    /// Never fails at run level; the `Result` mirrors the other modes.
    pub fn run_per_item(
        &self,
        ids: &[String],
        progress: Progress<'_>,
    ) -> Result<BatchReport, RecommendError> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        let ids = dedup_ids(ids);
        tracing::info!(
            %run_id,
            mode = %RunMode::PerItem,
            ids = ids.len(),
            "recommendation run started"
        );

        let (results, cancelled) = self.process_chunks(&ids, progress, |id| {
            self.recommend_single(id)
                .unwrap_or_else(|err| RecommendationResult::failed(id, err))
        });

        Ok(self.finish(run_id, started_at, RunMode::PerItem, cancelled, results))
    }

    fn recommend_single(&self, id: &str) -> Result<RecommendationResult, RecommendError> {
        let wanted = [id.to_string()];
        let record = self
            .source
            .records(Catalog::A, Some(&wanted))?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| RecommendError::RecordNotFound { id: id.to_string() })?;
        let catalog_b = self.source.records(Catalog::B, None)?;
        let own_aux = self.source.auxiliary(Some(&wanted))?;

        let edges = self.linker.link_filtered(
            &LinkFilter::a_ids([id]),
            std::slice::from_ref(&record),
            &catalog_b,
        );
        let source = self
            .collector
            .enrich(&record, &edges, &RecordLookup::new(&catalog_b), &own_aux);

        let catalog_a = self.source.records(Catalog::A, None)?;
        let key = GroupKey::of(&source);
        let pool_ids: Vec<String> = catalog_a
            .iter()
            .filter(|r| r.id != id && (key.admits_raw(r) || same_coarse_key(r, &record)))
            .map(|r| r.id.clone())
            .collect();
        let filter = LinkFilter::a_ids(pool_ids.iter().cloned());
        let aux = self.source.auxiliary(Some(&pool_ids))?;
        let edges = self.linker.link_filtered(&filter, &catalog_a, &catalog_b);
        let pool_rows = catalog_a.iter().filter(|r| filter.contains(&r.id));
        let index = self.enrich_into_index(pool_rows, &edges, &catalog_b, &aux);
        tracing::debug!(id, pool_rows = index.len(), "per-item pool built");

        Ok(recommend_for(&source, &index, &self.config))
    }

    /// The three bulk reads of batch mode, then link and enrich.
    fn preload(&self) -> Result<CandidateIndex, RecommendError> {
        let catalog_a = self.source.records(Catalog::A, None)?;
        let catalog_b = self.source.records(Catalog::B, None)?;
        let aux = self.source.auxiliary(None)?;
        let edges = self.linker.link(&catalog_a, &catalog_b);
        let index = self.enrich_into_index(catalog_a.iter(), &edges, &catalog_b, &aux);
        tracing::debug!(
            catalog_a = catalog_a.len(),
            catalog_b = catalog_b.len(),
            aux_rows = aux.len(),
            indexed = index.len(),
            groups = index.group_count(),
            "preload complete"
        );
        Ok(index)
    }

    fn enrich_into_index<'r>(
        &self,
        rows: impl Iterator<Item = &'r CatalogRecord>,
        edges: &[LinkEdge],
        catalog_b: &[CatalogRecord],
        aux: &AuxiliaryTable,
    ) -> CandidateIndex {
        let by_source = edges_by_source(edges);
        let lookup = RecordLookup::new(catalog_b);

        let enriched = rows
            .map(|record| {
                let edges = by_source.get(&record.id).map_or(&[][..], Vec::as_slice);
                self.collector.enrich(record, edges, &lookup, aux)
            })
            .collect();
        CandidateIndex::build(enriched)
    }

    /// Runs `compute` over `ids` chunk by chunk, reporting progress and
    /// checking for cancellation between chunks.
    fn process_chunks<F>(
        &self,
        ids: &[String],
        progress: Progress<'_>,
        mut compute: F,
    ) -> (Vec<RecommendationResult>, bool)
    where
        F: FnMut(&str) -> RecommendationResult,
    {
        let total = ids.len();
        let mut results = Vec::with_capacity(total);

        for chunk in ids.chunks(self.options.chunk_size()) {
            if self.options.is_cancelled() {
                tracing::info!(processed = results.len(), total, "recommendation run cancelled");
                return (results, true);
            }
            for id in chunk {
                let result = match self.cached(id) {
                    Some(hit) => hit,
                    None => self.settle(compute(id)),
                };
                results.push(result);
            }
            let last = chunk.last().map_or("", String::as_str);
            progress(results.len(), total, &format!("processed {last}"));
        }

        (results, false)
    }

    fn cache_key(&self, id: &str) -> CacheKey {
        CacheKey::from_parts(id, &self.fingerprint)
    }

    fn cached(&self, id: &str) -> Option<RecommendationResult> {
        let mut hit = self.cache?.get(&self.cache_key(id))?;
        hit.from_cache = true;
        Some(hit)
    }

    /// Logs per-id faults and caches everything else.
    fn settle(&self, result: RecommendationResult) -> RecommendationResult {
        if result.status == RecommendationStatus::Error {
            tracing::warn!(
                id = %result.id,
                error = result.error.as_deref().unwrap_or("unknown"),
                "recommendation failed for id"
            );
        } else if let Some(cache) = self.cache {
            cache.put(self.cache_key(&result.id), result.clone(), self.options.cache_ttl);
        }
        result
    }

    fn finish(
        &self,
        run_id: Uuid,
        started_at: chrono::DateTime<Utc>,
        mode: RunMode,
        cancelled: bool,
        results: Vec<RecommendationResult>,
    ) -> BatchReport {
        let report = BatchReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            mode,
            cancelled,
            results,
        };
        let counts = report.counts();
        tracing::info!(
            %run_id,
            %mode,
            profile = %self.config.name,
            success = counts.success,
            insufficient = counts.insufficient,
            error = counts.error,
            fallback = counts.fallback,
            cached = counts.cached,
            cancelled,
            "recommendation run finished"
        );
        report
    }
}

/// Drops repeated ids, keeping the first occurrence.
fn dedup_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
