//! Result and run-option types shared by every orchestrator mode.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use catbridge_core::{AppConfig, Recommendation};
use catbridge_linker::DEFAULT_DELIMITERS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    /// At least `min_recommendations` were found, with or without fallback.
    Success,
    /// Fewer than `min_recommendations` even after fallback. Not a fault.
    Insufficient,
    /// The id could not be processed.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Candidates re-admitted under the relaxed threshold.
    Relaxed,
    /// Raw brand and category search for records with no enrichment.
    Coarse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub enrichment_score: f64,
    /// Candidates scored in the primary pass, self excluded.
    pub candidate_pool_size: usize,
    pub fallback_used: bool,
    /// The last strategy that ran, when any did.
    pub fallback_strategy: Option<FallbackStrategy>,
}

impl Diagnostics {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            enrichment_score: 0.0,
            candidate_pool_size: 0,
            fallback_used: false,
            fallback_strategy: None,
        }
    }
}

/// Outcome for one requested id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub id: String,
    pub status: RecommendationStatus,
    pub recommendations: Vec<Recommendation>,
    pub diagnostics: Diagnostics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub from_cache: bool,
}

impl RecommendationResult {
    /// A per-id fault. The batch carries on without it.
    #[must_use]
    pub fn failed(id: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            id: id.into(),
            status: RecommendationStatus::Error,
            recommendations: Vec::new(),
            diagnostics: Diagnostics::empty(),
            error: Some(error.to_string()),
            from_cache: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    PerItem,
    Batch,
    Parallel,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::PerItem => write!(f, "per_item"),
            RunMode::Batch => write!(f, "batch"),
            RunMode::Parallel => write!(f, "parallel"),
        }
    }
}

/// Knobs for a single orchestrator run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Inputs at or below this size use the per-item path in `run`.
    pub per_item_max: usize,
    /// Ids processed between progress callbacks and cancellation checks.
    pub progress_chunk: usize,
    pub max_concurrent_groups: usize,
    pub cache_ttl: Duration,
    pub cancel: Option<Arc<AtomicBool>>,
    pub delimiters: Vec<char>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            per_item_max: 25,
            progress_chunk: 50,
            max_concurrent_groups: 4,
            cache_ttl: Duration::from_secs(300),
            cancel: None,
            delimiters: DEFAULT_DELIMITERS.to_vec(),
        }
    }
}

impl RunOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            per_item_max: config.per_item_max,
            progress_chunk: config.progress_chunk,
            max_concurrent_groups: config.max_concurrent_groups,
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            cancel: None,
            delimiters: config.barcode_delimiters.clone(),
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub(crate) fn chunk_size(&self) -> usize {
        self.progress_chunk.max(1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub success: usize,
    pub insufficient: usize,
    pub error: usize,
    pub fallback: usize,
    pub cached: usize,
}

/// Everything one run produced, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub mode: RunMode,
    /// `true` when the run stopped early; `results` then covers only the
    /// ids finished before the stop.
    pub cancelled: bool,
    pub results: Vec<RecommendationResult>,
}

impl BatchReport {
    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        self.results
            .iter()
            .fold(StatusCounts::default(), |mut counts, result| {
                match result.status {
                    RecommendationStatus::Success => counts.success += 1,
                    RecommendationStatus::Insufficient => counts.insufficient += 1,
                    RecommendationStatus::Error => counts.error += 1,
                }
                if result.diagnostics.fallback_used {
                    counts.fallback += 1;
                }
                if result.from_cache {
                    counts.cached += 1;
                }
                counts
            })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RecommendationResult> {
        self.results.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(results: Vec<RecommendationResult>) -> BatchReport {
        BatchReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            mode: RunMode::Batch,
            cancelled: false,
            results,
        }
    }

    #[test]
    fn counts_tally_statuses() {
        let mut ok = RecommendationResult::failed("a1", "x");
        ok.status = RecommendationStatus::Success;
        ok.error = None;
        ok.diagnostics.fallback_used = true;
        let failed = RecommendationResult::failed("a2", "record 'a2' not found");

        let counts = report(vec![ok, failed]).counts();
        assert_eq!(counts.success, 1);
        assert_eq!(counts.error, 1);
        assert_eq!(counts.fallback, 1);
        assert_eq!(counts.insufficient, 0);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&RecommendationStatus::Insufficient).unwrap();
        assert_eq!(json, "\"insufficient\"");
        let json = serde_json::to_string(&RunMode::PerItem).unwrap();
        assert_eq!(json, "\"per_item\"");
    }

    #[test]
    fn zero_progress_chunk_is_treated_as_one() {
        let options = RunOptions {
            progress_chunk: 0,
            ..RunOptions::default()
        };
        assert_eq!(options.chunk_size(), 1);
    }

    #[test]
    fn cancel_flag_is_observed() {
        let flag = Arc::new(AtomicBool::new(false));
        let options = RunOptions::default().with_cancel(Arc::clone(&flag));
        assert!(!options.is_cancelled());
        flag.store(true, Ordering::Relaxed);
        assert!(options.is_cancelled());
    }
}
