//! Enrichment, similarity scoring and batch recommendation over linked
//! catalogs.

pub mod cache;
pub mod enrich;
pub mod error;
pub mod orchestrator;
pub mod scoring;
pub mod types;
pub mod vote;

pub use cache::{CacheKey, RecommendationCache, TtlCache};
pub use enrich::{EnrichmentCollector, RecordLookup};
pub use error::RecommendError;
pub use orchestrator::{GroupKey, Progress, RecommendationOrchestrator};
pub use scoring::{score, score_breakdown, size_overlap, LastTier, ScoreBreakdown, StockTier};
pub use types::{
    BatchReport, Diagnostics, FallbackStrategy, RecommendationResult, RecommendationStatus,
    RunMode, RunOptions, StatusCounts,
};
pub use vote::{majority_vote, tally};
