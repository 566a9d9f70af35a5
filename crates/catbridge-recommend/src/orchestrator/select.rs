//! Scoring, thresholding and fallback for a single source record.

use catbridge_core::{rank, EnrichedRecord, Recommendation, ScoringConfig};

use super::pool::CandidateIndex;
use crate::scoring::{clamp_score, score_breakdown, size_overlap};
use crate::types::{Diagnostics, FallbackStrategy, RecommendationResult, RecommendationStatus};

/// Produces the ranked result for `source` from its group's pool.
///
/// When fewer than `min_recommendations` clear the threshold, candidates
/// are re-admitted under the relaxed threshold. If that is still short and
/// the source borrowed nothing at all, same-catalog records with the same
/// raw brand and category are added at the coarse score. The fallback
/// list is always a superset of the primary list.
pub(crate) fn recommend_for(
    source: &EnrichedRecord,
    index: &CandidateIndex,
    config: &ScoringConfig,
) -> RecommendationResult {
    let scored: Vec<Recommendation> = index
        .pool(source)
        .map(|candidate| {
            let breakdown = score_breakdown(source, candidate, config);
            Recommendation {
                candidate_id: candidate.id().to_string(),
                score: breakdown.total,
                rationale: breakdown.rationale(),
            }
        })
        .collect();
    let candidate_pool_size = scored.len();

    let threshold = config.min_score_threshold;
    let mut admitted: Vec<Recommendation> = scored
        .iter()
        .filter(|r| r.score >= threshold)
        .cloned()
        .collect();
    let mut fallback_strategy = None;

    if admitted.len() < config.min_recommendations {
        let relaxed = config.relaxed_threshold().min(threshold);
        admitted = scored.into_iter().filter(|r| r.score >= relaxed).collect();
        fallback_strategy = Some(FallbackStrategy::Relaxed);

        if admitted.len() < config.min_recommendations && !source.has_enrichment() {
            add_coarse_matches(source, index, config, &mut admitted);
            fallback_strategy = Some(FallbackStrategy::Coarse);
        }
    }

    rank(&mut admitted, config.max_recommendations);
    let status = if admitted.len() >= config.min_recommendations {
        RecommendationStatus::Success
    } else {
        RecommendationStatus::Insufficient
    };

    RecommendationResult {
        id: source.id().to_string(),
        status,
        recommendations: admitted,
        diagnostics: Diagnostics {
            enrichment_score: source.enrichment_score,
            candidate_pool_size,
            fallback_used: fallback_strategy.is_some(),
            fallback_strategy,
        },
        error: None,
        from_cache: false,
    }
}

/// Appends coarse matches not already admitted.
fn add_coarse_matches(
    source: &EnrichedRecord,
    index: &CandidateIndex,
    config: &ScoringConfig,
    admitted: &mut Vec<Recommendation>,
) {
    let source_sizes = source.base.sizes();
    let before = admitted.len();

    for candidate in index.coarse_matches(source) {
        if admitted.iter().any(|r| r.candidate_id == candidate.id()) {
            continue;
        }
        let overlap = size_overlap(&source_sizes, &candidate.base.sizes()).unwrap_or(0.0);
        let raw = config.coarse_base_score + config.coarse_size_bonus * overlap;
        let score = clamp_score(raw, config.max_score);
        admitted.push(Recommendation {
            candidate_id: candidate.id().to_string(),
            score,
            rationale: format!("coarse match on brand/category; sizes {:.0}%", overlap * 100.0),
        });
    }

    tracing::debug!(
        id = %source.id(),
        added = admitted.len() - before,
        "coarse fallback applied"
    );
}
