use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One ranked recommendation for a source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub candidate_id: String,
    pub score: f64,
    pub rationale: String,
}

impl Recommendation {
    /// Ranking order: score descending, then `candidate_id` ascending.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.candidate_id.cmp(&other.candidate_id))
    }
}

/// Sorts recommendations into ranking order and keeps at most `limit`.
pub fn rank(recommendations: &mut Vec<Recommendation>, limit: usize) {
    recommendations.sort_by(Recommendation::rank_cmp);
    recommendations.truncate(limit);
}
