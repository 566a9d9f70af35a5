//! Weighted multi-factor similarity between two enriched records.

use std::collections::BTreeSet;

use catbridge_core::attributes::{LAST_CODE, LAST_FAMILY, LAST_TYPE, SIZES};
use catbridge_core::{parse_sizes, EnrichedRecord, ScoringConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Overlap at or above this earns the full size bonus.
pub const SIZE_FULL_OVERLAP: f64 = 0.8;
/// Overlap at or above this earns the partial size bonus.
pub const SIZE_PARTIAL_OVERLAP: f64 = 0.4;

/// Which last (mold) tier matched, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastTier {
    Exact,
    Family,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTier {
    High,
    Medium,
    Low,
    None,
}

/// Factor-by-factor account of one score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    /// `|S∩C| / |S|` when both sides expose sizes.
    pub size_overlap: Option<f64>,
    pub size: f64,
    /// Categorical attributes that matched, with their bonus.
    pub categorical: Vec<(String, f64)>,
    pub last_tier: Option<LastTier>,
    pub last: f64,
    /// Factor applied to the running score when no last tier matched.
    pub last_miss_factor: Option<f64>,
    pub stock_tier: Option<StockTier>,
    pub stock: f64,
    pub price: f64,
    pub enrichment: f64,
    /// Final score after clamping to `[0, max_score]`.
    pub total: f64,
}

impl ScoreBreakdown {
    /// Short human-readable summary of the contributing factors.
    #[must_use]
    pub fn rationale(&self) -> String {
        let mut parts = Vec::new();

        if let Some(overlap) = self.size_overlap {
            parts.push(format!("sizes {:.0}%", overlap * 100.0));
        }
        if !self.categorical.is_empty() {
            let names: Vec<&str> = self.categorical.iter().map(|(n, _)| n.as_str()).collect();
            parts.push(format!("same {}", names.join("/")));
        }
        match self.last_tier {
            Some(LastTier::Exact) => parts.push("same last".to_string()),
            Some(LastTier::Family) => parts.push("same last family".to_string()),
            Some(LastTier::Type) => parts.push("same last type".to_string()),
            None => parts.push("different last".to_string()),
        }
        match self.stock_tier {
            Some(StockTier::High) => parts.push("in stock".to_string()),
            Some(StockTier::Medium) => parts.push("stock medium".to_string()),
            Some(StockTier::Low) => parts.push("stock low".to_string()),
            Some(StockTier::None) => parts.push("out of stock".to_string()),
            None => {}
        }
        if self.price > 0.0 {
            parts.push("similar price".to_string());
        }
        if self.enrichment > 0.0 {
            parts.push("well described".to_string());
        }

        parts.join("; ")
    }
}

/// Share of the source's sizes that the candidate also offers.
///
/// `None` when either side exposes no sizes.
#[must_use]
pub fn size_overlap(source: &BTreeSet<String>, candidate: &BTreeSet<String>) -> Option<f64> {
    if source.is_empty() || candidate.is_empty() {
        return None;
    }
    let shared = source.intersection(candidate).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = shared as f64 / source.len() as f64;
    Some(ratio)
}

/// Sizes of an enriched record, from its own or borrowed `sizes` attribute.
#[must_use]
pub fn sizes_of(record: &EnrichedRecord) -> BTreeSet<String> {
    record
        .attr(SIZES)
        .map(|raw| parse_sizes(&raw))
        .unwrap_or_default()
}

/// Scores `candidate` as a recommendation for `source`.
#[must_use]
pub fn score(source: &EnrichedRecord, candidate: &EnrichedRecord, config: &ScoringConfig) -> f64 {
    score_breakdown(source, candidate, config).total
}

/// Scores `candidate` and reports every factor's contribution.
///
/// Additive size and categorical terms come first, then the last-tier
/// bonus or miss factor on the running total, then stock, price and
/// enrichment terms. The result is clamped to `[0, config.max_score]`.
#[must_use]
pub fn score_breakdown(
    source: &EnrichedRecord,
    candidate: &EnrichedRecord,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let mut running = config.base_score;

    let size_overlap = size_overlap(&sizes_of(source), &sizes_of(candidate));
    let size = size_overlap.map_or(0.0, |overlap| size_contribution(overlap, config));
    running += size;

    let mut categorical = Vec::new();
    for (attr, bonus) in config.categorical.pairs() {
        if same_value(source, candidate, attr) {
            running += bonus;
            categorical.push((attr.to_string(), bonus));
        }
    }

    let last_tier = last_tier(source, candidate);
    let (last, last_miss_factor) = match last_tier {
        Some(LastTier::Exact) => (config.last.exact_bonus, None),
        Some(LastTier::Family) => (config.last.family_bonus, None),
        Some(LastTier::Type) => (config.last.type_bonus, None),
        None => (0.0, Some(config.last.miss_factor)),
    };
    running += last;
    if let Some(factor) = last_miss_factor {
        running *= factor;
    }

    let stock_tier = candidate.base.stock().map(|stock| stock_tier(stock, config));
    let stock = match stock_tier {
        Some(StockTier::High) => config.stock.high_bonus,
        Some(StockTier::Medium) => config.stock.medium_bonus,
        Some(StockTier::Low) => config.stock.low_bonus,
        Some(StockTier::None) => -config.stock.out_of_stock_penalty,
        None => 0.0,
    };
    running += stock;

    let price = if prices_similar(source, candidate, config.price_tolerance) {
        config.price_bonus
    } else {
        0.0
    };
    running += price;

    let enrichment = if candidate.enrichment_score >= config.enrichment_threshold {
        config.enrichment_bonus
    } else {
        0.0
    };
    running += enrichment;

    ScoreBreakdown {
        base: config.base_score,
        size_overlap,
        size,
        categorical,
        last_tier,
        last,
        last_miss_factor,
        stock_tier,
        stock,
        price,
        enrichment,
        total: clamp_score(running, config.max_score),
    }
}

/// Bounds `value` to `[0, max]`. A NaN or negative `max` bounds to zero and
/// a NaN `value` becomes zero.
pub(crate) fn clamp_score(value: f64, max: f64) -> f64 {
    let upper = max.max(0.0);
    value.max(0.0).min(upper)
}

fn size_contribution(overlap: f64, config: &ScoringConfig) -> f64 {
    if overlap >= SIZE_FULL_OVERLAP {
        config.size.full_bonus
    } else if overlap >= SIZE_PARTIAL_OVERLAP {
        config.size.partial_bonus
    } else if overlap > 0.0 {
        config.size.partial_bonus * overlap / SIZE_PARTIAL_OVERLAP
    } else {
        -config.size.mismatch_penalty
    }
}

/// Case-insensitive equality; absent on either side is never a match.
fn same_value(source: &EnrichedRecord, candidate: &EnrichedRecord, attr: &str) -> bool {
    match (source.attr(attr), candidate.attr(attr)) {
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => false,
    }
}

fn last_tier(source: &EnrichedRecord, candidate: &EnrichedRecord) -> Option<LastTier> {
    if same_value(source, candidate, LAST_CODE) {
        Some(LastTier::Exact)
    } else if same_value(source, candidate, LAST_FAMILY) {
        Some(LastTier::Family)
    } else if same_value(source, candidate, LAST_TYPE) {
        Some(LastTier::Type)
    } else {
        None
    }
}

fn stock_tier(stock: i64, config: &ScoringConfig) -> StockTier {
    if stock >= config.stock.high_min {
        StockTier::High
    } else if stock >= config.stock.medium_min {
        StockTier::Medium
    } else if stock > 0 {
        StockTier::Low
    } else {
        StockTier::None
    }
}

fn prices_similar(source: &EnrichedRecord, candidate: &EnrichedRecord, tolerance: f64) -> bool {
    let (Some(a), Some(b)) = (source.base.price(), candidate.base.price()) else {
        return false;
    };
    if a <= Decimal::ZERO || b <= Decimal::ZERO {
        return false;
    }
    let Ok(tolerance) = Decimal::try_from(tolerance) else {
        return false;
    };
    let larger = a.max(b);
    (a - b).abs() / larger <= tolerance
}

#[cfg(test)]
#[path = "scoring_test.rs"]
mod tests;
