//! Weight and threshold bundles for similarity scoring.
//!
//! A [`ScoringConfig`] is passed by value into every scoring call and never
//! mutated. Built-in bundles are selected through [`ScoringPreset`]; extra
//! bundles can be loaded from YAML (see [`crate::profiles`]).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::attributes;
use crate::ConfigError;

/// Size-overlap weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeWeights {
    /// Awarded when at least 80% of the source sizes are offered.
    pub full_bonus: f64,
    /// Awarded at 40% overlap; scaled down proportionally below that.
    pub partial_bonus: f64,
    /// Subtracted when the size sets are disjoint.
    pub mismatch_penalty: f64,
}

impl Default for SizeWeights {
    fn default() -> Self {
        Self {
            full_bonus: 0.2,
            partial_bonus: 0.1,
            mismatch_penalty: 0.1,
        }
    }
}

/// One bonus per categorical attribute, each gated independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoricalBonuses {
    pub season: f64,
    pub color: f64,
    pub material: f64,
    pub fastener: f64,
    pub sole: f64,
    pub heel: f64,
    pub toe: f64,
}

impl CategoricalBonuses {
    /// Attribute name paired with its bonus, in scoring order.
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, f64); 7] {
        [
            (attributes::SEASON, self.season),
            (attributes::COLOR, self.color),
            (attributes::MATERIAL, self.material),
            (attributes::FASTENER, self.fastener),
            (attributes::SOLE, self.sole),
            (attributes::HEEL, self.heel),
            (attributes::TOE, self.toe),
        ]
    }
}

impl Default for CategoricalBonuses {
    fn default() -> Self {
        Self {
            season: 0.08,
            color: 0.06,
            material: 0.06,
            fastener: 0.05,
            sole: 0.04,
            heel: 0.04,
            toe: 0.03,
        }
    }
}

/// Last (shoe mold) match tiers. Tiers are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastWeights {
    pub exact_bonus: f64,
    pub family_bonus: f64,
    pub type_bonus: f64,
    /// Multiplies the accumulated score when no tier matches.
    pub miss_factor: f64,
}

impl Default for LastWeights {
    fn default() -> Self {
        Self {
            exact_bonus: 0.15,
            family_bonus: 0.1,
            type_bonus: 0.05,
            miss_factor: 0.8,
        }
    }
}

/// Candidate availability tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockWeights {
    pub high_min: i64,
    pub medium_min: i64,
    pub high_bonus: f64,
    pub medium_bonus: f64,
    pub low_bonus: f64,
    pub out_of_stock_penalty: f64,
}

impl Default for StockWeights {
    fn default() -> Self {
        Self {
            high_min: 20,
            medium_min: 5,
            high_bonus: 0.06,
            medium_bonus: 0.04,
            low_bonus: 0.02,
            out_of_stock_penalty: 0.1,
        }
    }
}

/// A named, versioned bundle of scoring weights and thresholds.
///
/// Missing fields in a YAML profile take the value of the default preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub name: String,
    pub version: u32,
    pub base_score: f64,
    pub max_score: f64,
    pub min_score_threshold: f64,
    /// Subtracted from `min_score_threshold` when re-admitting candidates.
    pub relaxed_threshold_margin: f64,
    /// The relaxed threshold never drops below this value.
    pub relaxed_threshold_floor: f64,
    pub min_recommendations: usize,
    pub max_recommendations: usize,
    pub size: SizeWeights,
    pub categorical: CategoricalBonuses,
    pub last: LastWeights,
    pub stock: StockWeights,
    /// Maximum relative price difference that still earns `price_bonus`.
    pub price_tolerance: f64,
    pub price_bonus: f64,
    pub enrichment_threshold: f64,
    pub enrichment_bonus: f64,
    /// Base score for matches found by the brand + category fallback.
    pub coarse_base_score: f64,
    pub coarse_size_bonus: f64,
    /// Attributes counted by `enrichment_score`.
    pub required_attributes: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            version: 1,
            base_score: 0.3,
            max_score: 1.0,
            min_score_threshold: 0.5,
            relaxed_threshold_margin: 0.15,
            relaxed_threshold_floor: 0.25,
            min_recommendations: 3,
            max_recommendations: 10,
            size: SizeWeights::default(),
            categorical: CategoricalBonuses::default(),
            last: LastWeights::default(),
            stock: StockWeights::default(),
            price_tolerance: 0.2,
            price_bonus: 0.05,
            enrichment_threshold: 0.6,
            enrichment_bonus: 0.05,
            coarse_base_score: 0.35,
            coarse_size_bonus: 0.1,
            required_attributes: [
                attributes::CATEGORY,
                attributes::GENDER,
                attributes::BRAND,
                attributes::SEASON,
                attributes::COLOR,
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

impl ScoringConfig {
    /// Threshold used by the first fallback stage.
    #[must_use]
    pub fn relaxed_threshold(&self) -> f64 {
        (self.min_score_threshold - self.relaxed_threshold_margin)
            .max(self.relaxed_threshold_floor)
    }

    /// SHA-256 over the canonical JSON form, hex-encoded.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let canonical =
            serde_json::to_vec(self).unwrap_or_else(|_| format!("{self:?}").into_bytes());
        format!("{:x}", Sha256::digest(&canonical))
    }

    /// Checks the bundle for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidScoring`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidScoring {
            profile: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("profile name must be non-empty".to_string()));
        }

        for (field, value) in self.weights() {
            if !value.is_finite() {
                return Err(invalid(format!("{field} must be a finite number")));
            }
            if value < 0.0 {
                return Err(invalid(format!("{field} must not be negative, got {value}")));
            }
        }

        if self.max_score <= 0.0 {
            return Err(invalid(format!(
                "max_score must be positive, got {}",
                self.max_score
            )));
        }
        if self.min_score_threshold > self.max_score {
            return Err(invalid(format!(
                "min_score_threshold {} exceeds max_score {}",
                self.min_score_threshold, self.max_score
            )));
        }
        if self.base_score > self.max_score {
            return Err(invalid(format!(
                "base_score {} exceeds max_score {}",
                self.base_score, self.max_score
            )));
        }
        if self.relaxed_threshold_floor > self.min_score_threshold {
            return Err(invalid(format!(
                "relaxed_threshold_floor {} exceeds min_score_threshold {}",
                self.relaxed_threshold_floor, self.min_score_threshold
            )));
        }
        if self.last.miss_factor > 1.0 {
            return Err(invalid(format!(
                "last.miss_factor must be within [0, 1], got {}",
                self.last.miss_factor
            )));
        }
        if self.price_tolerance > 1.0 {
            return Err(invalid(format!(
                "price_tolerance must be within [0, 1], got {}",
                self.price_tolerance
            )));
        }
        if self.enrichment_threshold > 1.0 {
            return Err(invalid(format!(
                "enrichment_threshold must be within [0, 1], got {}",
                self.enrichment_threshold
            )));
        }
        if self.max_recommendations == 0 {
            return Err(invalid("max_recommendations must be at least 1".to_string()));
        }
        if self.min_recommendations > self.max_recommendations {
            return Err(invalid(format!(
                "min_recommendations {} exceeds max_recommendations {}",
                self.min_recommendations, self.max_recommendations
            )));
        }
        if self.stock.medium_min < 1 || self.stock.medium_min > self.stock.high_min {
            return Err(invalid(format!(
                "stock tiers must satisfy 1 <= medium_min <= high_min, got {} and {}",
                self.stock.medium_min, self.stock.high_min
            )));
        }
        if self.required_attributes.iter().all(|a| a.trim().is_empty()) {
            return Err(invalid("required_attributes must list at least one attribute".to_string()));
        }

        Ok(())
    }

    fn weights(&self) -> Vec<(&'static str, f64)> {
        let mut weights = vec![
            ("base_score", self.base_score),
            ("max_score", self.max_score),
            ("min_score_threshold", self.min_score_threshold),
            ("relaxed_threshold_margin", self.relaxed_threshold_margin),
            ("relaxed_threshold_floor", self.relaxed_threshold_floor),
            ("size.full_bonus", self.size.full_bonus),
            ("size.partial_bonus", self.size.partial_bonus),
            ("size.mismatch_penalty", self.size.mismatch_penalty),
            ("last.exact_bonus", self.last.exact_bonus),
            ("last.family_bonus", self.last.family_bonus),
            ("last.type_bonus", self.last.type_bonus),
            ("last.miss_factor", self.last.miss_factor),
            ("stock.high_bonus", self.stock.high_bonus),
            ("stock.medium_bonus", self.stock.medium_bonus),
            ("stock.low_bonus", self.stock.low_bonus),
            ("stock.out_of_stock_penalty", self.stock.out_of_stock_penalty),
            ("price_tolerance", self.price_tolerance),
            ("price_bonus", self.price_bonus),
            ("enrichment_threshold", self.enrichment_threshold),
            ("enrichment_bonus", self.enrichment_bonus),
            ("coarse_base_score", self.coarse_base_score),
            ("coarse_size_bonus", self.coarse_size_bonus),
        ];
        weights.extend(self.categorical.pairs());
        weights
    }
}

/// Built-in scoring bundles, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringPreset {
    Default,
    /// Higher bar, more recommendations demanded before fallback kicks in.
    Strict,
    /// Lower bar for sparse catalogs.
    Broad,
}

impl ScoringPreset {
    pub const ALL: [ScoringPreset; 3] = [
        ScoringPreset::Default,
        ScoringPreset::Strict,
        ScoringPreset::Broad,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ScoringPreset::Default => "default",
            ScoringPreset::Strict => "strict",
            ScoringPreset::Broad => "broad",
        }
    }

    #[must_use]
    pub fn config(self) -> ScoringConfig {
        let default = ScoringConfig::default();
        match self {
            ScoringPreset::Default => default,
            ScoringPreset::Strict => ScoringConfig {
                name: self.name().to_string(),
                min_score_threshold: 0.6,
                relaxed_threshold_margin: 0.1,
                relaxed_threshold_floor: 0.4,
                min_recommendations: 5,
                last: LastWeights {
                    miss_factor: 0.7,
                    ..default.last.clone()
                },
                price_tolerance: 0.15,
                enrichment_threshold: 0.8,
                ..default
            },
            ScoringPreset::Broad => ScoringConfig {
                name: self.name().to_string(),
                min_score_threshold: 0.4,
                relaxed_threshold_margin: 0.2,
                relaxed_threshold_floor: 0.2,
                min_recommendations: 2,
                max_recommendations: 20,
                last: LastWeights {
                    miss_factor: 0.9,
                    ..default.last.clone()
                },
                size: SizeWeights {
                    mismatch_penalty: 0.05,
                    ..default.size.clone()
                },
                enrichment_threshold: 0.4,
                ..default
            },
        }
    }
}

impl std::fmt::Display for ScoringPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoringPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(ScoringPreset::Default),
            "strict" => Ok(ScoringPreset::Strict),
            "broad" => Ok(ScoringPreset::Broad),
            _ => Err(ConfigError::UnknownProfile(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "scoring_config_test.rs"]
mod tests;
