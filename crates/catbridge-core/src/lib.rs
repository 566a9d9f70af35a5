//! Shared data model and configuration for cross-catalog linking and
//! recommendation.

pub mod app_config;
pub mod attributes;
pub mod catalog;
pub mod config;
pub mod enriched;
pub mod error;
pub mod link;
pub mod profiles;
pub mod recommendation;
pub mod scoring_config;
pub mod source;

pub use app_config::{AppConfig, Environment};
pub use catalog::{parse_sizes, AttributeValue, Catalog, CatalogRecord};
pub use config::{load_app_config, load_app_config_from_env};
pub use enriched::EnrichedRecord;
pub use error::{ConfigError, SourceError};
pub use link::{link_confidence, BarcodeEntry, LinkEdge, LinkRow};
pub use profiles::{load_scoring_profiles, parse_scoring_profiles, resolve_profile, ScoringProfiles};
pub use recommendation::{rank, Recommendation};
pub use scoring_config::{
    CategoricalBonuses, LastWeights, ScoringConfig, ScoringPreset, SizeWeights, StockWeights,
};
pub use source::{AuxiliaryTable, CatalogSource, SnapshotSource};
