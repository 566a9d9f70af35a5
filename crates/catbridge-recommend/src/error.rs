use catbridge_core::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("catalog read failed: {0}")]
    Source(#[from] SourceError),

    #[error("record '{id}' not found in catalog a")]
    RecordNotFound { id: String },

    #[error("scoring worker failed: {0}")]
    Worker(String),
}
