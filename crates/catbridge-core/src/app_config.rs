use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Name of the scoring profile to use, e.g. `"default"`.
    pub scoring_profile: String,
    /// Optional YAML file with extra scoring profiles.
    pub profiles_path: Option<PathBuf>,
    pub barcode_delimiters: Vec<char>,
    /// Batches at or below this size run in per-item mode.
    pub per_item_max: usize,
    pub progress_chunk: usize,
    pub max_concurrent_groups: usize,
    pub cache_ttl_secs: u64,
}
