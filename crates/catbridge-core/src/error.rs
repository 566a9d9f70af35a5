use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read scoring profiles file {path}: {source}")]
    ProfilesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scoring profiles file: {0}")]
    ProfilesFileParse(#[from] serde_yaml::Error),

    #[error("invalid scoring profile '{profile}': {reason}")]
    InvalidScoring { profile: String, reason: String },

    #[error("duplicate scoring profile name: '{0}'")]
    DuplicateProfile(String),

    #[error("unknown scoring profile: '{0}'")]
    UnknownProfile(String),
}

/// Failure reading from a [`crate::CatalogSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("catalog {catalog} is unavailable: {reason}")]
    Unavailable {
        catalog: crate::Catalog,
        reason: String,
    },

    #[error("auxiliary table is unavailable: {0}")]
    AuxiliaryUnavailable(String),
}
