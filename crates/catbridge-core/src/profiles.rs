//! Loading extra scoring profiles from a YAML file.
//!
//! ```yaml
//! profiles:
//!   - name: winter-boots
//!     version: 2
//!     min_score_threshold: 0.55
//!     categorical:
//!       season: 0.15
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::scoring_config::{ScoringConfig, ScoringPreset};
use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringProfiles {
    pub profiles: Vec<ScoringConfig>,
}

impl ScoringProfiles {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScoringConfig> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Load and validate scoring profiles from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or any profile
/// fails validation.
pub fn load_scoring_profiles(path: &Path) -> Result<ScoringProfiles, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfilesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_scoring_profiles(&content)
}

/// Parse and validate scoring profiles from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` on parse failure, an invalid profile, or a
/// duplicated profile name.
pub fn parse_scoring_profiles(content: &str) -> Result<ScoringProfiles, ConfigError> {
    let profiles: ScoringProfiles = serde_yaml::from_str(content)?;
    validate_profiles(&profiles)?;
    Ok(profiles)
}

fn validate_profiles(profiles: &ScoringProfiles) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for profile in &profiles.profiles {
        profile.validate()?;
        if !seen.insert(profile.name.to_lowercase()) {
            return Err(ConfigError::DuplicateProfile(profile.name.clone()));
        }
    }
    Ok(())
}

/// Resolve a profile by name: file profiles shadow built-in presets.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownProfile`] if neither source knows the name.
pub fn resolve_profile(
    name: &str,
    file_profiles: Option<&ScoringProfiles>,
) -> Result<ScoringConfig, ConfigError> {
    if let Some(profile) = file_profiles.and_then(|p| p.get(name)) {
        return Ok(profile.clone());
    }
    let config = name.parse::<ScoringPreset>()?.config();
    config.validate()?;
    Ok(config)
}
