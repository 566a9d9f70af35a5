use anyhow::Context;
use catbridge_core::{
    load_scoring_profiles, AppConfig, ScoringConfig, ScoringPreset, ScoringProfiles,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ProfileListing {
    active: String,
    builtin: Vec<String>,
    file: Vec<String>,
}

/// Loads the profiles file named by `CATBRIDGE_PROFILES_PATH`, if any.
pub(crate) fn load_file_profiles(config: &AppConfig) -> anyhow::Result<Option<ScoringProfiles>> {
    config
        .profiles_path
        .as_deref()
        .map(load_scoring_profiles)
        .transpose()
        .context("failed to load scoring profiles")
}

/// Resolves `name` against the profiles file first, then the built-in presets.
pub(crate) fn resolve(config: &AppConfig, name: &str) -> anyhow::Result<ScoringConfig> {
    let file_profiles = load_file_profiles(config)?;
    let scoring = catbridge_core::resolve_profile(name, file_profiles.as_ref())
        .with_context(|| format!("failed to resolve scoring profile '{name}'"))?;
    scoring
        .validate()
        .with_context(|| format!("scoring profile '{name}' is invalid"))?;
    Ok(scoring)
}

pub(crate) fn run_profiles(config: &AppConfig) -> anyhow::Result<()> {
    let file = load_file_profiles(config)?
        .map(|profiles| profiles.names().into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    let listing = ProfileListing {
        active: config.scoring_profile.clone(),
        builtin: ScoringPreset::ALL.iter().map(ToString::to_string).collect(),
        file,
    };
    println!("{}", crate::render_json(&config.env, &listing)?);
    Ok(())
}
