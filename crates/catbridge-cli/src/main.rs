use std::path::PathBuf;

use catbridge_core::Environment;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod input;
mod link;
mod profiles;
mod recommend;

#[derive(Debug, Parser)]
#[command(name = "catbridge")]
#[command(about = "Cross-catalog barcode linking and product recommendations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the barcode link table between two catalogs as JSON
    Link {
        /// Catalog A snapshot (JSON array of records)
        #[arg(long)]
        catalog_a: PathBuf,
        /// Catalog B snapshot (JSON array of records)
        #[arg(long)]
        catalog_b: PathBuf,
    },
    /// Recommend similar catalog-A products and print the run report as JSON
    Recommend {
        #[arg(long)]
        catalog_a: PathBuf,
        #[arg(long)]
        catalog_b: PathBuf,
        /// Auxiliary attribute table (JSON object keyed by catalog-A id)
        #[arg(long)]
        aux: Option<PathBuf>,
        /// Comma-separated catalog-A ids; defaults to every record
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
        /// Scoring profile name; overrides `CATBRIDGE_SCORING_PROFILE`
        #[arg(long)]
        profile: Option<String>,
        #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
        mode: ModeArg,
    },
    /// List built-in and file-defined scoring profiles
    Profiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Per-item for small inputs, batch otherwise
    Auto,
    Batch,
    PerItem,
    Parallel,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = catbridge_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, profile = %config.scoring_profile, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Link {
            catalog_a,
            catalog_b,
        }) => link::run_link(&config, &catalog_a, &catalog_b)?,
        Some(Commands::Recommend {
            catalog_a,
            catalog_b,
            aux,
            ids,
            profile,
            mode,
        }) => {
            let args = recommend::RecommendArgs {
                catalog_a,
                catalog_b,
                aux,
                ids,
                profile,
                mode,
            };
            recommend::run_recommend(&config, args).await?;
        }
        Some(Commands::Profiles) => profiles::run_profiles(&config)?,
        None => println!("catbridge ready; run with --help for commands"),
    }

    Ok(())
}

/// Production output is one compact JSON document; other environments
/// pretty-print.
pub(crate) fn render_json<T: Serialize>(
    env: &Environment,
    value: &T,
) -> serde_json::Result<String> {
    match env {
        Environment::Production => serde_json::to_string(value),
        Environment::Development | Environment::Test => serde_json::to_string_pretty(value),
    }
}
