//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the FRED client under the configured credential policy
//! - runs the analysis pipeline with stdout as the summary sink

use clap::Parser;

use crate::cli::Cli;
use crate::data::FredClient;
use crate::domain::AnalysisConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `indicators` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = analysis_config_from_cli(&cli);
    config.validate()?;

    let client = FredClient::from_env(config.credential_policy)?;
    let output = pipeline::run_analysis(&client, &config, &mut std::io::stdout().lock())?;

    tracing::info!(
        indicators = %output.artifacts.indicators.display(),
        scatter_matrix = %output.artifacts.scatter_matrix.display(),
        "analysis complete"
    );
    Ok(())
}

pub fn analysis_config_from_cli(cli: &Cli) -> AnalysisConfig {
    AnalysisConfig {
        region: cli.state,
        start: cli.start,
        end: cli.end,
        results_dir: cli.results_dir.clone(),
        credential_policy: cli.credential_policy,
    }
}
