//! Command-line parsing for the state indicators analysis.
//!
//! Every flag has a default, so a bare `indicators` run reproduces the standard
//! analysis: Ohio, January 2000 through the latest observation, charts in
//! `results/`, and a best-effort fetch when no API key is configured.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::domain::{CredentialPolicy, Region, parse_region};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "indicators",
    version,
    about = "Regress a US state's unemployment rate on manufacturing employment and housing permits (FRED-based)"
)]
pub struct Cli {
    /// US state postal code (e.g. OH, PA, MI).
    #[arg(long, default_value = "OH", value_parser = parse_region)]
    pub state: Region,

    /// First observation date (YYYY-MM-DD).
    #[arg(long, default_value = "2000-01-01")]
    pub start: NaiveDate,

    /// Last observation date (YYYY-MM-DD); defaults to the latest available.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Directory the charts are written to (created if missing).
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// What to do when FRED_API_KEY is not set.
    #[arg(
        long,
        value_enum,
        env = "FRED_CREDENTIAL_POLICY",
        default_value_t = CredentialPolicy::BestEffort
    )]
    pub credential_policy: CredentialPolicy,
}
