//! Shared domain types.
//!
//! These types are intentionally kept plain so they can be:
//!
//! - built from CLI flags (plus defaults)
//! - passed between the fetch, regression, report, and plot stages
//! - constructed directly in tests without touching the network

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::domain::Region;
use crate::error::AppError;

/// Logical name of the response series.
pub const UNEMPLOYMENT_RATE: &str = "unemployment_rate";
/// Logical name of the manufacturing employment series.
pub const MANUFACTURING_EMPLOYMENT: &str = "manufacturing_employment";
/// Logical name of the housing permits series.
pub const HOUSING_PERMITS: &str = "housing_permits";

/// Regressors used by the default analysis (the intercept is added by the engine).
pub const DEFAULT_REGRESSORS: [&str; 2] = [MANUFACTURING_EMPLOYMENT, HOUSING_PERMITS];

/// What to do when `FRED_API_KEY` is not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CredentialPolicy {
    /// Warn and fetch through FRED's public download endpoint.
    BestEffort,
    /// Abort the run before any request is made.
    Required,
}

/// One catalog entry: a logical column name and the FRED series id behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesEntry {
    pub name: String,
    pub series_id: String,
}

/// Ordered mapping from logical column names to FRED series ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCatalog {
    entries: Vec<SeriesEntry>,
}

impl SeriesCatalog {
    /// Build a catalog, rejecting empty catalogs and duplicate names.
    pub fn new<N, S>(entries: impl IntoIterator<Item = (N, S)>) -> Result<Self, AppError>
    where
        N: Into<String>,
        S: Into<String>,
    {
        let mut out: Vec<SeriesEntry> = Vec::new();
        for (name, series_id) in entries {
            let name = name.into();
            let series_id = series_id.into();
            if name.trim().is_empty() || series_id.trim().is_empty() {
                return Err(AppError::Config(
                    "Series catalog entries need a name and a series id.".to_string(),
                ));
            }
            if out.iter().any(|e| e.name == name) {
                return Err(AppError::Config(format!(
                    "Duplicate series name '{name}' in catalog."
                )));
            }
            out.push(SeriesEntry { name, series_id });
        }
        if out.is_empty() {
            return Err(AppError::Config("Series catalog is empty.".to_string()));
        }
        Ok(Self { entries: out })
    }

    /// The three-series catalog for a US state.
    ///
    /// FRED names the state series `<XX>UR`, `<XX>MANEMP`, and `PERMIT<XX>`.
    pub fn for_region(region: &Region) -> Self {
        let code = region.code;
        Self {
            entries: vec![
                SeriesEntry {
                    name: UNEMPLOYMENT_RATE.to_string(),
                    series_id: format!("{code}UR"),
                },
                SeriesEntry {
                    name: MANUFACTURING_EMPLOYMENT.to_string(),
                    series_id: format!("{code}MANEMP"),
                },
                SeriesEntry {
                    name: HOUSING_PERMITS.to_string(),
                    series_id: format!("PERMIT{code}"),
                },
            ],
        }
    }

    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single provider observation. `None` marks a missing value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub region: Region,
    pub start: NaiveDate,
    /// `None` means "through the latest available observation".
    pub end: Option<NaiveDate>,
    pub results_dir: PathBuf,
    pub credential_policy: CredentialPolicy,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(end) = self.end {
            if end < self.start {
                return Err(AppError::Config(format!(
                    "End date {end} is before start date {}.",
                    self.start
                )));
            }
        }
        Ok(())
    }

    pub fn catalog(&self) -> SeriesCatalog {
        SeriesCatalog::for_region(&self.region)
    }
}

/// One fitted coefficient with its inference statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_stat: f64,
    /// Two-sided p-value from Student's t.
    pub p_value: f64,
    /// 95% confidence interval.
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Output of a single OLS fit. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    pub response: String,
    /// Intercept first (named `const`), then regressors in request order.
    pub coefficients: Vec<Coefficient>,
    pub n_obs: usize,
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub diagnostics: ResidualDiagnostics,
    pub sample_start: NaiveDate,
    pub sample_end: NaiveDate,
}

impl RegressionResult {
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

/// Residual and design diagnostics reported below the coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualDiagnostics {
    pub durbin_watson: f64,
    pub skew: f64,
    /// Non-excess kurtosis (3.0 for a normal distribution).
    pub kurtosis: f64,
    pub jarque_bera: f64,
    pub jarque_bera_pvalue: f64,
    pub condition_number: f64,
}
