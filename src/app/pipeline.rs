//! The analysis workflow shared by the binary and the integration tests:
//! FRED fetch -> OLS fit -> summary -> charts
//!
//! The data source and the summary sink are parameters so the whole run can be
//! driven without network access or a terminal.

use std::io::Write;

use tracing::info;

use crate::data::{SeriesSource, download_series};
use crate::domain::{AnalysisConfig, DEFAULT_REGRESSORS, RegressionResult, TimeTable, UNEMPLOYMENT_RATE};
use crate::error::AppError;
use crate::plot::{PlotArtifacts, write_plots};
use crate::regression::fit_ols;

/// All outputs of a single run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub table: TimeTable,
    pub regression: RegressionResult,
    pub artifacts: PlotArtifacts,
}

/// Execute the full analysis, writing the regression summary to `summary`.
///
/// The summary is written before the charts are rendered, so a chart failure
/// still leaves the regression output behind.
pub fn run_analysis<S, W>(
    source: &S,
    config: &AnalysisConfig,
    summary: &mut W,
) -> Result<AnalysisOutput, AppError>
where
    S: SeriesSource + ?Sized,
    W: Write,
{
    config.validate()?;

    // 1) Fetch every series and align on date.
    let catalog = config.catalog();
    let table = download_series(source, &catalog, config.start, config.end)?;
    info!(rows = table.n_rows(), columns = table.columns().len(), "assembled table");

    // 2) Fit the regression.
    let regression = fit_ols(&table, UNEMPLOYMENT_RATE, &DEFAULT_REGRESSORS)?;

    // 3) Report.
    writeln!(summary, "{}", crate::report::format_summary(&regression))
        .map_err(AppError::Output)?;

    // 4) Charts.
    let artifacts = write_plots(&table, &config.region, &config.results_dir)?;

    Ok(AnalysisOutput {
        table,
        regression,
        artifacts,
    })
}
