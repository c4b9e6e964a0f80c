use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Months, NaiveDate};
use state_indicators::app::pipeline::run_analysis;
use state_indicators::data::SeriesSource;
use state_indicators::domain::{AnalysisConfig, CredentialPolicy, Observation, Region};
use state_indicators::error::{AppError, EstimationError};
use state_indicators::plot::SCATTER_MATRIX_FILE;

/// In-memory provider keyed by FRED series id.
struct StaticSource {
    series: HashMap<String, Vec<Observation>>,
}

impl StaticSource {
    fn ohio(rate: &[f64], jobs: &[f64], permits: &[f64]) -> Self {
        let mut series = HashMap::new();
        series.insert("OHUR".to_string(), monthly(rate));
        series.insert("OHMANEMP".to_string(), monthly(jobs));
        series.insert("PERMITOH".to_string(), monthly(permits));
        Self { series }
    }
}

impl SeriesSource for StaticSource {
    fn fetch_series(
        &self,
        series_id: &str,
        _start: NaiveDate,
        _end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>, AppError> {
        self.series
            .get(series_id)
            .cloned()
            .ok_or_else(|| AppError::retrieval(series_id, "status 400 Bad Request"))
    }
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

fn monthly(values: &[f64]) -> Vec<Observation> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Observation {
            date: start().checked_add_months(Months::new(i as u32)).unwrap(),
            value: Some(v),
        })
        .collect()
}

fn config(results_dir: &Path) -> AnalysisConfig {
    AnalysisConfig {
        region: Region::OHIO,
        start: start(),
        end: None,
        results_dir: results_dir.to_path_buf(),
        credential_policy: CredentialPolicy::BestEffort,
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn realistic_source() -> StaticSource {
    let n = 36;
    let jobs: Vec<f64> = (0..n).map(|i| 1000.0 - 2.0 * i as f64 + (i % 5) as f64).collect();
    let permits: Vec<f64> = (0..n).map(|i| 2500.0 + 40.0 * ((i * 7) % 11) as f64).collect();
    let rate: Vec<f64> = jobs
        .iter()
        .zip(&permits)
        .enumerate()
        .map(|(i, (j, p))| 30.0 - 0.025 * j - 0.0004 * p + 0.05 * ((i % 3) as f64 - 1.0))
        .collect();
    StaticSource::ohio(&rate, &jobs, &permits)
}

#[test]
fn full_run_prints_summary_and_writes_two_charts() {
    let tmp = tempfile::tempdir().unwrap();
    let results = tmp.path().join("results");
    let source = realistic_source();

    let mut summary = Vec::new();
    let output = run_analysis(&source, &config(&results), &mut summary).unwrap();
    let text = String::from_utf8(summary).unwrap();

    assert!(text.contains("OLS Regression Results"));
    assert!(text.contains("manufacturing_employment"));
    assert!(text.contains("housing_permits"));
    assert_eq!(output.regression.coefficients.len(), 3);
    assert_eq!(output.regression.n_obs, 36);

    assert_eq!(
        file_names(&results),
        ["ohio_indicators.svg".to_string(), SCATTER_MATRIX_FILE.to_string()]
    );
    assert_eq!(output.artifacts.indicators, results.join("ohio_indicators.svg"));

    let svg = fs::read_to_string(&output.artifacts.indicators).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Economic Indicators in Ohio"));
}

#[test]
fn second_run_replaces_charts_instead_of_accumulating() {
    let tmp = tempfile::tempdir().unwrap();
    let results: PathBuf = tmp.path().join("results");

    // A stale file with the fixed name is overwritten.
    fs::create_dir_all(&results).unwrap();
    fs::write(results.join(SCATTER_MATRIX_FILE), "stale").unwrap();

    let source = realistic_source();
    run_analysis(&source, &config(&results), &mut Vec::new()).unwrap();
    let first = fs::read_to_string(results.join(SCATTER_MATRIX_FILE)).unwrap();
    assert_ne!(first, "stale");

    run_analysis(&source, &config(&results), &mut Vec::new()).unwrap();
    assert_eq!(file_names(&results).len(), 2);
    let second = fs::read_to_string(results.join(SCATTER_MATRIX_FILE)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn three_month_scenario_fits_three_coefficients() {
    let tmp = tempfile::tempdir().unwrap();
    let source = StaticSource::ohio(&[5.0, 5.2, 5.1], &[100.0, 98.0, 99.0], &[10.0, 9.0, 11.0]);

    let output = run_analysis(&source, &config(tmp.path()), &mut Vec::new()).unwrap();
    let r2 = output.regression.r_squared;
    assert_eq!(output.regression.coefficients.len(), 3);
    assert!((0.0..=1.0).contains(&r2), "r2 = {r2}");
}

#[test]
fn retrieval_failure_aborts_before_any_output() {
    let tmp = tempfile::tempdir().unwrap();
    let results = tmp.path().join("results");
    let mut source = realistic_source();
    source.series.remove("PERMITOH");

    let mut summary = Vec::new();
    let err = run_analysis(&source, &config(&results), &mut summary).unwrap_err();
    assert!(matches!(err, AppError::Retrieval { ref series_id, .. } if series_id == "PERMITOH"));
    assert_eq!(err.exit_code(), 3);
    assert!(summary.is_empty());
    assert!(!results.exists());
}

#[test]
fn too_few_rows_is_an_estimation_error() {
    let tmp = tempfile::tempdir().unwrap();
    let results = tmp.path().join("results");
    let source = StaticSource::ohio(&[5.0, 5.2], &[100.0, 98.0], &[10.0, 9.0]);

    let err = run_analysis(&source, &config(&results), &mut Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Estimation(EstimationError::Underdetermined { rows: 2, params: 3 })
    ));
    assert!(!results.exists());
}

#[test]
fn results_path_that_is_a_file_is_a_filesystem_error() {
    let tmp = tempfile::tempdir().unwrap();
    let results = tmp.path().join("results");
    fs::write(&results, "not a directory").unwrap();
    let source = realistic_source();

    let mut summary = Vec::new();
    let err = run_analysis(&source, &config(&results), &mut summary).unwrap_err();
    assert!(matches!(err, AppError::Filesystem { ref path, .. } if path == &results));
    assert_eq!(err.exit_code(), 5);
    // The summary is written before plotting starts.
    assert!(!summary.is_empty());
    assert_eq!(fs::read_to_string(&results).unwrap(), "not a directory");
}

/// Summary sink whose every write fails, like a closed stdout pipe.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn summary_write_failure_is_an_output_error() {
    let tmp = tempfile::tempdir().unwrap();
    let results = tmp.path().join("results");
    let source = realistic_source();

    let err = run_analysis(&source, &config(&results), &mut ClosedPipe).unwrap_err();
    assert!(matches!(err, AppError::Output(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    assert_eq!(err.exit_code(), 5);
    assert!(!results.exists());
}
