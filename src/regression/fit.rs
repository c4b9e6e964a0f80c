//! OLS fit of one table column on others, with statsmodels-style inference.
//!
//! Workflow:
//! 1) validate column names
//! 2) listwise deletion across every table column
//! 3) build the design matrix with a leading intercept column
//! 4) solve the normal equations
//! 5) derive standard errors, tests, and fit statistics

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{Coefficient, RegressionResult, TimeTable};
use crate::error::EstimationError;
use crate::math::{f_upper_tail, solve_normal_equations, student_t_quantile, student_t_two_sided};
use crate::regression::residual_diagnostics;

/// Name given to the intercept coefficient.
pub const INTERCEPT: &str = "const";

/// Regress `response` on `regressors` (plus an intercept).
///
/// Rows with a missing value in *any* table column are dropped before fitting,
/// so fitting an already-filtered table gives the same result.
///
/// Fails if fewer complete rows remain than parameters. With exactly as many rows
/// as parameters the fit is exact: estimates and R² are reported, and statistics
/// that divide by residual degrees of freedom are `NaN`.
pub fn fit_ols(
    table: &TimeTable,
    response: &str,
    regressors: &[&str],
) -> Result<RegressionResult, EstimationError> {
    for name in std::iter::once(response).chain(regressors.iter().copied()) {
        if table.column(name).is_none() {
            return Err(EstimationError::UnknownColumn(name.to_string()));
        }
    }

    let data = table.drop_missing();
    let n = data.n_rows();
    let k = regressors.len() + 1;
    debug!(
        rows = table.n_rows(),
        complete = n,
        dropped = table.n_rows() - n,
        "listwise deletion"
    );

    if n == 0 || n < k {
        return Err(EstimationError::Underdetermined { rows: n, params: k });
    }

    let y = DVector::from_vec(data.present_values(response));
    let columns: Vec<Vec<f64>> = regressors.iter().map(|r| data.present_values(r)).collect();
    let x = DMatrix::from_fn(n, k, |i, j| if j == 0 { 1.0 } else { columns[j - 1][i] });

    let solution = solve_normal_equations(&x, &y).ok_or(EstimationError::Singular)?;
    let beta = &solution.beta;

    let residuals: Vec<f64> = (&y - &x * beta).iter().copied().collect();
    let ssr: f64 = residuals.iter().map(|e| e * e).sum();
    let y_mean = y.mean();
    let tss: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let ess = tss - ssr;

    let df_model = k - 1;
    let df_resid = n - k;
    let n_f = n as f64;
    let dfr = df_resid as f64;

    let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { f64::NAN };
    let (sigma2, adj_r_squared) = if df_resid > 0 {
        (ssr / dfr, 1.0 - (1.0 - r_squared) * (n_f - 1.0) / dfr)
    } else {
        (f64::NAN, f64::NAN)
    };

    let f_statistic = if df_model > 0 && df_resid > 0 {
        (ess / df_model as f64) / (ssr / dfr)
    } else {
        f64::NAN
    };
    let f_pvalue = f_upper_tail(f_statistic, df_model as f64, dfr);

    let t_crit = student_t_quantile(0.975, dfr);
    let names = std::iter::once(INTERCEPT).chain(regressors.iter().copied());
    let coefficients = names
        .enumerate()
        .map(|(j, name)| {
            let estimate = beta[j];
            let std_error = (sigma2 * solution.xtx_inv[(j, j)]).sqrt();
            let t_stat = estimate / std_error;
            Coefficient {
                name: name.to_string(),
                estimate,
                std_error,
                t_stat,
                p_value: student_t_two_sided(t_stat, dfr),
                ci_low: estimate - t_crit * std_error,
                ci_high: estimate + t_crit * std_error,
            }
        })
        .collect();

    let log_likelihood =
        -n_f / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ssr / n_f).ln() + 1.0);
    let k_f = k as f64;

    let dates = data.dates();
    Ok(RegressionResult {
        response: response.to_string(),
        coefficients,
        n_obs: n,
        df_model,
        df_resid,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_pvalue,
        log_likelihood,
        aic: -2.0 * log_likelihood + 2.0 * k_f,
        bic: -2.0 * log_likelihood + k_f * n_f.ln(),
        diagnostics: residual_diagnostics(&residuals, solution.condition_number),
        sample_start: dates[0],
        sample_end: dates[n - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, NaiveDate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    use crate::domain::{Column, HOUSING_PERMITS, MANUFACTURING_EMPLOYMENT, UNEMPLOYMENT_RATE};

    fn monthly_dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        (0..n)
            .map(|i| start.checked_add_months(Months::new(i as u32)).unwrap())
            .collect()
    }

    fn table(columns: Vec<(&str, Vec<Option<f64>>)>) -> TimeTable {
        let n = columns[0].1.len();
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column {
                name: name.to_string(),
                values,
            })
            .collect();
        TimeTable::from_columns(monthly_dates(n), columns).unwrap()
    }

    fn full(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn simple_regression_matches_hand_computation() {
        let t = table(vec![
            ("y", full(&[1.0, 3.0, 2.0, 5.0, 4.0])),
            ("x", full(&[1.0, 2.0, 3.0, 4.0, 5.0])),
        ]);
        let res = fit_ols(&t, "y", &["x"]).unwrap();

        let c = res.coefficient(INTERCEPT).unwrap();
        let s = res.coefficient("x").unwrap();
        assert!((c.estimate - 0.6).abs() < 1e-10);
        assert!((s.estimate - 0.8).abs() < 1e-10);
        assert!((s.std_error - (1.2f64 / 10.0).sqrt()).abs() < 1e-10);
        assert!((res.r_squared - 0.64).abs() < 1e-10);
        assert!((res.adj_r_squared - 0.52).abs() < 1e-10);
        assert!((res.f_statistic - 16.0 / 3.0).abs() < 1e-9);
        assert!((res.f_pvalue - s.p_value).abs() < 1e-10);
        assert!(s.ci_low < s.estimate && s.estimate < s.ci_high);
        assert!((res.diagnostics.durbin_watson - 12.76 / 3.6).abs() < 1e-9);
        assert_eq!((res.n_obs, res.df_model, res.df_resid), (5, 1, 3));
    }

    #[test]
    fn recovers_known_linear_combination() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = Normal::new(0.0, 1e-6).unwrap();
        let x1_dist = Normal::new(600.0, 40.0).unwrap();
        let x2_dist = Normal::new(2.0, 0.5).unwrap();

        let n = 60;
        let mut y = Vec::with_capacity(n);
        let mut x1 = Vec::with_capacity(n);
        let mut x2 = Vec::with_capacity(n);
        for _ in 0..n {
            let a: f64 = x1_dist.sample(&mut rng);
            let b: f64 = x2_dist.sample(&mut rng);
            x1.push(a);
            x2.push(b);
            y.push(12.0 - 0.01 * a + 0.75 * b + noise.sample(&mut rng));
        }

        let t = table(vec![
            (UNEMPLOYMENT_RATE, full(&y)),
            (MANUFACTURING_EMPLOYMENT, full(&x1)),
            (HOUSING_PERMITS, full(&x2)),
        ]);
        let res = fit_ols(&t, UNEMPLOYMENT_RATE, &[MANUFACTURING_EMPLOYMENT, HOUSING_PERMITS])
            .unwrap();

        let est: Vec<f64> = res.coefficients.iter().map(|c| c.estimate).collect();
        assert!((est[0] - 12.0).abs() < 1e-4, "intercept {}", est[0]);
        assert!((est[1] + 0.01).abs() < 1e-6, "slope x1 {}", est[1]);
        assert!((est[2] - 0.75).abs() < 1e-5, "slope x2 {}", est[2]);
        assert!(res.r_squared > 0.999_999);
    }

    #[test]
    fn fitting_filtered_table_is_identical() {
        let t = table(vec![
            ("y", vec![Some(1.0), Some(2.5), None, Some(3.1), Some(4.2), Some(4.0), Some(6.3)]),
            ("x1", vec![Some(1.0), Some(2.0), Some(3.0), None, Some(5.0), Some(6.0), Some(7.0)]),
            ("x2", vec![Some(0.5), Some(0.1), Some(0.9), Some(0.2), Some(0.4), Some(0.8), Some(0.3)]),
            // Not a regressor, but its gaps still drop rows.
            ("aux", vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(1.0), None, Some(1.0)]),
        ]);

        let original = fit_ols(&t, "y", &["x1", "x2"]).unwrap();
        let filtered = fit_ols(&t.drop_missing(), "y", &["x1", "x2"]).unwrap();
        assert_eq!(original, filtered);
        assert_eq!(original.n_obs, 4);
    }

    #[test]
    fn too_few_rows_is_an_estimation_error() {
        let t = table(vec![
            ("y", vec![Some(1.0), Some(2.0), Some(3.0)]),
            ("x1", vec![Some(1.0), Some(4.0), None]),
            ("x2", vec![Some(2.0), Some(3.0), Some(5.0)]),
        ]);
        assert_eq!(
            fit_ols(&t, "y", &["x1", "x2"]),
            Err(EstimationError::Underdetermined { rows: 2, params: 3 })
        );

        let empty = table(vec![("y", vec![None, Some(1.0)]), ("x", vec![Some(1.0), None])]);
        assert_eq!(
            fit_ols(&empty, "y", &["x"]),
            Err(EstimationError::Underdetermined { rows: 0, params: 2 })
        );
    }

    #[test]
    fn three_month_scenario_gives_three_coefficients() {
        let t = table(vec![
            (UNEMPLOYMENT_RATE, full(&[5.0, 5.2, 5.1])),
            (MANUFACTURING_EMPLOYMENT, full(&[100.0, 98.0, 99.0])),
            (HOUSING_PERMITS, full(&[10.0, 9.0, 11.0])),
        ]);
        let res = fit_ols(&t, UNEMPLOYMENT_RATE, &[MANUFACTURING_EMPLOYMENT, HOUSING_PERMITS])
            .unwrap();

        assert_eq!(res.coefficients.len(), 3);
        assert_eq!(res.coefficients[0].name, INTERCEPT);
        assert!((0.0..=1.0).contains(&res.r_squared), "r2 {}", res.r_squared);
        assert_eq!(res.df_resid, 0);
        assert!(res.coefficients[1].std_error.is_nan());
    }

    #[test]
    fn unknown_and_collinear_columns_fail() {
        let t = table(vec![
            ("y", full(&[1.0, 2.0, 4.0, 3.0])),
            ("x", full(&[1.0, 2.0, 3.0, 4.0])),
            ("x2", full(&[2.0, 4.0, 6.0, 8.0])),
        ]);
        assert_eq!(
            fit_ols(&t, "y", &["nope"]),
            Err(EstimationError::UnknownColumn("nope".to_string()))
        );
        assert_eq!(fit_ols(&t, "y", &["x", "x2"]), Err(EstimationError::Singular));
    }
}
