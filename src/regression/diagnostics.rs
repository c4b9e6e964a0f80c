//! Residual diagnostics reported under the coefficient table.

use crate::domain::ResidualDiagnostics;
use crate::math::chi2_2df_upper_tail;

/// Compute residual diagnostics for a fitted model.
pub fn residual_diagnostics(residuals: &[f64], condition_number: f64) -> ResidualDiagnostics {
    let (skew, kurtosis) = skew_kurtosis(residuals);
    let n = residuals.len() as f64;
    let jarque_bera = n / 6.0 * (skew * skew + (kurtosis - 3.0).powi(2) / 4.0);

    ResidualDiagnostics {
        durbin_watson: durbin_watson(residuals),
        skew,
        kurtosis,
        jarque_bera,
        jarque_bera_pvalue: chi2_2df_upper_tail(jarque_bera),
        condition_number,
    }
}

/// Durbin-Watson statistic: `Σ(e_t - e_{t-1})² / Σe_t²`.
pub fn durbin_watson(residuals: &[f64]) -> f64 {
    let ssr: f64 = residuals.iter().map(|e| e * e).sum();
    let diff: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    diff / ssr
}

/// Population (biased) skew and non-excess kurtosis.
fn skew_kurtosis(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let moment = |p: i32| values.iter().map(|v| (v - mean).powi(p)).sum::<f64>() / n;
    let m2 = moment(2);
    let m3 = moment(3);
    let m4 = moment(4);

    (m3 / m2.powf(1.5), m4 / (m2 * m2))
}
