//! Terminal formatting of a regression result.
//!
//! The layout follows the familiar OLS summary: a two-column header of fit
//! statistics, the coefficient table, then residual diagnostics.

use crate::domain::RegressionResult;

const RULE_WIDTH: usize = 78;

/// Format the full regression summary.
pub fn format_summary(result: &RegressionResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:^RULE_WIDTH$}\n", "OLS Regression Results"));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    let sample = format!("{} .. {}", result.sample_start, result.sample_end);
    let rows = [
        ("Dep. Variable:", result.response.clone(), "R-squared:", fmt_num(result.r_squared, 3)),
        ("Model:", "OLS".to_string(), "Adj. R-squared:", fmt_num(result.adj_r_squared, 3)),
        ("Method:", "Least Squares".to_string(), "F-statistic:", fmt_num(result.f_statistic, 2)),
        ("Sample:", sample, "Prob (F-statistic):", fmt_sci(result.f_pvalue)),
        ("No. Observations:", result.n_obs.to_string(), "Log-Likelihood:", fmt_num(result.log_likelihood, 2)),
        ("Df Residuals:", result.df_resid.to_string(), "AIC:", fmt_num(result.aic, 2)),
        ("Df Model:", result.df_model.to_string(), "BIC:", fmt_num(result.bic, 2)),
    ];
    for (l_label, l_value, r_label, r_value) in &rows {
        out.push_str(&header_row(l_label, l_value, r_label, r_value));
    }

    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format_coefficients(result));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    let d = &result.diagnostics;
    let rows = [
        ("Durbin-Watson:", fmt_num(d.durbin_watson, 3), "Jarque-Bera (JB):", fmt_num(d.jarque_bera, 3)),
        ("Skew:", fmt_num(d.skew, 3), "Prob(JB):", fmt_num(d.jarque_bera_pvalue, 3)),
        ("Kurtosis:", fmt_num(d.kurtosis, 3), "Cond. No.:", fmt_sci(d.condition_number)),
    ];
    for (l_label, l_value, r_label, r_value) in &rows {
        out.push_str(&header_row(l_label, l_value, r_label, r_value));
    }
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    if result.df_resid == 0 {
        out.push_str(
            "Note: the model is exactly determined (0 residual degrees of freedom);\n\
             standard errors and tests are undefined.\n",
        );
    }

    out
}

/// Format the coefficient table.
pub fn format_coefficients(result: &RegressionResult) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<26} {:>10} {:>10} {:>8} {:>7} {:>10} {:>10}\n",
            "", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    for c in &result.coefficients {
        out.push_str(
            format!(
                "{:<26} {:>10} {:>10} {:>8} {:>7} {:>10} {:>10}\n",
                truncate(&c.name, 26),
                fmt_num(c.estimate, 4),
                fmt_num(c.std_error, 3),
                fmt_num(c.t_stat, 3),
                fmt_num(c.p_value, 3),
                fmt_num(c.ci_low, 3),
                fmt_num(c.ci_high, 3),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn header_row(l_label: &str, l_value: &str, r_label: &str, r_value: &str) -> String {
    format!("{l_label:<20}{l_value:>18}   {r_label:<21}{r_value:>16}\n")
}

fn fmt_num(v: f64, precision: usize) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        let s = if v > 0.0 { "inf" } else { "-inf" };
        return s.to_string();
    }
    format!("{v:.precision$}")
}

fn fmt_sci(v: f64) -> String {
    if !v.is_finite() {
        return fmt_num(v, 0);
    }
    format!("{v:.2e}")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
