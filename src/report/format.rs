//! Formatted terminal output.
//!
//! We keep formatting code in one place so the fitting code stays clean and
//! output changes are localized.

use crate::domain::{FitResult, PointResidual};
use crate::io::ingest::RowError;

/// Format the fit summary (parameters + diagnostics).
pub fn format_fit_summary(fit: &FitResult, n_points: usize) -> String {
    let mut out = String::new();

    out.push_str("=== kd - one-site binding fit ===\n");
    out.push_str(&format!("Points: n={n_points}\n"));
    out.push_str(&format!("Kd   : {:.4}\n", fit.kd));
    out.push_str(&format!("Bmax : {:.4}\n", fit.bmax));
    out.push_str(&format!("R²   : {}\n", fmt_r_squared(fit.r_squared)));
    out.push_str(&format!("SSE  : {:.6e}\n", fit.sum_squared_residuals));
    out.push_str(&format!(
        "Solver: {} after {} iterations ({})\n",
        if fit.converged { "converged" } else { "NOT converged" },
        fit.iterations,
        fit.termination.display_name()
    ));
    out.push_str(&format!(
        "Initial guess: Bmax={:.4} Kd={:.4}\n",
        fit.initial_guess.bmax, fit.initial_guess.kd
    ));
    if fit.kd <= 0.0 {
        out.push_str("Warning: fitted Kd is not positive; the fit is physically implausible.\n");
    }

    out
}

/// Format the per-point residual table.
pub fn format_residual_table(rows: &[PointResidual]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:>12} {:>12} {:>12} {:>12}\n", "x", "y_obs", "y_fit", "residual").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<12} {:-<12} {:-<12}\n", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        out.push_str(&format!(
            "{:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
            r.x, r.y_obs, r.y_fit, r.residual
        ));
    }

    out
}

/// Format CSV row errors (skipped lines).
pub fn format_row_errors(errors: &[RowError]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Skipped {} row(s):\n", errors.len()));
    for e in errors {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    out
}

fn fmt_r_squared(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.6}")
    } else {
        "undefined (observed values have zero variance)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BindingParams, Termination};

    fn fit(r_squared: f64, kd: f64) -> FitResult {
        FitResult {
            bmax: 1.067,
            kd,
            iterations: 9,
            converged: true,
            sum_squared_residuals: 1.8e-3,
            r_squared,
            termination: Termination::ObjectiveTolerance,
            initial_guess: BindingParams::new(1.02, 5.0),
        }
    }

    #[test]
    fn summary_shows_parameters() {
        let txt = format_fit_summary(&fit(0.998544, 3.5917), 9);
        assert!(txt.contains("Kd   : 3.5917\n"));
        assert!(txt.contains("Bmax : 1.0670\n"));
        assert!(txt.contains("R²   : 0.998544\n"));
        assert!(txt.contains("converged after 9 iterations"));
        assert!(!txt.contains("Warning"));
    }

    #[test]
    fn summary_flags_nan_r_squared_and_negative_kd() {
        let txt = format_fit_summary(&fit(f64::NAN, -0.5), 3);
        assert!(txt.contains("undefined"));
        assert!(txt.contains("Warning: fitted Kd is not positive"));
    }

    #[test]
    fn residual_table_golden() {
        let rows = [PointResidual {
            x: 1.0,
            y_obs: 0.21,
            y_fit: 0.2321,
            residual: -0.0221,
        }];
        let expected = concat!(
            "           x        y_obs        y_fit     residual\n",
            "------------ ------------ ------------ ------------\n",
            "      1.0000       0.2100       0.2321      -0.0221\n",
        );
        assert_eq!(format_residual_table(&rows), expected);
    }
}
