//! Fit exports.
//!
//! - fit JSON: the portable record of one fit (inputs, result, curve grid),
//!   reloadable for plotting
//! - residual CSV: one row per observation, easy to consume in spreadsheets

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveGrid, Dataset, FitFile, FitResult, PointResidual};
use crate::error::AppError;

/// Assemble the saved-fit record.
pub fn build_fit_file(dataset: &Dataset, result: &FitResult, grid: CurveGrid) -> FitFile {
    FitFile {
        tool: "kd".to_string(),
        generated_at: Utc::now(),
        x: dataset.x().to_vec(),
        y: dataset.y().to_vec(),
        result: result.clone(),
        grid,
    }
}

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, fit: &FitFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create fit JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, fit)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;
    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let fit: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))?;
    Ok(fit)
}

/// Write per-point residuals to a CSV file.
pub fn write_residuals_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create residual CSV '{}': {e}", path.display())))?;
    write_residuals(&mut file, residuals)
}

fn write_residuals<W: Write>(out: &mut W, residuals: &[PointResidual]) -> Result<(), AppError> {
    writeln!(out, "x,y_obs,y_fit,residual")
        .map_err(|e| AppError::new(2, format!("Failed to write residual CSV header: {e}")))?;
    for r in residuals {
        writeln!(out, "{},{},{:.10},{:.10}", r.x, r.y_obs, r.y_fit, r.residual)
            .map_err(|e| AppError::new(2, format!("Failed to write residual CSV row: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BindingParams, Termination};

    fn sample_result() -> FitResult {
        FitResult {
            bmax: 1.5,
            kd: 2.0,
            iterations: 7,
            converged: true,
            sum_squared_residuals: 0.0,
            r_squared: 1.0,
            termination: Termination::StepTolerance,
            initial_guess: BindingParams::new(1.4, 3.0),
        }
    }

    #[test]
    fn residual_csv_layout() {
        let rows = [PointResidual {
            x: 2.0,
            y_obs: 0.5,
            y_fit: 0.75,
            residual: 0.25,
        }];
        let mut buf = Vec::new();
        write_residuals(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "x,y_obs,y_fit,residual\n2,0.5,0.7500000000,0.2500000000\n");
    }

    #[test]
    fn fit_json_reloads() {
        let dataset = Dataset::new(vec![1.0, 2.0, 4.0], vec![0.5, 0.75, 1.0]).unwrap();
        let grid = CurveGrid {
            x: vec![0.0, 4.0],
            y: vec![0.0, 1.0],
        };
        let fit = build_fit_file(&dataset, &sample_result(), grid);

        let path = std::env::temp_dir().join(format!("kd_fit_export_{}.json", std::process::id()));
        write_fit_json(&path, &fit).unwrap();
        let loaded = read_fit_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.tool, "kd");
        assert_eq!(loaded.x, fit.x);
        assert_eq!(loaded.result, fit.result);
        assert_eq!(loaded.grid.y, vec![0.0, 1.0]);
    }

    #[test]
    fn nan_r_squared_survives_json() {
        let dataset = Dataset::new(vec![1.0, 2.0, 3.0], vec![5.0, 5.0, 5.0]).unwrap();
        let mut result = sample_result();
        result.r_squared = f64::NAN;
        let fit = build_fit_file(&dataset, &result, CurveGrid::default());
        let text = serde_json::to_string(&fit).unwrap();
        assert!(text.contains("\"r_squared\":null"));

        let loaded: FitFile = serde_json::from_str(&text).unwrap();
        assert!(loaded.result.r_squared.is_nan());
        assert_eq!(loaded.result.kd, 2.0);
    }
}
