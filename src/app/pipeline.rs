//! Shared "fit pipeline" logic.
//!
//! Input resolution -> validation -> fit session -> residuals + curve grid.
//! The CLI focuses on presentation (printing, plotting, exporting).

use crate::domain::{CurveGrid, Dataset, FitConfig, FitResult, PointResidual};
use crate::error::AppError;
use crate::fit::fit_dataset;
use crate::io::ingest::{RowError, load_dataset_csv};
use crate::io::parse::parse_number_list;
use crate::models::sample_curve;
use crate::report::compute_residuals;

use crate::cli::FitArgs;

/// Raw numbers handed to the fitting core.
#[derive(Debug, Clone)]
pub struct FitInput {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub row_errors: Vec<RowError>,
}

/// All computed outputs of a single `kd fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub fit: FitResult,
    pub residuals: Vec<PointResidual>,
    pub grid: CurveGrid,
}

/// Resolve the fit input from either a CSV file or the comma lists.
pub fn load_input(args: &FitArgs) -> Result<FitInput, AppError> {
    if let Some(path) = &args.csv {
        let data = load_dataset_csv(path)?;
        return Ok(FitInput {
            x: data.x,
            y: data.y,
            row_errors: data.row_errors,
        });
    }

    Ok(FitInput {
        x: parse_number_list(&args.x, "X (concentrations)")?,
        y: parse_number_list(&args.y, "Y (signal intensity)")?,
        row_errors: Vec::new(),
    })
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(x: Vec<f64>, y: Vec<f64>, config: &FitConfig) -> Result<RunOutput, AppError> {
    config.solver.validate()?;
    let dataset = Dataset::new(x, y)?;

    let fit = fit_dataset(&dataset, &config.solver);
    let residuals = compute_residuals(&dataset, &fit);

    // The curve is drawn from zero concentration up to the largest observed one.
    let (_, x_max) = dataset.x_range();
    let grid = sample_curve(fit.params(), 0.0, x_max, config.curve_points);

    Ok(RunOutput {
        dataset,
        fit,
        residuals,
        grid,
    })
}
