//! Goodness of fit: coefficient of determination.

use crate::error::NumericError;
use crate::math::mean;

/// `R² = 1 - SS_res / SS_tot`.
///
/// When every observed value is identical (`SS_tot = 0`) the ratio is
/// undefined: an exact fit scores `1.0`, anything else is a
/// `NumericError::DegenerateFit`.
pub fn r_squared(y: &[f64], y_predicted: &[f64]) -> Result<f64, NumericError> {
    let y_mean = mean(y).unwrap_or(0.0);
    let ss_res: f64 = y
        .iter()
        .zip(y_predicted)
        .map(|(obs, fit)| (obs - fit).powi(2))
        .sum();
    let ss_tot: f64 = y.iter().map(|obs| (obs - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            return Ok(1.0);
        }
        return Err(NumericError::DegenerateFit { ss_res });
    }
    Ok(1.0 - ss_res / ss_tot)
}
