//! Residual vector and least-squares objective.

use nalgebra::DVector;

use crate::domain::BindingParams;
use crate::error::NumericError;
use crate::models::evaluate;

/// `predicted - observed`, elementwise.
pub fn residuals(params: BindingParams, x: &[f64], y: &[f64]) -> Result<DVector<f64>, NumericError> {
    let predicted = evaluate(x, params)?;
    Ok(residuals_from_predicted(&predicted, y))
}

/// `predicted - observed` for values that were already evaluated.
pub fn residuals_from_predicted(predicted: &[f64], y: &[f64]) -> DVector<f64> {
    DVector::from_iterator(y.len(), predicted.iter().zip(y).map(|(p, o)| p - o))
}

/// Sum of squared residuals.
pub fn objective(residuals: &DVector<f64>) -> f64 {
    residuals.norm_squared()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_are_predicted_minus_observed() {
        let params = BindingParams::new(2.0, 1.0);
        let r = residuals(params, &[1.0, 3.0], &[0.5, 2.0]).unwrap();
        assert!((r[0] - 0.5).abs() < 1e-12);
        assert!((r[1] + 0.5).abs() < 1e-12);
        assert!((objective(&r) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn residuals_propagate_domain_error() {
        let params = BindingParams::new(2.0, -3.0);
        assert!(matches!(
            residuals(params, &[1.0, 3.0], &[0.5, 2.0]),
            Err(NumericError::Domain { index: 1, .. })
        ));
    }
}
