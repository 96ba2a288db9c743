//! Model evaluation for the rectangular hyperbola `y = Bmax * x / (Kd + x)`.
//!
//! The solver relies on two primitive operations:
//! - evaluate the response for every concentration (for residuals)
//! - fill the Jacobian of the response with respect to `(Bmax, Kd)`
//!
//! Both refuse to divide by zero: `Kd + x_i = 0` is reported as
//! `NumericError::Domain` instead of leaking an infinity into the fit.

use nalgebra::DMatrix;

use crate::domain::{BindingParams, CurveGrid};
use crate::error::NumericError;

/// Number of free parameters.
pub const PARAM_COUNT: usize = 2;

/// Evaluate the model at every concentration in `x`.
pub fn evaluate(x: &[f64], params: BindingParams) -> Result<Vec<f64>, NumericError> {
    x.iter()
        .enumerate()
        .map(|(index, &xi)| evaluate_point(index, xi, params))
        .collect()
}

/// Predict a single response without the domain guard.
///
/// Used for plotting curve grids, where a non-finite sample is simply skipped.
pub fn predict(x: f64, params: BindingParams) -> f64 {
    params.bmax * x / (params.kd + x)
}

/// Jacobian of the model (and therefore of the residuals) with respect to
/// `(Bmax, Kd)`, one row per observation:
///
/// ```text
/// ∂/∂Bmax = x / (Kd + x)
/// ∂/∂Kd   = -Bmax * x / (Kd + x)^2
/// ```
pub fn jacobian(x: &[f64], params: BindingParams) -> Result<DMatrix<f64>, NumericError> {
    let mut jac = DMatrix::<f64>::zeros(x.len(), PARAM_COUNT);
    for (i, &xi) in x.iter().enumerate() {
        let denom = checked_denominator(i, xi, params.kd)?;
        let frac = xi / denom;
        jac[(i, 0)] = frac;
        jac[(i, 1)] = -params.bmax * frac / denom;
    }
    Ok(jac)
}

/// Sample the fitted curve on `n` evenly spaced concentrations in
/// `[x_min, x_max]`. Points where the curve is not finite are dropped.
pub fn sample_curve(params: BindingParams, x_min: f64, x_max: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut grid = CurveGrid {
        x: Vec::with_capacity(n),
        y: Vec::with_capacity(n),
    };
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x_min + u * (x_max - x_min);
        let y = predict(x, params);
        if y.is_finite() {
            grid.x.push(x);
            grid.y.push(y);
        }
    }
    grid
}

fn evaluate_point(index: usize, x: f64, params: BindingParams) -> Result<f64, NumericError> {
    let denom = checked_denominator(index, x, params.kd)?;
    Ok(params.bmax * x / denom)
}

fn checked_denominator(index: usize, x: f64, kd: f64) -> Result<f64, NumericError> {
    let denom = kd + x;
    if denom == 0.0 {
        return Err(NumericError::Domain { index, x, kd });
    }
    Ok(denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_saturation_at_kd() {
        let params = BindingParams::new(2.0, 4.0);
        let y = evaluate(&[0.0, 4.0, 1e9], params).unwrap();
        assert_eq!(y[0], 0.0);
        assert!((y[1] - 1.0).abs() < 1e-12);
        assert!((y[2] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn evaluate_reports_domain_error() {
        let params = BindingParams::new(1.0, -2.0);
        let err = evaluate(&[1.0, 2.0, 3.0], params).unwrap_err();
        assert_eq!(err, NumericError::Domain { index: 1, x: 2.0, kd: -2.0 });
    }

    #[test]
    fn sample_curve_spans_range() {
        let grid = sample_curve(BindingParams::new(1.0, 2.0), 0.0, 100.0, 101);
        assert_eq!(grid.x.len(), 101);
        assert_eq!(grid.x[0], 0.0);
        assert_eq!(grid.x[100], 100.0);
        assert_eq!(grid.y[0], 0.0);
        assert!(grid.y.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn sample_curve_drops_pole() {
        // Kd = -5 puts a pole at x = 5, which lies on the grid.
        let grid = sample_curve(BindingParams::new(1.0, -5.0), 0.0, 10.0, 11);
        assert_eq!(grid.x.len(), 10);
        assert!(!grid.x.contains(&5.0));
    }

    #[test]
    fn jacobian_matches_central_differences() {
        let x = [0.5, 1.0, 3.0, 10.0];
        let params = BindingParams::new(1.5, 2.5);
        let jac = jacobian(&x, params).unwrap();

        let h = 1e-6;
        for (i, &xi) in x.iter().enumerate() {
            let d_bmax = (predict(xi, BindingParams::new(1.5 + h, 2.5))
                - predict(xi, BindingParams::new(1.5 - h, 2.5)))
                / (2.0 * h);
            let d_kd = (predict(xi, BindingParams::new(1.5, 2.5 + h))
                - predict(xi, BindingParams::new(1.5, 2.5 - h)))
                / (2.0 * h);
            assert!((jac[(i, 0)] - d_bmax).abs() < 1e-7);
            assert!((jac[(i, 1)] - d_kd).abs() < 1e-7);
        }
    }
}
