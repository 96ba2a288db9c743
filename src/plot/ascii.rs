//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line

use crate::domain::{CurveGrid, Dataset, FitFile, FitResult};
use crate::models::sample_curve;

/// Render observed points over the fitted curve, from `0` to `max(x)`.
pub fn render_fit_plot(dataset: &Dataset, fit: &FitResult, width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = dataset.x().iter().copied().zip(dataset.y().iter().copied()).collect();
    let (_, x_max) = dataset.x_range();
    let curve = sample_curve(fit.params(), 0.0, x_max, width.max(2));
    render_plot(&points, &curve, width, height)
}

/// Render a saved fit file (points + stored curve grid).
pub fn render_fit_file_plot(file: &FitFile, width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = file.x.iter().copied().zip(file.y.iter().copied()).collect();
    render_plot(&points, &file.grid, width, height)
}

fn render_plot(points: &[(f64, f64)], curve: &CurveGrid, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let curve_points: Vec<(f64, f64)> = curve.x.iter().copied().zip(curve.y.iter().copied()).collect();

    let (x_min, x_max) = range(points.iter().chain(&curve_points).map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(points.iter().chain(&curve_points).map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    draw_curve(&mut grid, &curve_points, (x_min, x_max), (y_min, y_max));

    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo.is_finite() && hi.is_finite() && hi > lo {
        Some((lo, hi))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y max is row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_span: (f64, f64), y_span: (f64, f64)) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_span.0, x_span.1, width);
        let row = map_y(y, y_span.0, y_span.1, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        // Flat curve at y = 1 with one point above it and one on it.
        let points = [(0.0, 1.0), (9.0, 2.0)];
        let curve = CurveGrid {
            x: vec![0.0, 9.0],
            y: vec![1.0, 1.0],
        };

        let txt = render_plot(&points, &curve, 10, 5);
        let expected = concat!(
            "Plot: x=[0.000, 9.000] | y=[0.950, 2.050]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn fit_plot_has_requested_size() {
        let dataset = Dataset::new(vec![0.0, 1.0, 10.0], vec![0.0, 0.5, 0.9]).unwrap();
        let fit = FitResult {
            bmax: 1.0,
            kd: 1.0,
            iterations: 1,
            converged: true,
            sum_squared_residuals: 0.0,
            r_squared: 1.0,
            termination: crate::domain::Termination::StepTolerance,
            initial_guess: crate::domain::BindingParams::new(0.9, 1.0),
        };
        let txt = render_fit_plot(&dataset, &fit, 40, 12);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[1..].iter().all(|l| l.chars().count() == 40));
        let marks: usize = lines[1..].iter().map(|l| l.matches('o').count()).sum();
        assert_eq!(marks, 3);
    }
}
