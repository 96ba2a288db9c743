//! Command-line parsing for the `kd` binding-curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "kd", version, about = "One-site binding (Kd / Bmax) curve fitter")]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace). Falls back to `KD_LOG`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit Bmax and Kd to concentration/signal data and print the result.
    Fit(FitArgs),
    /// Generate a synthetic binding dataset.
    Sample(SampleArgs),
    /// Plot a previously exported fit JSON.
    Plot(PlotArgs),
}

/// Options for fitting.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Concentrations (X), comma separated.
    #[arg(short = 'x', long, allow_hyphen_values = true, default_value = "0, 0.5, 1, 2, 5, 10, 20, 50, 100")]
    pub x: String,

    /// Signal intensities (Y), comma separated.
    #[arg(short = 'y', long, allow_hyphen_values = true, default_value = "0, 0.12, 0.21, 0.38, 0.62, 0.81, 0.92, 0.98, 1.02")]
    pub y: String,

    /// Read x/y columns from a CSV file instead of `--x`/`--y`.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Maximum solver iterations.
    #[arg(long, default_value_t = 200)]
    pub max_iter: usize,

    /// Initial damping factor λ.
    #[arg(long, default_value_t = 1e-3)]
    pub lambda: f64,

    /// Relative objective-decrease tolerance.
    #[arg(long, default_value_t = 1e-8)]
    pub ftol: f64,

    /// Relative step-norm tolerance.
    #[arg(long, default_value_t = 1e-8)]
    pub xtol: f64,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Print the per-point residual table.
    #[arg(long)]
    pub residuals: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the fit (inputs, result, curve grid) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Export per-point residuals to CSV.
    #[arg(long = "export-residuals", value_name = "CSV")]
    pub export_residuals: Option<PathBuf>,
}

/// Options for synthetic data generation.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// True saturation amplitude.
    #[arg(long, default_value_t = 1.0)]
    pub bmax: f64,

    /// True half-saturation constant.
    #[arg(long, default_value_t = 2.0)]
    pub kd: f64,

    /// Number of concentrations.
    #[arg(short = 'n', long, default_value_t = 12)]
    pub points: usize,

    /// Lowest concentration.
    #[arg(long, default_value_t = 0.1)]
    pub x_min: f64,

    /// Highest concentration.
    #[arg(long, default_value_t = 100.0)]
    pub x_max: f64,

    /// Standard deviation of additive Gaussian noise.
    #[arg(long, default_value_t = 0.02)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Write `x,y` CSV here instead of printing comma lists.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

/// Options for plotting a saved fit.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Fit JSON file produced by `kd fit --export`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults_to_demo_data() {
        let cli = Cli::parse_from(["kd", "fit"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit command");
        };
        assert!(args.x.starts_with("0, 0.5"));
        assert_eq!(args.max_iter, 200);
        assert!(args.csv.is_none());
    }

    #[test]
    fn global_log_level_after_subcommand() {
        let cli = Cli::parse_from(["kd", "sample", "--seed", "7", "--log-level", "debug"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Command::Sample(args) = cli.command else {
            panic!("expected sample command");
        };
        assert_eq!(args.seed, 7);
    }
}
