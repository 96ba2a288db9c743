//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the fit pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use log::{info, warn};

use crate::cli::{Command, FitArgs, PlotArgs, SampleArgs};
use crate::data::{SampleSpec, generate_sample};
use crate::domain::{BindingParams, FitConfig, SolverOptions};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `kd` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `kd` with no subcommand behaves like `kd fit` on the demo data.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let level = crate::logging::resolve_level(cli.log_level.as_deref());
    let _logger = crate::logging::setup_logging(&level)?;

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Sample(args) => handle_sample(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let input = pipeline::load_input(&args)?;
    if !input.row_errors.is_empty() {
        warn!("{} CSV row(s) skipped", input.row_errors.len());
        eprint!("{}", crate::report::format_row_errors(&input.row_errors));
    }

    let run = pipeline::run_fit(input.x, input.y, &config)?;

    println!("{}", crate::report::format_fit_summary(&run.fit, run.dataset.len()));

    if args.residuals {
        println!("{}", crate::report::format_residual_table(&run.residuals));
    }

    if config.plot {
        let plot = crate::plot::render_fit_plot(&run.dataset, &run.fit, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_fit {
        let file = crate::io::export::build_fit_file(&run.dataset, &run.fit, run.grid.clone());
        crate::io::export::write_fit_json(path, &file)?;
        info!("fit written to {}", path.display());
    }
    if let Some(path) = &config.export_residuals {
        crate::io::export::write_residuals_csv(path, &run.residuals)?;
        info!("residuals written to {}", path.display());
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        truth: BindingParams::new(args.bmax, args.kd),
        n_points: args.points,
        x_min: args.x_min,
        x_max: args.x_max,
        noise: args.noise,
        seed: args.seed,
    };
    let sample = generate_sample(&spec)?;

    match &args.output {
        Some(path) => {
            write_sample_csv(path, &sample.x, &sample.y)?;
            info!("sample written to {}", path.display());
        }
        None => {
            println!("x: {}", crate::io::parse::format_number_list(&sample.x));
            println!("y: {}", crate::io::parse::format_number_list(&sample.y));
        }
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::export::read_fit_json(&args.fit)?;
    println!("{}", crate::report::format_fit_summary(&file.result, file.x.len()));
    println!("{}", crate::plot::render_fit_file_plot(&file, args.width, args.height));
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        solver: SolverOptions {
            initial_lambda: args.lambda,
            objective_tolerance: args.ftol,
            step_tolerance: args.xtol,
            max_iterations: args.max_iter,
            ..SolverOptions::default()
        },
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        curve_points: 100,
        export_fit: args.export.clone(),
        export_residuals: args.export_residuals.clone(),
    }
}

fn write_sample_csv(path: &std::path::Path, x: &[f64], y: &[f64]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    writer
        .write_record(["x", "y"])
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;
    for (xi, yi) in x.iter().zip(y) {
        writer
            .write_record([xi.to_string(), yi.to_string()])
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))?;
    Ok(())
}

/// Rewrite argv so `kd` defaults to `kd fit`.
///
/// Rules:
/// - `kd`                      -> `kd fit`
/// - `kd --x ... --y ...`      -> `kd fit --x ... --y ...`
/// - `kd --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "sample" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    argv
}
