// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the refractive index analyzer
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use rust_refractive_index::acquisition::DataFile;
use rust_refractive_index::config::{self, CliOverrides, Config};
use rust_refractive_index::pipeline::{create_plot_sink, print_results, Pipeline};
use rust_refractive_index::preprocessing::RatioOrientation;
use rust_refractive_index::selection::TerminalOperator;
use rust_refractive_index::spectral::WindowFunction;
use rust_refractive_index::AnalysisError;

/// Refractive index estimation from transmitted-wave amplitude spectra
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (YAML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Measurement file holding the air and medium raw data
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// First bin of the frequency window (inclusive), skips the prompt with --upper
    #[arg(long, allow_negative_numbers = true)]
    lower: Option<i64>,

    /// End of the frequency window (exclusive), skips the prompt with --lower
    #[arg(long, allow_negative_numbers = true)]
    upper: Option<i64>,

    /// Window function applied before the FFT
    #[arg(long, value_enum)]
    window_function: Option<WindowFunction>,

    /// Which spectrum is the numerator of the ratio
    #[arg(long, value_enum)]
    orientation: Option<RatioOrientation>,

    /// Directory receiving SVG plots
    #[arg(long)]
    plot_dir: Option<PathBuf>,

    /// Path of the HTML report to generate
    #[arg(long)]
    report: Option<PathBuf>,

    /// Do not append any table to the data file
    #[arg(long)]
    no_append: bool,

    /// Output the configuration schema as JSON and exit
    #[arg(long)]
    show_config_schema: bool,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if args.show_config_schema {
        return config::output_config_schema();
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.yaml"));
    let mut config = Config::from_file(&config_path)?;

    config.apply_args(CliOverrides {
        data_file: args.data_file,
        lower: args.lower,
        upper: args.upper,
        window_function: args.window_function,
        orientation: args.orientation,
        plot_dir: args.plot_dir,
        report: args.report,
        no_append: args.no_append,
    });
    config::validate_specific_rules(&config)?;

    let data_file = DataFile::new(&config.input.data_file);
    let pipeline = Pipeline::from_config(&config);
    let mut plots = create_plot_sink(&config.output)?;
    let mut operator = TerminalOperator::stdio();

    match pipeline.run(&data_file, &mut operator, plots.as_mut()) {
        Ok(outcome) => {
            print_results(outcome.results(), &mut io::stdout())?;
            if !outcome.fit.is_complete() {
                error!(
                    "{} bin(s) could not be fitted and were skipped",
                    outcome.fit.failures.len()
                );
            }
            Ok(())
        }
        Err(e) if matches!(e.downcast_ref::<AnalysisError>(), Some(AnalysisError::Cancelled)) => {
            info!("Analysis cancelled, nothing fitted");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
