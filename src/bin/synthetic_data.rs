// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Synthetic measurement generator
// Writes an air pulse and the same pulse transmitted through a slab of known index

use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use rust_refractive_index::acquisition::DataFile;
use rust_refractive_index::utility::pulse::{fresnel_factor, slab_delay, synthesize, PulseParameters};

/// Synthetic air/medium trace generator
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output data file
    #[arg(short, long, value_name = "FILE", default_value = "data.txt")]
    output: PathBuf,

    /// Refractive index of the simulated slab (1.0 to 5.0)
    #[arg(short = 'n', long, default_value_t = 2.0)]
    index: f64,

    /// Number of samples per trace
    #[arg(short, long, default_value_t = 512)]
    samples: usize,

    /// Sample spacing in picoseconds
    #[arg(long, default_value_t = 0.05)]
    dx_ps: f64,

    /// Arrival time of the air pulse in picoseconds
    #[arg(long, default_value_t = 5.0)]
    center_ps: f64,

    /// Pulse width in picoseconds
    #[arg(long, default_value_t = 0.2)]
    width_ps: f64,

    /// Standard deviation of the added Gaussian noise (0 for clean traces)
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Noise seed
    #[arg(long, default_value_t = 1)]
    seed: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !(1.0..=5.0).contains(&args.index) {
        bail!("Refractive index must be between 1.0 and 5.0");
    }
    if args.noise < 0.0 {
        bail!("Noise must not be negative");
    }

    let parameters = PulseParameters {
        samples: args.samples,
        dx: args.dx_ps * 1e-12,
        center: args.center_ps * 1e-12,
        width: args.width_ps * 1e-12,
        noise: args.noise,
        seed: args.seed,
        ..Default::default()
    };

    let traces = synthesize(args.index, &parameters)?;
    DataFile::new(&args.output).write_raw_data(&traces)?;

    info!(
        "n={} scales the medium pulse by {:.6} and delays it by {:.3} ps",
        args.index,
        fresnel_factor(args.index),
        slab_delay(args.index) * 1e12
    );
    println!(
        "Wrote {} samples per trace to {}",
        args.samples,
        args.output.display()
    );
    Ok(())
}
