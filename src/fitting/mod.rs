// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! # Refractive Index Fitting
//!
//! This module estimates the refractive index `n` of the medium for every
//! frequency bin of a ratio series.
//!
//! - `model`: closed-form transmission of a lossless slab
//! - `minimizer`: bounded Brent minimiser
//! - `fitter`: per-bin fit over `n ∈ [1, 5]`
//!
//! ## Usage
//!
//! ```
//! use rust_refractive_index::fitting::{transmission_magnitude, ParameterFitter};
//!
//! let ratio = transmission_magnitude(3.42, 1.0e12);
//! let result = ParameterFitter::new().fit_bin(0, 1.0e12, ratio).unwrap();
//! assert!((result.n - 3.42).abs() < 1e-4);
//! ```

pub mod fitter;
pub mod minimizer;
pub mod model;

pub use fitter::{FitReport, FitResult, ParameterFitter, N_LOWER_BOUND, N_UPPER_BOUND};
pub use minimizer::{minimize_bounded, BoundedOptions, MinimizeError, Minimum};
pub use model::{
    transmission_magnitude, LosslessSlab, TransmissionModel, PATH_LENGTH_M, SPEED_OF_LIGHT_M_S,
};

/// Create a fitter for the lossless slab model
pub fn create_parameter_fitter(options: BoundedOptions, parallel: bool) -> ParameterFitter {
    ParameterFitter::new()
        .with_options(options)
        .with_parallel(parallel)
}
