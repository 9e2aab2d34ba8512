// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Fast Fourier Transform (FFT) implementation for spectral analysis
//!
//! This module provides:
//!
//! - The `SpectralAnalyzer` trait, the seam the pipeline works against
//! - An FFT-based implementation `FFTAnalyzer` using the rustfft library
//! - Optional window functions to reduce spectral leakage
//!
//! # Spectral Analysis Process
//!
//! 1. Validate the trace and read its sample spacing `x[1] - x[0]`
//! 2. Window the ordinates (rectangular by default, i.e. untouched)
//! 3. Compute the complex FFT in double precision
//! 4. Label every bin with the standard DFT frequency convention
//! 5. Keep the non-negative frequency bins and their magnitudes

use clap::ValueEnum;
use log::{debug, warn};
use rustfft::{num_complex::Complex64, FftPlanner};
use serde::{Deserialize, Serialize};

use super::Spectrum;
use crate::acquisition::Trace;
use crate::error::AnalysisError;

/// Trait for implementing spectral analysis
///
/// All implementing types must be thread-safe (`Send + Sync`) so that the air
/// and medium traces can be analyzed by the same instance.
pub trait SpectralAnalyzer: Send + Sync {
    /// Transform a time-domain trace into its one-sided magnitude spectrum
    ///
    /// ### Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] if the trace has fewer than two
    /// samples, a non-positive spacing, or non-finite values.
    fn analyze(&self, trace: &Trace) -> Result<Spectrum, AnalysisError>;
}

/// Available window functions for spectral analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WindowFunction {
    /// No windowing, the raw DFT of the samples
    #[default]
    Rectangular,
    Hann,
    Blackman,
}

impl WindowFunction {
    /// Weight of sample `i` out of `len`
    fn factor(&self, i: usize, len: usize) -> f64 {
        let x = i as f64 / (len - 1) as f64;
        match self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Hann => 0.5 * (1.0 - (2.0 * std::f64::consts::PI * x).cos()),
            WindowFunction::Blackman => {
                let a0 = 0.42;
                let a1 = 0.5;
                let a2 = 0.08;
                a0 - a1 * (2.0 * std::f64::consts::PI * x).cos()
                    + a2 * (4.0 * std::f64::consts::PI * x).cos()
            }
        }
    }
}

/// FFT-based spectral analyzer
///
/// Magnitudes are not normalised: bin `k` holds `|X_k|` exactly as the
/// textbook DFT defines it, so a constant trace of value `c` and length `N`
/// has a DC magnitude of `N * c`.
#[derive(Debug, Clone, Default)]
pub struct FFTAnalyzer {
    window_function: WindowFunction,
}

impl FFTAnalyzer {
    /// Create a new analyzer with a rectangular window
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_function(mut self, window_function: WindowFunction) -> Self {
        self.window_function = window_function;
        self
    }

    /// Apply window function to the input signal
    fn apply_window(&self, signal: &[f64]) -> Vec<f64> {
        if self.window_function == WindowFunction::Rectangular {
            return signal.to_vec();
        }
        signal
            .iter()
            .enumerate()
            .map(|(i, &sample)| sample * self.window_function.factor(i, signal.len()))
            .collect()
    }

    /// Compute FFT of the input signal
    fn compute_fft(&self, signal: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer.len());
        fft.process(&mut buffer);

        buffer
    }
}

/// Frequency label of every DFT bin for `n` samples spaced by `dx`
///
/// Bins `0..=(n-1)/2` carry `k / (n * dx)`, the remaining ones the negative
/// frequencies `-(n/2) .. -1` scaled the same way.
pub fn fft_frequencies(n: usize, dx: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let scale = 1.0 / (n as f64 * dx);
    let positive_end = (n - 1) / 2 + 1;
    (0..n)
        .map(|k| {
            if k < positive_end {
                k as f64 * scale
            } else {
                -((n - k) as f64) * scale
            }
        })
        .collect()
}

impl SpectralAnalyzer for FFTAnalyzer {
    fn analyze(&self, trace: &Trace) -> Result<Spectrum, AnalysisError> {
        let dx = trace.spacing()?;

        if let Some(i) = trace
            .samples()
            .iter()
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(AnalysisError::InvalidInput(format!(
                "Non-finite sample at index {}: {:?}",
                i,
                trace.samples()[i]
            )));
        }

        if let Some(step) = trace.first_irregular_step() {
            warn!(
                "Trace is not uniformly sampled (step {} differs from dx={}), using dx anyway",
                step, dx
            );
        }

        let windowed = self.apply_window(&trace.values());
        let fft_output = self.compute_fft(&windowed);
        let labels = fft_frequencies(fft_output.len(), dx);

        let (frequencies, magnitudes): (Vec<f64>, Vec<f64>) = labels
            .into_iter()
            .zip(fft_output.iter())
            .filter(|(frequency, _)| *frequency >= 0.0)
            .map(|(frequency, value)| (frequency, value.norm()))
            .unzip();

        debug!(
            "FFT of {} samples (dx={}, window={:?}) -> {} non-negative bins",
            trace.len(),
            dx,
            self.window_function,
            frequencies.len()
        );

        Spectrum::new(frequencies, magnitudes)
    }
}
