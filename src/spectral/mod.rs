// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! # Spectral Analysis Module
//!
//! This module turns a sampled [`Trace`](crate::acquisition::Trace) into a
//! one-sided magnitude [`Spectrum`]: only the non-negative frequency bins of the
//! discrete Fourier transform are kept, DC included.
//!
//! ## Architecture
//!
//! - `SpectralAnalyzer` trait defines the interface for all analyzers
//! - `FFTAnalyzer` provides the concrete implementation on top of rustfft
//! - Factory function `create_spectral_analyzer()` instantiates a suitable analyzer
//!
//! ## Usage
//!
//! ```
//! use rust_refractive_index::acquisition::Trace;
//! use rust_refractive_index::spectral::{self, WindowFunction};
//!
//! let trace = Trace::new((0..8).map(|i| (i as f64, 1.0)).collect());
//! let analyzer = spectral::create_spectral_analyzer(WindowFunction::Rectangular);
//! let spectrum = analyzer.analyze(&trace).unwrap();
//!
//! assert_eq!(spectrum.len(), 4);
//! assert_eq!(spectrum.magnitudes()[0], 8.0);
//! ```

pub mod fft;

pub use fft::{FFTAnalyzer, SpectralAnalyzer, WindowFunction};

use crate::error::AnalysisError;

/// One-sided magnitude spectrum
///
/// Frequencies are non-negative and increasing, magnitudes are non-negative.
/// Both vectors have the same length. The value is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Build a spectrum, checking the invariants of the type
    pub fn new(frequencies: Vec<f64>, magnitudes: Vec<f64>) -> Result<Self, AnalysisError> {
        if frequencies.len() != magnitudes.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "Spectrum lengths don't match: frequencies={}, magnitudes={}",
                frequencies.len(),
                magnitudes.len()
            )));
        }
        if let Some(i) = frequencies.iter().position(|f| !(*f >= 0.0)) {
            return Err(AnalysisError::InvalidInput(format!(
                "Negative or non-finite frequency {} at bin {}",
                frequencies[i], i
            )));
        }
        if let Some(i) = frequencies.windows(2).position(|w| w[1] < w[0]) {
            return Err(AnalysisError::InvalidInput(format!(
                "Frequencies are not increasing at bin {}",
                i + 1
            )));
        }
        if let Some(i) = magnitudes.iter().position(|m| !(*m >= 0.0) || m.is_infinite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid magnitude {} at bin {}",
                magnitudes[i], i
            )));
        }

        Ok(Self {
            frequencies,
            magnitudes,
        })
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// `(frequency, magnitude)` pairs in increasing frequency order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitudes.iter().copied())
    }

    /// Index of the bin with the largest magnitude
    pub fn peak_index(&self) -> Option<usize> {
        self.magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}

/// Create a new spectral analyzer using the given window function
pub fn create_spectral_analyzer(window_function: WindowFunction) -> Box<dyn SpectralAnalyzer> {
    Box::new(FFTAnalyzer::new().with_window_function(window_function))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_invariants() {
        assert!(Spectrum::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(Spectrum::new(vec![-1.0, 1.0], vec![1.0, 1.0]).is_err());
        assert!(Spectrum::new(vec![1.0, 0.5], vec![1.0, 1.0]).is_err());
        assert!(Spectrum::new(vec![0.0, 1.0], vec![1.0, f64::NAN]).is_err());

        let spectrum = Spectrum::new(vec![0.0, 1.0, 2.0], vec![0.5, 3.0, 1.0]).unwrap();
        assert_eq!(spectrum.len(), 3);
        assert_eq!(spectrum.peak_index(), Some(1));
        assert_eq!(
            spectrum.iter().collect::<Vec<_>>(),
            vec![(0.0, 0.5), (1.0, 3.0), (2.0, 1.0)]
        );
    }
}
