// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Raw trace acquisition
//!
//! This module holds the [`Trace`] type (a uniformly sampled series of
//! `(x, y)` pairs) and the sources able to produce the air/medium pair the
//! pipeline works on. The only concrete source is the text [`DataFile`].

pub mod data_file;

pub use data_file::DataFile;

use crate::error::AnalysisError;

/// Relative tolerance used when checking that a trace is uniformly sampled
const SPACING_TOLERANCE: f64 = 1e-6;

/// An ordered series of `(x, y)` samples
///
/// `x` is expected to be strictly increasing with a constant step; the
/// spectral transform only looks at the first step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    samples: Vec<(f64, f64)>,
}

impl Trace {
    /// Create a trace from `(x, y)` pairs
    pub fn new(samples: Vec<(f64, f64)>) -> Self {
        Self { samples }
    }

    /// Create a trace from separate abscissa and ordinate slices
    pub fn from_xy(x: &[f64], y: &[f64]) -> Result<Self, AnalysisError> {
        if x.len() != y.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "x and y lengths don't match: x={}, y={}",
                x.len(),
                y.len()
            )));
        }
        Ok(Self::new(x.iter().copied().zip(y.iter().copied()).collect()))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.samples.push((x, y));
    }

    /// Ordinates of the trace, in sample order
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|&(_, y)| y).collect()
    }

    /// Sample spacing `x[1] - x[0]`
    ///
    /// Fails when the trace has fewer than two samples or when the spacing is
    /// not a strictly positive finite number.
    pub fn spacing(&self) -> Result<f64, AnalysisError> {
        if self.samples.len() < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "Trace too short: {} samples (need at least 2)",
                self.samples.len()
            )));
        }

        let dx = self.samples[1].0 - self.samples[0].0;
        if !dx.is_finite() || dx <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Sample spacing must be positive, got {}",
                dx
            )));
        }
        Ok(dx)
    }

    /// Index of the first step that deviates from `x[1] - x[0]`, if any
    pub fn first_irregular_step(&self) -> Option<usize> {
        let dx = self.spacing().ok()?;
        self.samples
            .windows(2)
            .position(|w| ((w[1].0 - w[0].0) - dx).abs() > SPACING_TOLERANCE * dx.abs())
    }
}

/// The two traces a measurement is made of
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TracePair {
    /// Reference trace recorded through air
    pub air: Trace,
    /// Trace recorded through the medium under test
    pub medium: Trace,
}

/// Anything able to provide the air/medium trace pair
pub trait TraceSource {
    fn read_traces(&self) -> anyhow::Result<TracePair>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_of_uniform_trace() {
        let trace = Trace::new(vec![(0.0, 1.0), (0.5, 2.0), (1.0, 3.0)]);
        assert_eq!(trace.spacing().unwrap(), 0.5);
        assert_eq!(trace.first_irregular_step(), None);
        assert_eq!(trace.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_spacing_rejects_short_and_decreasing_traces() {
        assert!(matches!(
            Trace::new(vec![(0.0, 1.0)]).spacing(),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            Trace::new(vec![(1.0, 1.0), (1.0, 2.0)]).spacing(),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            Trace::new(vec![(1.0, 1.0), (0.0, 2.0)]).spacing(),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_irregular_step_is_reported() {
        let trace = Trace::new(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.5, 0.0)]);
        assert_eq!(trace.first_irregular_step(), Some(2));
    }

    #[test]
    fn test_from_xy_length_mismatch() {
        assert!(Trace::from_xy(&[0.0, 1.0], &[1.0]).is_err());
        let trace = Trace::from_xy(&[0.0, 1.0], &[4.0, 5.0]).unwrap();
        assert_eq!(trace.samples(), &[(0.0, 4.0), (1.0, 5.0)]);
    }
}
