// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Spectral amplitude ratio
//!
//! Two spectra are paired bin by bin, by index and not by frequency value:
//! bin `i` of the air spectrum goes with bin `i` of the medium spectrum. When
//! both traces share their length and spacing the two are equivalent. When
//! they don't, the pairing is kept but the mismatch is reported.

use std::fmt;
use std::ops::Range;

use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::spectral::Spectrum;

/// Relative tolerance on the frequency labels of two aligned bins
const FREQUENCY_TOLERANCE: f64 = 1e-9;

/// Which spectrum is the numerator of the ratio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RatioOrientation {
    /// `air / medium`
    #[default]
    AirOverMedium,
    /// `medium / air`, the measured transmission
    MediumOverAir,
}

/// Ordered `(frequency, ratio)` pairs
///
/// `first_bin` is the spectral bin index of the first pair, so that a
/// truncated series still knows which bins it holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatioSeries {
    frequencies: Vec<f64>,
    ratios: Vec<f64>,
    first_bin: usize,
}

impl RatioSeries {
    pub fn new(frequencies: Vec<f64>, ratios: Vec<f64>) -> Result<Self, AnalysisError> {
        if frequencies.len() != ratios.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "Ratio series lengths don't match: frequencies={}, ratios={}",
                frequencies.len(),
                ratios.len()
            )));
        }
        Ok(Self {
            frequencies,
            ratios,
            first_bin: 0,
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

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    pub fn first_bin(&self) -> usize {
        self.first_bin
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies.iter().copied().zip(self.ratios.iter().copied())
    }

    /// Copy of the bins in `range`; the caller guarantees the range is in bounds
    pub(crate) fn slice(&self, range: Range<usize>) -> Self {
        Self {
            frequencies: self.frequencies[range.clone()].to_vec(),
            ratios: self.ratios[range.clone()].to_vec(),
            first_bin: self.first_bin + range.start,
        }
    }
}

/// Diagnostic produced when index pairing does not match frequencies
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentMismatch {
    pub air_len: usize,
    pub medium_len: usize,
    /// First aligned bin whose frequency labels differ
    pub first_mismatched_bin: Option<usize>,
}

impl fmt::Display for AlignmentMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spectra paired by index: air has {} bins, medium has {}",
            self.air_len, self.medium_len
        )?;
        if let Some(bin) = self.first_mismatched_bin {
            write!(f, ", frequencies differ from bin {}", bin)?;
        }
        Ok(())
    }
}

/// Builds the [`RatioSeries`] of two spectra
#[derive(Debug, Clone, Default)]
pub struct RatioBuilder {
    orientation: RatioOrientation,
    strict_alignment: bool,
}

impl RatioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orientation(mut self, orientation: RatioOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Turn alignment mismatches into errors instead of warnings
    pub fn with_strict_alignment(mut self, strict: bool) -> Self {
        self.strict_alignment = strict;
        self
    }

    /// Compare lengths and frequency labels of the two spectra
    pub fn check_alignment(air: &Spectrum, medium: &Spectrum) -> Option<AlignmentMismatch> {
        let first_mismatched_bin = air
            .frequencies()
            .iter()
            .zip(medium.frequencies())
            .position(|(a, m)| (a - m).abs() > FREQUENCY_TOLERANCE * a.abs().max(m.abs()));

        if air.len() == medium.len() && first_mismatched_bin.is_none() {
            return None;
        }
        Some(AlignmentMismatch {
            air_len: air.len(),
            medium_len: medium.len(),
            first_mismatched_bin,
        })
    }

    /// Divide the aligned magnitudes
    ///
    /// The output has `min(air.len(), medium.len())` bins and takes its
    /// frequencies from the air spectrum.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::DivisionByZero`] if a denominator magnitude is exactly 0
    /// - [`AnalysisError::InvalidInput`] if a quotient overflows to infinity
    /// - [`AnalysisError::InvalidInput`] on misaligned spectra in strict mode
    pub fn build(&self, air: &Spectrum, medium: &Spectrum) -> Result<RatioSeries, AnalysisError> {
        if let Some(mismatch) = Self::check_alignment(air, medium) {
            if self.strict_alignment {
                return Err(AnalysisError::InvalidInput(format!(
                    "Misaligned spectra: {}",
                    mismatch
                )));
            }
            warn!("Misaligned spectra: {}", mismatch);
        }

        let length = air.len().min(medium.len());
        let mut ratios = Vec::with_capacity(length);

        for i in 0..length {
            let (numerator, denominator) = match self.orientation {
                RatioOrientation::AirOverMedium => (air.magnitudes()[i], medium.magnitudes()[i]),
                RatioOrientation::MediumOverAir => (medium.magnitudes()[i], air.magnitudes()[i]),
            };
            if denominator == 0.0 {
                return Err(AnalysisError::DivisionByZero {
                    index: i,
                    frequency: air.frequencies()[i],
                    numerator,
                });
            }
            let ratio = numerator / denominator;
            if !ratio.is_finite() {
                return Err(AnalysisError::InvalidInput(format!(
                    "Ratio {} / {} at bin {} (f={}) is not finite",
                    numerator,
                    denominator,
                    i,
                    air.frequencies()[i]
                )));
            }
            ratios.push(ratio);
        }

        RatioSeries::new(air.frequencies()[..length].to_vec(), ratios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spectrum(magnitudes: &[f64]) -> Spectrum {
        Spectrum::new(
            (0..magnitudes.len()).map(|i| i as f64 * 0.5).collect(),
            magnitudes.to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn test_ratio_of_equal_length_spectra() {
        let air = spectrum(&[4.0, 3.0, 1.0, 7.5]);
        let medium = spectrum(&[2.0, 0.3, 4.0, 2.5]);
        let series = RatioBuilder::new().build(&air, &medium).unwrap();

        assert_eq!(series.len(), 4);
        assert_eq!(series.frequencies(), air.frequencies());
        for (i, ratio) in series.ratios().iter().enumerate() {
            assert_relative_eq!(
                *ratio,
                air.magnitudes()[i] / medium.magnitudes()[i],
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_zero_denominator_is_an_error() {
        let air = spectrum(&[4.0, 3.0, 1.0]);
        let medium = spectrum(&[2.0, 0.0, 4.0]);
        match RatioBuilder::new().build(&air, &medium) {
            Err(AnalysisError::DivisionByZero {
                index,
                frequency,
                numerator,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(frequency, 0.5);
                assert_eq!(numerator, 3.0);
            }
            other => panic!("expected DivisionByZero, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_quotient_is_an_error() {
        let air = spectrum(&[1.0e10, 1.0]);
        let medium = spectrum(&[1.0e-310, 1.0]);
        match RatioBuilder::new().build(&air, &medium) {
            Err(AnalysisError::InvalidInput(message)) => {
                assert!(message.contains("bin 0"), "{}", message);
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        // Subnormal but finite quotients still pass
        let series = RatioBuilder::new()
            .build(&spectrum(&[1.0e-300]), &spectrum(&[1.0e10]))
            .unwrap();
        assert!(series.ratios()[0].is_finite());
    }

    #[test]
    fn test_medium_over_air_orientation() {
        let air = spectrum(&[4.0, 0.0]);
        let medium = spectrum(&[2.0, 1.0]);
        let builder = RatioBuilder::new().with_orientation(RatioOrientation::MediumOverAir);

        // The zero now sits in the denominator
        assert!(matches!(
            builder.build(&air, &medium),
            Err(AnalysisError::DivisionByZero { index: 1, .. })
        ));

        let series = builder.build(&spectrum(&[4.0]), &spectrum(&[2.0])).unwrap();
        assert_eq!(series.ratios(), &[0.5]);
    }

    #[test]
    fn test_unequal_lengths_are_truncated_and_flagged() {
        let air = spectrum(&[1.0, 2.0, 3.0, 4.0]);
        let medium = spectrum(&[1.0, 1.0]);

        let mismatch = RatioBuilder::check_alignment(&air, &medium).unwrap();
        assert_eq!(mismatch.air_len, 4);
        assert_eq!(mismatch.medium_len, 2);
        assert_eq!(mismatch.first_mismatched_bin, None);

        let series = RatioBuilder::new().build(&air, &medium).unwrap();
        assert_eq!(series.ratios(), &[1.0, 2.0]);

        assert!(matches!(
            RatioBuilder::new()
                .with_strict_alignment(true)
                .build(&air, &medium),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_frequency_mismatch_is_detected() {
        let air = Spectrum::new(vec![0.0, 1.0, 2.0], vec![1.0; 3]).unwrap();
        let medium = Spectrum::new(vec![0.0, 1.5, 3.0], vec![1.0; 3]).unwrap();
        let mismatch = RatioBuilder::check_alignment(&air, &medium).unwrap();
        assert_eq!(mismatch.first_mismatched_bin, Some(1));
        assert!(RatioBuilder::check_alignment(&air, &air).is_none());
    }

    #[test]
    fn test_slice() {
        let series = RatioSeries::new(vec![0.0, 1.0, 2.0], vec![5.0, 6.0, 7.0]).unwrap();
        let sliced = series.slice(1..3);
        assert_eq!(sliced.frequencies(), &[1.0, 2.0]);
        assert_eq!(sliced.ratios(), &[6.0, 7.0]);
        assert_eq!(sliced.first_bin(), 1);
        assert_eq!(sliced.slice(1..2).first_bin(), 2);
    }
}
