// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//! Spectrum preprocessing module
//!
//! This module combines the air and medium spectra into the amplitude
//! ratio the fitter works on.

pub mod ratio;

pub use ratio::{AlignmentMismatch, RatioBuilder, RatioOrientation, RatioSeries};

/// Create a ratio builder with the given orientation and alignment policy
pub fn create_ratio_builder(orientation: RatioOrientation, strict_alignment: bool) -> RatioBuilder {
    RatioBuilder::new()
        .with_orientation(orientation)
        .with_strict_alignment(strict_alignment)
}
