// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Spectral and ratio stage configuration

use serde::{Deserialize, Serialize};

use crate::preprocessing::RatioOrientation;
use crate::spectral::WindowFunction;

/// Settings of the spectral transform.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SpectralConfig {
    /// Window applied to the trace before the transform.
    ///
    /// `rectangular` leaves the samples untouched and reproduces the raw DFT.
    #[serde(default)]
    pub window_function: WindowFunction,
}

/// Settings of the spectral ratio.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RatioConfig {
    /// Which spectrum is the numerator.
    #[serde(default)]
    pub orientation: RatioOrientation,

    /// Refuse spectra whose bins do not line up instead of warning.
    #[serde(default)]
    pub strict_alignment: bool,
}
