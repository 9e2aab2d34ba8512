// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Synthetic transmitted pulses
//!
//! The reference pulse is the first derivative of a Gaussian. Through a
//! lossless slab of index `n` it is scaled by the Fresnel factor
//! `4n / (n + 1)²` and delayed by `(n - 1) d / c`, which is exactly what the
//! fitted model describes.

use crate::acquisition::{Trace, TracePair};
use crate::error::AnalysisError;
use crate::fitting::{PATH_LENGTH_M, SPEED_OF_LIGHT_M_S};

use super::noise_generator::NoiseGenerator;

/// Shape and sampling of a synthetic measurement
#[derive(Debug, Clone)]
pub struct PulseParameters {
    /// Number of samples per trace
    pub samples: usize,
    /// Sample spacing, in seconds
    pub dx: f64,
    /// Arrival time of the reference pulse, in seconds
    pub center: f64,
    /// Gaussian width, in seconds
    pub width: f64,
    /// Peak amplitude of the reference pulse
    pub amplitude: f64,
    /// Standard deviation of the additive noise, 0 for clean traces
    pub noise: f64,
    pub seed: u32,
}

impl Default for PulseParameters {
    fn default() -> Self {
        Self {
            samples: 512,
            dx: 0.05e-12,
            center: 5.0e-12,
            width: 0.2e-12,
            amplitude: 1.0,
            noise: 0.0,
            seed: 1,
        }
    }
}

/// Gaussian-derivative pulse, peak value `amplitude`
fn pulse(t: f64, center: f64, width: f64, amplitude: f64) -> f64 {
    let u = (t - center) / width;
    // max of u·exp(-u²/2) is exp(-1/2) at u = 1
    amplitude * u * (-0.5 * u * u).exp() * std::f64::consts::E.sqrt()
}

/// Fresnel amplitude factor of the two slab interfaces
pub fn fresnel_factor(n: f64) -> f64 {
    4.0 * n / ((n + 1.0) * (n + 1.0))
}

/// Extra delay of the pulse crossing the slab
pub fn slab_delay(n: f64) -> f64 {
    (n - 1.0) * PATH_LENGTH_M / SPEED_OF_LIGHT_M_S
}

/// Air and medium traces for a slab of index `n`
pub fn synthesize(n: f64, parameters: &PulseParameters) -> Result<TracePair, AnalysisError> {
    if parameters.samples < 2 || !(parameters.dx > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Cannot synthesize {} samples with spacing {}",
            parameters.samples, parameters.dx
        )));
    }
    if !n.is_finite() || n < 1.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Refractive index must be finite and >= 1, got {}",
            n
        )));
    }

    let times: Vec<f64> = (0..parameters.samples)
        .map(|i| i as f64 * parameters.dx)
        .collect();
    let scale = fresnel_factor(n);
    let delay = slab_delay(n);

    let mut air: Vec<f64> = times
        .iter()
        .map(|&t| pulse(t, parameters.center, parameters.width, parameters.amplitude))
        .collect();
    let mut medium: Vec<f64> = times
        .iter()
        .map(|&t| {
            scale * pulse(t, parameters.center + delay, parameters.width, parameters.amplitude)
        })
        .collect();

    if parameters.noise > 0.0 {
        let mut generator = NoiseGenerator::new(parameters.seed);
        generator.add_to(&mut air, parameters.noise);
        generator.add_to(&mut medium, parameters.noise);
    }

    Ok(TracePair {
        air: Trace::from_xy(&times, &air)?,
        medium: Trace::from_xy(&times, &medium)?,
    })
}
