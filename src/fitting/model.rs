// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Closed-form transmission model of a lossless dielectric slab
//!
//! For a candidate real index `n` at frequency `f` the complex transmission is
//!
//! ```text
//! t(n, f) = 4n / (n + 1)^2 * exp(i * (n - 1) * 2*pi*f*d / c)
//! ```
//!
//! where `d` is the slab thickness [`PATH_LENGTH_M`] and `c` the speed of
//! light [`SPEED_OF_LIGHT_M_S`]. Only `|t|` is compared with measurements.

use std::f64::consts::PI;

use num_complex::Complex64;

/// Thickness of the sample traversed by the wave, in meters
pub const PATH_LENGTH_M: f64 = 0.00021;

/// Speed of light used by the model, in meters per second
pub const SPEED_OF_LIGHT_M_S: f64 = 3.0e8;

/// Theoretical transmission magnitude for a candidate index
pub trait TransmissionModel: Send + Sync {
    fn magnitude(&self, n: f64, frequency: f64) -> f64;
}

/// Lossless slab of thickness [`PATH_LENGTH_M`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LosslessSlab;

impl LosslessSlab {
    /// Complex transmission coefficient
    pub fn transmission(&self, n: f64, frequency: f64) -> Complex64 {
        let amplitude = 4.0 * n / ((n + 1.0) * (n + 1.0));
        let phase = (n - 1.0) * (2.0 * PI * frequency * PATH_LENGTH_M / SPEED_OF_LIGHT_M_S);
        Complex64::new(amplitude, 0.0) * Complex64::new(0.0, phase).exp()
    }
}

impl TransmissionModel for LosslessSlab {
    fn magnitude(&self, n: f64, frequency: f64) -> f64 {
        self.transmission(n, frequency).norm()
    }
}

/// `|t(n, f)|` for the default slab
pub fn transmission_magnitude(n: f64, frequency: f64) -> f64 {
    LosslessSlab.magnitude(n, frequency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_transmission_at_n_one() {
        for &f in &[0.0, 1.0, 1.0e9, 2.5e11, 1.0e12, 7.3e13] {
            assert_relative_eq!(transmission_magnitude(1.0, f), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_magnitude_is_fresnel_amplitude() {
        // Silicon-like index: 4 * 3.42 / 4.42^2
        let expected = 4.0 * 3.42 / (4.42 * 4.42);
        assert_relative_eq!(transmission_magnitude(3.42, 1.0e12), expected, epsilon = 1e-12);
        assert_relative_eq!(transmission_magnitude(5.0, 0.0), 20.0 / 36.0, epsilon = 1e-12);
    }

    #[test]
    fn test_phase_follows_optical_path() {
        let f = 1.0e12;
        let t = LosslessSlab.transmission(2.0, f);
        let expected_phase = 2.0 * PI * f * PATH_LENGTH_M / SPEED_OF_LIGHT_M_S;
        // Compare through sin/cos, the phase wraps around
        assert_relative_eq!(t.arg().cos(), expected_phase.cos(), epsilon = 1e-9);
        assert_relative_eq!(t.arg().sin(), expected_phase.sin(), epsilon = 1e-9);
    }

    #[test]
    fn test_magnitude_decreases_with_index() {
        let mut previous = transmission_magnitude(1.0, 5.0e11);
        for i in 1..=40 {
            let n = 1.0 + i as f64 * 0.1;
            let current = transmission_magnitude(n, 5.0e11);
            assert!(current < previous, "not decreasing at n={}", n);
            previous = current;
        }
    }
}
