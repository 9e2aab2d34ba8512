// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Gaussian Noise Generator
//!
//! Lightweight Gaussian white noise used to blur synthetic traces, so that the
//! fitting chain can be exercised on data that is not numerically perfect.
//!
//! * XORShift pseudo-random number generation
//! * Box-Muller transform for the Gaussian distribution
//!
//! ## Examples
//!
//! ```rust
//! use rust_refractive_index::utility::noise_generator::NoiseGenerator;
//!
//! let mut generator = NoiseGenerator::new(12345);
//! let noise = generator.generate(1024, 0.01);
//! assert_eq!(noise.len(), 1024);
//! ```

/// XORShift random source; not suitable for cryptographic purposes
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    rng_state: u32,
}

impl NoiseGenerator {
    /// Creates a new noise generator with a given seed.
    ///
    /// The same seed always yields the same sequence. A zero seed would
    /// lock XORShift at zero and is replaced by a fixed non-zero value.
    pub fn new(seed: u32) -> Self {
        Self {
            rng_state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Uniform value in `[-1.0, 1.0]`
    pub fn random_float(&mut self) -> f64 {
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 17;
        self.rng_state ^= self.rng_state << 5;

        (self.rng_state as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    /// Standard normal value
    pub fn random_gaussian(&mut self) -> f64 {
        let u1 = (self.random_float() + 1.0) / 2.0;
        let u2 = (self.random_float() + 1.0) / 2.0;

        // Avoid ln(0)
        let u1 = u1.max(1e-12);

        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// `num_samples` Gaussian values with standard deviation `amplitude`
    pub fn generate(&mut self, num_samples: usize, amplitude: f64) -> Vec<f64> {
        (0..num_samples)
            .map(|_| self.random_gaussian() * amplitude)
            .collect()
    }

    /// Add noise in place
    pub fn add_to(&mut self, values: &mut [f64], amplitude: f64) {
        for value in values.iter_mut() {
            *value += self.random_gaussian() * amplitude;
        }
    }
}
