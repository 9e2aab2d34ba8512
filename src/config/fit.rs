// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Fitting configuration

use serde::{Deserialize, Serialize};

use crate::fitting::BoundedOptions;

/// Settings of the bounded minimiser.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FitConfig {
    /// Absolute tolerance on `n`. Must be positive.
    pub xatol: f64,

    /// Objective evaluations allowed per bin. Must be at least 1.
    pub max_iterations: usize,

    /// Fit bins on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for FitConfig {
    fn default() -> Self {
        let options = BoundedOptions::default();
        Self {
            xatol: options.xatol,
            max_iterations: options.max_iterations,
            parallel: default_parallel(),
        }
    }
}

impl FitConfig {
    pub fn options(&self) -> BoundedOptions {
        BoundedOptions {
            xatol: self.xatol,
            max_iterations: self.max_iterations,
        }
    }
}
