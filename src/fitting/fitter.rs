// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Per-bin refractive index fit
//!
//! Every `(frequency, ratio)` pair is fitted on its own: the fitter looks for
//! the `n` in `[N_LOWER_BOUND, N_UPPER_BOUND]` minimising
//! `|model(n, f) - ratio|`. Bins share nothing, so they are fitted in parallel
//! when enabled; the output order always follows the bin order.

use log::{debug, error, info};
use rayon::prelude::*;
use serde::Serialize;

use super::minimizer::{minimize_bounded, BoundedOptions};
use super::model::{LosslessSlab, TransmissionModel};
use crate::error::AnalysisError;
use crate::preprocessing::RatioSeries;

/// Smallest physically plausible refractive index
pub const N_LOWER_BOUND: f64 = 1.0;
/// Largest refractive index considered by the fit
pub const N_UPPER_BOUND: f64 = 5.0;

/// Fitted index of one frequency bin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    /// Spectral bin index
    pub index: usize,
    pub frequency: f64,
    /// Observed amplitude ratio
    pub ratio: f64,
    /// Estimated refractive index
    pub n: f64,
    /// `|model(n, f) - ratio|` at the estimate
    pub residual: f64,
    /// Objective evaluations used by the minimiser
    pub iterations: usize,
    /// The estimate sits on one of the bounds of the search interval
    pub at_bound: bool,
}

/// Outcome of fitting a whole series
#[derive(Debug, Default)]
pub struct FitReport {
    pub results: Vec<FitResult>,
    /// Bins that could not be fitted, in bin order
    pub failures: Vec<AnalysisError>,
}

impl FitReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Bounded scalar fit of the refractive index
#[derive(Debug, Clone)]
pub struct ParameterFitter<M: TransmissionModel = LosslessSlab> {
    model: M,
    options: BoundedOptions,
    parallel: bool,
}

impl Default for ParameterFitter<LosslessSlab> {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterFitter<LosslessSlab> {
    /// Create a fitter for the lossless slab model
    pub fn new() -> Self {
        Self::with_model(LosslessSlab)
    }
}

impl<M: TransmissionModel> ParameterFitter<M> {
    pub fn with_model(model: M) -> Self {
        Self {
            model,
            options: BoundedOptions::default(),
            parallel: true,
        }
    }

    pub fn with_options(mut self, options: BoundedOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn options(&self) -> &BoundedOptions {
        &self.options
    }

    /// Fit a single `(frequency, ratio)` pair
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InvalidInput`] if `frequency` or `ratio` is not finite
    /// - [`AnalysisError::FitNotConverged`] if the minimiser cannot certify an optimum
    pub fn fit_bin(
        &self,
        index: usize,
        frequency: f64,
        ratio: f64,
    ) -> Result<FitResult, AnalysisError> {
        if !frequency.is_finite() || !ratio.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "Bin {} has a non-finite input (f={}, ratio={})",
                index, frequency, ratio
            )));
        }

        let objective = |n: f64| (self.model.magnitude(n, frequency) - ratio).abs();

        let minimum = minimize_bounded(objective, N_LOWER_BOUND, N_UPPER_BOUND, &self.options)
            .map_err(|e| {
                debug!("Minimiser failed on bin {}: {}", index, e);
                AnalysisError::FitNotConverged {
                    index,
                    frequency,
                    ratio,
                    iterations: e.iterations(),
                }
            })?;

        if minimum.at_bound {
            debug!(
                "Bin {} (f={}, ratio={}) pinned to bound: n={}",
                index, frequency, ratio, minimum.x
            );
        }

        Ok(FitResult {
            index,
            frequency,
            ratio,
            n: minimum.x,
            residual: minimum.fx,
            iterations: minimum.iterations,
            at_bound: minimum.at_bound,
        })
    }

    /// Fit every bin of a series, one result per bin in bin order
    pub fn fit_bins(&self, series: &RatioSeries) -> Vec<Result<FitResult, AnalysisError>> {
        let first_bin = series.first_bin();
        let fit = |(i, (frequency, ratio)): (usize, (f64, f64))| {
            self.fit_bin(first_bin + i, frequency, ratio)
        };

        if self.parallel {
            series
                .frequencies()
                .par_iter()
                .copied()
                .zip(series.ratios().par_iter().copied())
                .enumerate()
                .map(fit)
                .collect()
        } else {
            series.iter().enumerate().map(fit).collect()
        }
    }

    /// Fit a series, splitting successes from failed bins
    ///
    /// A bin that fails is logged and skipped; it never aborts the other bins.
    pub fn fit(&self, series: &RatioSeries) -> FitReport {
        let mut report = FitReport::default();
        for outcome in self.fit_bins(series) {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(e) => {
                    error!("Skipping bin: {}", e);
                    report.failures.push(e);
                }
            }
        }

        let pinned = report.results.iter().filter(|r| r.at_bound).count();
        info!(
            "Fitted {} bins ({} failed, {} on the [{}, {}] bounds)",
            report.results.len(),
            report.failures.len(),
            pinned,
            N_LOWER_BOUND,
            N_UPPER_BOUND
        );
        report
    }
}
