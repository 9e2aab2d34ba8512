// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error taxonomy of the analysis pipeline
//!
//! Every numeric stage returns `Result<_, AnalysisError>`. Only
//! [`AnalysisError::InvalidRange`] is recovered inline (the operator is asked
//! again); [`AnalysisError::FitNotConverged`] flags a single bin, the other
//! variants abort the stage that raised them.

use thiserror::Error;

/// Errors raised by the spectral, ratio, selection and fitting stages
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Division by zero at bin {index} (f={frequency}): denominator magnitude is 0 (numerator {numerator})"
    )]
    DivisionByZero {
        index: usize,
        frequency: f64,
        numerator: f64,
    },

    #[error("Invalid range [{lower}, {upper}) for a series of length {length}")]
    InvalidRange {
        lower: i64,
        upper: i64,
        length: usize,
    },

    #[error(
        "Fit did not converge at bin {index} (f={frequency}, ratio={ratio}) after {iterations} iterations"
    )]
    FitNotConverged {
        index: usize,
        frequency: f64,
        ratio: f64,
        iterations: usize,
    },

    #[error("Operation cancelled by the operator")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Whether the error can be recovered by asking the operator again
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalysisError::InvalidRange { .. })
    }
}
