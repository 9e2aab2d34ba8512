// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rust Refractive Index library
//!
//! Estimates the refractive index of a medium from two transmitted-wave
//! traces, one recorded through air and one through the medium. Both traces
//! are transformed to amplitude spectra, divided bin by bin, truncated to an
//! operator-chosen frequency window and fitted against the transmission model
//! of a lossless slab.

pub mod acquisition;
pub mod config;
pub mod error;
pub mod fitting;
pub mod pipeline;
pub mod preprocessing;
pub mod selection;
pub mod spectral;
pub mod utility;
pub mod visualization;

pub use error::AnalysisError;
pub use pipeline::{AnalysisOutcome, Pipeline};
