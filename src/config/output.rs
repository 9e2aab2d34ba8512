// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Output configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the run writes besides the console summary.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Append the air and medium FFT tables to the data file.
    pub append_tables: bool,

    /// Append the refractive index fit table to the data file.
    pub append_fit: bool,

    /// Directory receiving the SVG plots. No plots when unset.
    #[serde(default)]
    pub plot_dir: Option<PathBuf>,

    /// Path of the HTML report. No report when unset.
    #[serde(default)]
    pub report: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            append_tables: true,
            append_fit: true,
            plot_dir: None,
            report: None,
        }
    }
}
