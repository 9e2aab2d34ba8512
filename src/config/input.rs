// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Input file configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the raw traces are read from.
///
/// The same file receives the appended result tables.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InputConfig {
    /// Path of the measurement file holding the `Air Raw Data` and
    /// `Medium Raw Data` sections.
    pub data_file: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.txt"),
        }
    }
}
