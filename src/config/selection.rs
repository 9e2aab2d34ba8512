// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Frequency window configuration

use serde::{Deserialize, Serialize};

/// Optional preset window.
///
/// When both bounds are set the window is validated against the ratio series
/// and used as is; the operator is not prompted. Either both or neither must
/// be given.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SelectionConfig {
    /// First bin of the window (inclusive).
    #[serde(default)]
    pub lower: Option<i64>,

    /// End of the window (exclusive).
    #[serde(default)]
    pub upper: Option<i64>,
}

impl SelectionConfig {
    /// The preset `(lower, upper)` pair, if fully specified
    pub fn preset(&self) -> Option<(i64, i64)> {
        self.lower.zip(self.upper)
    }
}
