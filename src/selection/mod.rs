// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! # Frequency Window Selection
//!
//! Only part of the spectrum carries usable signal. An operator picks the
//! `[lower, upper)` bin range to fit, looks at the truncated ratio series and
//! confirms it. The exchange is an explicit state machine
//! ([`WindowSelector`]) talking to an injectable [`OperatorInput`], so the
//! same code runs on a terminal, from a script, or under test.

pub mod operator;
pub mod window;

pub use operator::{Confirmation, OperatorInput, RangeReply, ScriptedOperator, TerminalOperator};
pub use window::{Selection, SelectionState, Window, WindowSelector};

use crate::error::AnalysisError;
use crate::preprocessing::RatioSeries;

/// Use a window fixed in advance, without asking anybody
pub fn preset_selection(
    series: &RatioSeries,
    lower: i64,
    upper: i64,
) -> Result<Selection, AnalysisError> {
    let window = Window::validate(lower, upper, series.len())?;
    Ok(Selection {
        window,
        series: window.apply(series)?,
    })
}
