// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::debug;

use super::Config;

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line.
///
/// # Example
///
/// ```bash
/// ./rust_refractive_index --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    println!("{}", formatted_config_schema()?);
    Ok(())
}

/// The embedded JSON schema, pretty-printed
pub fn formatted_config_schema() -> Result<String> {
    let schema_str = include_str!("../../resources/config.schema.json");
    let schema: serde_json::Value =
        serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;
    serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")
}

/// Validates the configuration against additional rules that aren't covered by the JSON schema.
///
/// # Validation Rules
///
/// - **Tolerance**: `fit.xatol` must be a positive finite number
/// - **Iteration budget**: `fit.max_iterations` must be at least 1
/// - **Preset window**: `selection.lower` and `selection.upper` are given together,
///   with `0 <= lower < upper`. The upper bound against the series length can only
///   be checked once the spectra are known.
/// - **Data file**: `input.data_file` must not be empty
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    if !config.fit.xatol.is_finite() || config.fit.xatol <= 0.0 {
        anyhow::bail!(
            "fit.xatol must be a positive number, got {}",
            config.fit.xatol
        );
    }

    if config.fit.max_iterations == 0 {
        anyhow::bail!("fit.max_iterations must be at least 1");
    }

    match (config.selection.lower, config.selection.upper) {
        (None, None) => {}
        (Some(lower), Some(upper)) => {
            if lower < 0 {
                anyhow::bail!("selection.lower must not be negative, got {}", lower);
            }
            if lower >= upper {
                anyhow::bail!(
                    "selection.lower ({}) must be smaller than selection.upper ({})",
                    lower,
                    upper
                );
            }
        }
        _ => anyhow::bail!("selection.lower and selection.upper must be given together"),
    }

    if config.input.data_file.as_os_str().is_empty() {
        anyhow::bail!("input.data_file must not be empty");
    }

    Ok(())
}
