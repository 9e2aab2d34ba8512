// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the refractive index analyzer
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings. The configuration is backed by a YAML file and
//! validated against a JSON schema for robustness.
//!
//! ## Configuration Structure
//!
//! The configuration is organized as a nested structure with sections:
//! - `input`: Measurement file to read
//! - `spectral`: Spectral transform settings
//! - `ratio`: Orientation and alignment policy of the spectral ratio
//! - `selection`: Optional preset frequency window
//! - `fit`: Bounded minimiser settings
//! - `output`: Appended tables, plots and HTML report
//!
//! ## Usage
//!
//! ```no_run
//! use rust_refractive_index::config::{CliOverrides, Config};
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(CliOverrides {
//!     lower: Some(3),
//!     upper: Some(40),
//!     ..Default::default()
//! });
//!
//! println!("Data file: {}", config.input.data_file.display());
//! ```

pub mod fit;
pub mod input;
pub mod output;
pub mod processing;
pub mod selection;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

// Re-export all types for public API
pub use fit::FitConfig;
pub use input::InputConfig;
pub use output::OutputConfig;
pub use processing::{RatioConfig, SpectralConfig};
pub use selection::SelectionConfig;
pub use utils::{output_config_schema, validate_specific_rules};

use crate::preprocessing::RatioOrientation;
use crate::spectral::WindowFunction;

/// Root configuration structure of the analyzer.
///
/// Every section falls back to its default values when it is missing from the
/// file, so an empty YAML document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub spectral: SpectralConfig,

    #[serde(default)]
    pub ratio: RatioConfig,

    /// Preset window. When unset the operator is asked interactively.
    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub fit: FitConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Command line values overriding the loaded configuration
///
/// `None` (or `false` for flags) leaves the configured value untouched.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_file: Option<PathBuf>,
    pub lower: Option<i64>,
    pub upper: Option<i64>,
    pub window_function: Option<WindowFunction>,
    pub orientation: Option<RatioOrientation>,
    pub plot_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
    /// Disable every append to the data file
    pub no_append: bool,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Original path: {:?}, Sample path: {:?}", path, sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with the default values. A file that fails
    /// schema validation, deserialization or the specific rules is left
    /// untouched, a `<name>.sample.yaml` with defaults is written next to it
    /// and an error is returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // An empty document is null in YAML; treat it as an empty mapping
        let yaml_value: serde_yml::Value = match serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?
        {
            serde_yml::Value::Null => serde_yml::Value::Mapping(Default::default()),
            value => value,
        };

        let json_value = serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })?;

        let schema_str = include_str!("../../resources/config.schema.json");
        let schema: serde_json::Value =
            serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_yml::from_value(yaml_value) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values explicitly provided override the existing configuration.
    /// The result is not re-validated here; callers run
    /// [`validate_specific_rules`] afterwards.
    pub fn apply_args(&mut self, overrides: CliOverrides) {
        if let Some(data_file) = overrides.data_file {
            debug!("Overriding data file from command line: {:?}", data_file);
            self.input.data_file = data_file;
        }

        if let Some(lower) = overrides.lower {
            debug!("Overriding window lower bound from command line: {}", lower);
            self.selection.lower = Some(lower);
        }
        if let Some(upper) = overrides.upper {
            debug!("Overriding window upper bound from command line: {}", upper);
            self.selection.upper = Some(upper);
        }

        if let Some(window_function) = overrides.window_function {
            debug!(
                "Overriding window function from command line: {:?}",
                window_function
            );
            self.spectral.window_function = window_function;
        }
        if let Some(orientation) = overrides.orientation {
            debug!(
                "Overriding ratio orientation from command line: {:?}",
                orientation
            );
            self.ratio.orientation = orientation;
        }

        if let Some(plot_dir) = overrides.plot_dir {
            debug!("Overriding plot directory from command line: {:?}", plot_dir);
            self.output.plot_dir = Some(plot_dir);
        }
        if let Some(report) = overrides.report {
            debug!("Overriding report path from command line: {:?}", report);
            self.output.report = Some(report);
        }

        if overrides.no_append {
            debug!("Appending to the data file disabled from command line");
            self.output.append_tables = false;
            self.output.append_fit = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_apply_args_only_overrides_given_values() {
        let mut config = Config::default();
        config.apply_args(CliOverrides {
            lower: Some(2),
            orientation: Some(RatioOrientation::MediumOverAir),
            no_append: true,
            ..Default::default()
        });

        assert_eq!(config.selection.lower, Some(2));
        assert_eq!(config.selection.upper, None);
        assert_eq!(config.ratio.orientation, RatioOrientation::MediumOverAir);
        assert_eq!(config.spectral.window_function, WindowFunction::Rectangular);
        assert!(!config.output.append_tables);
        assert!(!config.output.append_fit);
        assert_eq!(config.input.data_file, PathBuf::from("data.txt"));
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        fs::write(&path, "").unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), Config::default());
    }
}
