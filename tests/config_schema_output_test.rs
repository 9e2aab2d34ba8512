// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-refractive-index project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rust_refractive_index::config;

#[test]
fn test_config_schema_output() -> Result<()> {
    // The output goes to stdout; only check that it does not fail
    config::output_config_schema()?;

    let schema: serde_json::Value = serde_json::from_str(&config::utils::formatted_config_schema()?)?;
    for section in ["input", "spectral", "ratio", "selection", "fit", "output"] {
        assert!(
            schema["properties"].get(section).is_some(),
            "schema misses section {}",
            section
        );
    }
    Ok(())
}
