//! Grid command implementation.

use anyhow::{Context, Result};

use pathways_core::ParameterGrid;

/// Execute the grid command.
pub fn execute(json: bool) -> Result<()> {
    let grid = ParameterGrid::reference();
    let text = if json {
        serde_json::to_string_pretty(&grid).context("Failed to serialize grid")?
    } else {
        serde_yaml_ng::to_string(&grid).context("Failed to serialize grid")?
    };
    println!("{text}");
    Ok(())
}
