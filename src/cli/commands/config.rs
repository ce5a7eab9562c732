//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::AgentConfig;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, explicit: Option<&str>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = AgentConfig::load(explicit);
            println!("{}", config.to_json_pretty()?);
        }

        ConfigAction::Path => {
            for path in AgentConfig::candidate_paths(explicit) {
                let marker = if path.exists() { "found" } else { "missing" };
                Output::kv(marker, &path.display().to_string());
            }
        }
    }

    Ok(())
}
