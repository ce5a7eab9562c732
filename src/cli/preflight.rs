//! Pre-flight checks before starting the agent.
//!
//! The agent only builds itself on the first request, so a missing key or
//! tool would otherwise surface long after startup.

use crate::config::{Credentials, EnvSource};
use crate::error::{AgentError, Result};
use crate::openai::missing_key_message;
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Serving needs the OpenRouter key and yt-dlp, but can start without them.
    Serve,
    /// A one-shot prompt needs both up front.
    Ask,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or the first missing requirement.
pub fn check(operation: Operation, env: &dyn EnvSource) -> Result<()> {
    match operation {
        Operation::Serve | Operation::Ask => {
            check_api_key(env)?;
            check_tool("yt-dlp")?;
        }
    }
    Ok(())
}

/// Whether a failed check should stop the operation.
pub fn is_blocking(operation: Operation) -> bool {
    matches!(operation, Operation::Ask)
}

/// Check if the OpenRouter API key is configured.
fn check_api_key(env: &dyn EnvSource) -> Result<()> {
    match Credentials::from_source(env).openrouter_api_key {
        Some(_) => Ok(()),
        None => Err(AgentError::MissingCredential(missing_key_message())),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(AgentError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AgentError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(AgentError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
