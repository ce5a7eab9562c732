//! Agent configuration document.
//!
//! The document describes the agent to the deployment runner: identity,
//! where and how it is served, and which environment variables it reads.

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name searched for in the working directory and config directory.
pub const CONFIG_FILE_NAME: &str = "agent_config";

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(default)]
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "youtube-agent".to_string(),
            description: "AI agent that analyzes YouTube videos and creates structured summaries \
                with accurate timestamps. Extracts key insights from video content for easy navigation."
                .to_string(),
            version: "1.0.0".to_string(),
            deployment: DeploymentConfig::default(),
            environment_variables: vec![
                EnvironmentVariable {
                    key: "OPENROUTER_API_KEY".to_string(),
                    description: "OpenRouter API key for LLM calls (required)".to_string(),
                    required: true,
                },
                EnvironmentVariable {
                    key: "MODEL_NAME".to_string(),
                    description: "Model ID for OpenRouter (default: openai/gpt-4o)".to_string(),
                    required: false,
                },
                EnvironmentVariable {
                    key: "MEM0_API_KEY".to_string(),
                    description: "Mem0 API key for conversation memory".to_string(),
                    required: false,
                },
            ],
        }
    }
}

/// Deployment settings consumed by the HTTP runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Public URL of the agent; host and port are also used for binding.
    pub url: String,
    /// Bind on all interfaces instead of loopback only.
    pub expose: bool,
    pub protocol_version: String,
    /// Reverse proxies allowed in front of the agent.
    pub proxy_urls: Vec<String>,
    /// Allowed CORS origins (`*` allows any).
    pub cors_origins: Vec<String>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3773".to_string(),
            expose: true,
            protocol_version: "1.0.0".to_string(),
            proxy_urls: vec!["127.0.0.1".to_string()],
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// An environment variable the agent reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

impl AgentConfig {
    /// Load the configuration document, falling back to the built-in default.
    ///
    /// An explicit path is tried first, then the standard locations. Files
    /// that cannot be read or parsed are skipped with a warning.
    pub fn load(explicit: Option<&str>) -> Self {
        for path in Self::candidate_paths(explicit) {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    debug!("Loaded agent config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Error reading {}: {}", path.display(), e);
                }
            }
        }

        debug!("No agent config file found, using defaults");
        Self::default()
    }

    /// Load the configuration document from a specific file.
    ///
    /// Files ending in `.toml` are parsed as TOML, everything else as JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(config)
    }

    /// Locations searched for the configuration document, in order.
    pub fn candidate_paths(explicit: Option<&str>) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(p) = explicit {
            paths.push(Self::expand_path(p));
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        paths.push(cwd.join(format!("{}.json", CONFIG_FILE_NAME)));
        paths.push(cwd.join(format!("{}.toml", CONFIG_FILE_NAME)));

        if let Some(dir) = dirs::config_dir() {
            paths.push(
                dir.join(env!("CARGO_PKG_NAME"))
                    .join(format!("{}.json", CONFIG_FILE_NAME)),
            );
        }

        paths
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Serialize the document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether the document declares the given environment variable as required.
    pub fn requires(&self, key: &str) -> bool {
        self.environment_variables
            .iter()
            .any(|v| v.key == key && v.required)
    }
}

impl DeploymentConfig {
    /// Parse the deployment URL.
    pub fn parsed_url(&self) -> Result<url::Url> {
        url::Url::parse(&self.url)
            .map_err(|e| AgentError::Config(format!("Invalid deployment url '{}': {}", self.url, e)))
    }

    /// Address the HTTP runner binds to.
    ///
    /// Uses the host and port of `url`. A loopback host is widened to all
    /// interfaces when `expose` is set.
    pub fn bind_addr(&self) -> Result<String> {
        let url = self.parsed_url()?;
        let host = url
            .host_str()
            .ok_or_else(|| AgentError::Config(format!("Deployment url has no host: {}", self.url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| AgentError::Config(format!("Deployment url has no port: {}", self.url)))?;

        let is_loopback = matches!(host, "127.0.0.1" | "localhost" | "[::1]");
        let host = if self.expose && is_loopback { "0.0.0.0" } else { host };

        Ok(format!("{}:{}", host, port))
    }

    /// Whether any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.name, "youtube-agent");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.deployment.url, "http://127.0.0.1:3773");
        assert!(config.deployment.expose);
        assert_eq!(config.deployment.cors_origins, vec!["*"]);
        assert_eq!(config.environment_variables.len(), 3);
        assert!(config.requires("OPENROUTER_API_KEY"));
        assert!(!config.requires("MEM0_API_KEY"));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "name": "custom-agent",
                "description": "Custom",
                "version": "2.0.0",
                "deployment": {{ "url": "http://localhost:4000", "expose": false }}
            }}"#
        )
        .unwrap();

        let config = AgentConfig::load_from(file.path()).unwrap();
        assert_eq!(config.name, "custom-agent");
        assert_eq!(config.deployment.url, "http://localhost:4000");
        assert!(!config.deployment.expose);
        // Missing fields fall back to defaults
        assert_eq!(config.deployment.protocol_version, "1.0.0");
        assert!(config.environment_variables.is_empty());
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
name = "toml-agent"
description = "From TOML"
version = "0.3.0"

[deployment]
url = "http://127.0.0.1:9000"
cors_origins = ["https://example.com"]

[[environment_variables]]
key = "OPENROUTER_API_KEY"
required = true
"#
        )
        .unwrap();

        let config = AgentConfig::load_from(file.path()).unwrap();
        assert_eq!(config.name, "toml-agent");
        assert_eq!(config.deployment.cors_origins, vec!["https://example.com"]);
        assert!(config.requires("OPENROUTER_API_KEY"));
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();

        let path = file.path().to_string_lossy().to_string();
        assert!(AgentConfig::load_from(file.path()).is_err());

        // With no valid candidates left, the default document is used
        let config = AgentConfig::load(Some(&path));
        assert!(!config.name.is_empty());
    }

    #[test]
    fn test_bind_addr() {
        let mut deployment = DeploymentConfig::default();
        assert_eq!(deployment.bind_addr().unwrap(), "0.0.0.0:3773");

        deployment.expose = false;
        assert_eq!(deployment.bind_addr().unwrap(), "127.0.0.1:3773");

        deployment.url = "http://10.0.0.5:8080".to_string();
        deployment.expose = true;
        assert_eq!(deployment.bind_addr().unwrap(), "10.0.0.5:8080");

        deployment.url = "not a url".to_string();
        assert!(deployment.bind_addr().is_err());
    }
}
