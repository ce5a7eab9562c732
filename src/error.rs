//! Error types for the YouTube agent.

use thiserror::Error;

/// Library-level error type for agent operations.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Agent not initialized")]
    AgentUnavailable,

    #[error("Failed to initialize capability: {0}")]
    Capability(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenRouter API error: {0}")]
    OpenAI(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

impl AgentError {
    /// Whether a later call can succeed once the environment is fixed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AgentError::MissingCredential(_) | AgentError::Capability(_))
    }
}

/// Result type alias for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
