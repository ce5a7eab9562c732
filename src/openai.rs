//! OpenRouter client configuration with sensible defaults.
//!
//! OpenRouter speaks the OpenAI chat-completions API, so the OpenAI client is
//! reused with a different base URL.

use crate::error::{AgentError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// OpenRouter API base URL.
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Default timeout for model API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenRouter client with the default timeout.
pub fn create_client(api_key: &str) -> Result<Client<OpenAIConfig>> {
    create_client_for(OPENROUTER_API_BASE, api_key)
}

/// Create a client for any OpenAI-compatible endpoint.
pub fn create_client_for(api_base: &str, api_key: &str) -> Result<Client<OpenAIConfig>> {
    if api_key.is_empty() {
        return Err(AgentError::MissingCredential(missing_key_message()));
    }

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()?;

    let config = OpenAIConfig::new()
        .with_api_base(api_base)
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Message shown when the OpenRouter key is missing.
pub fn missing_key_message() -> String {
    "OpenRouter API key is required. Set OPENROUTER_API_KEY environment variable.\n\
     Get an API key from: https://openrouter.ai/keys"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        let err = create_client("").unwrap_err();
        assert!(matches!(err, AgentError::MissingCredential(_)));
    }

    #[test]
    fn test_client_created_with_key() {
        assert!(create_client("sk-or-test").is_ok());
    }
}
