//! Mem0 toolkit for conversation memory.

use crate::agent::{function_tool, parse_arguments, required_str, Toolkit};
use crate::error::{AgentError, Result};
use async_openai::types::ChatCompletionTool;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use std::time::Duration;

/// Hosted Mem0 API.
pub const MEM0_API_BASE: &str = "https://api.mem0.ai";
/// Memory owner used when none is configured.
pub const DEFAULT_USER_ID: &str = "youtube-agent";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Tools for storing and recalling facts across conversations.
pub struct Mem0Tools {
    http: reqwest::Client,
    base_url: String,
    user_id: String,
}

impl Mem0Tools {
    /// Create a Mem0 toolkit authenticated with `api_key`.
    pub fn new(api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AgentError::Capability("Mem0 API key is empty".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Token {}", api_key.trim()))
            .map_err(|e| AgentError::Capability(format!("Invalid Mem0 API key: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| AgentError::Capability(format!("Mem0 client: {}", e)))?;

        Ok(Self {
            http,
            base_url: MEM0_API_BASE.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        })
    }

    /// Use a different API endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Scope memories to a user.
    pub fn with_user_id(mut self, user_id: &str) -> Self {
        self.user_id = user_id.to_string();
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Store a fact.
    pub async fn add_memory(&self, content: &str) -> Result<String> {
        let body = json!({
            "messages": [{"role": "user", "content": content}],
            "user_id": self.user_id,
        });

        let result: Value = self
            .http
            .post(self.endpoint("/v1/memories/"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(format!("Memory stored: {}", result))
    }

    /// Find memories relevant to `query`.
    pub async fn search_memory(&self, query: &str) -> Result<String> {
        let body = json!({ "query": query, "user_id": self.user_id });

        let result: Value = self
            .http
            .post(self.endpoint("/v1/memories/search/"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(format_memories(&result))
    }

    /// List every stored memory.
    pub async fn get_all_memories(&self) -> Result<String> {
        let result: Value = self
            .http
            .get(self.endpoint("/v1/memories/"))
            .query(&[("user_id", self.user_id.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(format_memories(&result))
    }

    /// Delete every stored memory.
    pub async fn delete_all_memories(&self) -> Result<String> {
        self.http
            .delete(self.endpoint("/v1/memories/"))
            .query(&[("user_id", self.user_id.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok("All memories deleted.".to_string())
    }
}

/// Render a Mem0 result list (bare array or `{"results": [...]}`).
pub fn format_memories(result: &Value) -> String {
    let items = result
        .as_array()
        .or_else(|| result["results"].as_array())
        .cloned()
        .unwrap_or_default();

    let memories: Vec<String> = items
        .iter()
        .filter_map(|m| m["memory"].as_str())
        .map(|m| format!("- {}", m))
        .collect();

    if memories.is_empty() {
        return "No memories found.".to_string();
    }

    format!("Memories ({}):\n{}", memories.len(), memories.join("\n"))
}

#[async_trait]
impl Toolkit for Mem0Tools {
    fn name(&self) -> &str {
        "mem0"
    }

    fn definitions(&self) -> Vec<ChatCompletionTool> {
        vec![
            function_tool(
                "add_memory",
                "Store a fact about the user or the conversation for later recall.",
                json!({
                    "type": "object",
                    "properties": {
                        "content": {"type": "string", "description": "The fact to remember"}
                    },
                    "required": ["content"]
                }),
            ),
            function_tool(
                "search_memory",
                "Search stored memories relevant to a query.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "What to look for"}
                    },
                    "required": ["query"]
                }),
            ),
            function_tool(
                "get_all_memories",
                "List all stored memories.",
                json!({"type": "object", "properties": {}}),
            ),
            function_tool(
                "delete_all_memories",
                "Delete all stored memories.",
                json!({"type": "object", "properties": {}}),
            ),
        ]
    }

    async fn call(&self, function: &str, arguments: &str) -> Result<String> {
        let args = parse_arguments(arguments)?;

        match function {
            "add_memory" => self.add_memory(required_str(&args, "content")?).await,
            "search_memory" => self.search_memory(required_str(&args, "query")?).await,
            "get_all_memories" => self.get_all_memories().await,
            "delete_all_memories" => self.delete_all_memories().await,
            other => Err(AgentError::Tool(format!("Unknown memory function: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_keys() {
        assert!(matches!(Mem0Tools::new(""), Err(AgentError::Capability(_))));
        assert!(matches!(Mem0Tools::new("bad\nkey"), Err(AgentError::Capability(_))));
        assert!(Mem0Tools::new("m0-test").is_ok());
    }

    #[test]
    fn test_builders() {
        let tools = Mem0Tools::new("m0-test")
            .unwrap()
            .with_base_url("http://localhost:8888/")
            .with_user_id("alice");
        assert_eq!(tools.user_id(), "alice");
        assert_eq!(tools.endpoint("/v1/memories/"), "http://localhost:8888/v1/memories/");
        assert_eq!(tools.function_names().len(), 4);
    }

    #[test]
    fn test_format_memories() {
        let bare = json!([{"memory": "Likes Rust talks"}, {"memory": "Prefers short summaries"}]);
        assert_eq!(
            format_memories(&bare),
            "Memories (2):\n- Likes Rust talks\n- Prefers short summaries"
        );

        let wrapped = json!({"results": [{"id": "1", "memory": "Watches cooking videos"}]});
        assert_eq!(format_memories(&wrapped), "Memories (1):\n- Watches cooking videos");

        assert_eq!(format_memories(&json!([])), "No memories found.");
    }

    #[tokio::test]
    async fn test_call_validation() {
        let tools = Mem0Tools::new("m0-test").unwrap();

        let err = tools.call("add_memory", "{}").await.unwrap_err();
        assert!(err.to_string().contains("Missing 'content'"));

        let err = tools.call("forget_user", "{}").await.unwrap_err();
        assert!(err.to_string().contains("Unknown memory function"));
    }
}
