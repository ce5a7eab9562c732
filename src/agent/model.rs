//! Chat model abstraction.

use crate::config::without_current_time;
use crate::error::{AgentError, Result};
use crate::openai::{create_client_for, OPENROUTER_API_BASE};
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateChatCompletionRequest, CreateChatCompletionResponse};
use async_openai::Client;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use tracing::debug;

/// Maximum number of cached completions kept per model.
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A chat-completions backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier sent with each request.
    fn id(&self) -> &str;

    /// Run one chat completion.
    async fn complete(&self, request: CreateChatCompletionRequest) -> Result<CreateChatCompletionResponse>;
}

/// Completions keyed by request, oldest evicted first.
struct ResponseCache {
    capacity: usize,
    entries: HashMap<String, CreateChatCompletionResponse>,
    order: VecDeque<String>,
}

impl ResponseCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&CreateChatCompletionResponse> {
        self.entries.get(key)
    }

    fn insert(&mut self, key: String, response: CreateChatCompletionResponse) {
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = response;
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, response);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cache key for a request.
///
/// The current-time line of system messages changes every second, so it is
/// left out of the key.
fn cache_key(request: &CreateChatCompletionRequest) -> Result<String> {
    let mut value = serde_json::to_value(request)?;

    if let Some(messages) = value.get_mut("messages").and_then(Value::as_array_mut) {
        for message in messages {
            if message.get("role").and_then(Value::as_str) != Some("system") {
                continue;
            }
            if let Some(Value::String(content)) = message.get_mut("content") {
                let stable = without_current_time(content).to_string();
                *content = stable;
            }
        }
    }

    Ok(value.to_string())
}

/// OpenRouter-hosted model.
pub struct OpenRouterModel {
    client: Client<OpenAIConfig>,
    id: String,
    cache: Option<Mutex<ResponseCache>>,
}

impl OpenRouterModel {
    /// Create a model client for `id` authenticated with `api_key`.
    pub fn new(api_key: &str, id: &str) -> Result<Self> {
        Self::at_endpoint(OPENROUTER_API_BASE, api_key, id)
    }

    fn at_endpoint(api_base: &str, api_key: &str, id: &str) -> Result<Self> {
        Ok(Self {
            client: create_client_for(api_base, api_key)?,
            id: id.to_string(),
            cache: None,
        })
    }

    /// Reuse responses for identical requests.
    pub fn with_response_cache(mut self) -> Self {
        self.cache = Some(Mutex::new(ResponseCache::new(DEFAULT_CACHE_CAPACITY)));
        self
    }

    pub fn caches_responses(&self) -> bool {
        self.cache.is_some()
    }
}

#[async_trait]
impl ChatModel for OpenRouterModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn complete(&self, request: CreateChatCompletionRequest) -> Result<CreateChatCompletionResponse> {
        let key = match &self.cache {
            Some(_) => Some(cache_key(&request)?),
            None => None,
        };

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.lock().await.get(key) {
                debug!("Model response cache hit");
                return Ok(hit.clone());
            }
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::OpenAI(e.to_string()))?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            let mut cache = cache.lock().await;
            cache.insert(key, response.clone());
            debug!("Cached model response ({} entries)", cache.len());
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, Message};
    use crate::config::AgentPrompts;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-cache",
            "object": "chat.completion",
            "created": 0,
            "model": "openai/gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    /// Local chat-completions endpoint that counts requests.
    async fn completions_endpoint(hits: Arc<AtomicUsize>) -> String {
        let app = axum::Router::new().route(
            "/chat/completions",
            axum::routing::post(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    axum::Json(completion("## Video Summary"))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_cache_is_opt_in() {
        let model = OpenRouterModel::new("sk-or-test", "openai/gpt-4o").unwrap();
        assert!(!model.caches_responses());
        assert_eq!(model.id(), "openai/gpt-4o");

        let model = model.with_response_cache();
        assert!(model.caches_responses());
    }

    #[test]
    fn test_cache_evicts_oldest() {
        let response: CreateChatCompletionResponse = serde_json::from_value(completion("ok")).unwrap();
        let mut cache = ResponseCache::new(2);

        cache.insert("a".to_string(), response.clone());
        cache.insert("b".to_string(), response.clone());
        cache.insert("a".to_string(), response.clone());
        assert_eq!(cache.len(), 2);

        cache.insert("c".to_string(), response);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[tokio::test]
    async fn test_identical_runs_share_one_cache_entry() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = completions_endpoint(hits.clone()).await;

        let model = Arc::new(
            OpenRouterModel::at_endpoint(&base, "sk-or-test", "openai/gpt-4o")
                .unwrap()
                .with_response_cache(),
        );
        let agent = Agent::new(model.clone(), Vec::new(), AgentPrompts::default()).with_datetime_context(true);
        let conversation = [Message::user("Summarize https://youtu.be/zjkBMFhNj_g")];

        let first = agent.run(&conversation).await.unwrap();
        // Cross a second boundary so the system message timestamp differs
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let second = agent.run(&conversation).await.unwrap();

        assert_eq!(first.content, "## Video Summary");
        assert_eq!(second.content, first.content);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let cache = model.cache.as_ref().unwrap();
        assert_eq!(cache.lock().await.len(), 1);
    }
}
