//! Request dispatcher with one-shot lazy agent initialization.
//!
//! The first call to [`Dispatcher::handle`] builds the agent through an
//! [`AgentFactory`]. Concurrent first callers wait for that single build.
//! A failed build leaves the dispatcher uninitialized, so the next call
//! tries again; a successful one is kept for the life of the dispatcher.

use crate::agent::{AgentRunResponse, Message};
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Something that can answer a conversation.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run(&self, messages: &[Message]) -> Result<AgentRunResponse>;
}

/// Builds the agent runtime on first use.
#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn build(&self) -> Result<Arc<dyn AgentRuntime>>;
}

/// Forwards requests to a lazily built agent.
pub struct Dispatcher {
    factory: Option<Arc<dyn AgentFactory>>,
    agent: OnceCell<Arc<dyn AgentRuntime>>,
}

impl Dispatcher {
    /// Create a dispatcher that builds its agent with `factory` on first use.
    pub fn new(factory: Arc<dyn AgentFactory>) -> Self {
        Self {
            factory: Some(factory),
            agent: OnceCell::new(),
        }
    }

    /// Create a dispatcher around an already built agent.
    pub fn with_agent(agent: Arc<dyn AgentRuntime>) -> Self {
        Self {
            factory: None,
            agent: OnceCell::new_with(Some(agent)),
        }
    }

    /// Whether the agent has been built.
    pub fn is_initialized(&self) -> bool {
        self.agent.initialized()
    }

    /// Handle one request: initialize if needed, then run the agent.
    ///
    /// Initialization errors are returned to this caller and nothing is
    /// cached, so the next call retries.
    pub async fn handle(&self, messages: Vec<Message>) -> Result<AgentRunResponse> {
        self.initialize().await?;
        self.run_agent(&messages).await
    }

    /// Build the agent unless it already exists.
    pub async fn initialize(&self) -> Result<()> {
        self.agent
            .get_or_try_init(|| async {
                let Some(factory) = self.factory.as_ref() else {
                    return Err(AgentError::AgentUnavailable);
                };
                info!("Initializing YouTube analysis agent...");
                factory.build().await.inspect_err(|e| {
                    warn!("Agent initialization failed: {}", e);
                })
            })
            .await?;
        Ok(())
    }

    /// Run the agent without initializing it.
    ///
    /// Fails with [`AgentError::AgentUnavailable`] if the agent has not been
    /// built yet.
    pub async fn run_agent(&self, messages: &[Message]) -> Result<AgentRunResponse> {
        let agent = self.agent.get().ok_or(AgentError::AgentUnavailable)?;
        debug!("Dispatching {} message(s) to agent", messages.len());
        agent.run(messages).await
    }
}
