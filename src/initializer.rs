//! Agent initialization from environment-derived configuration.

use crate::agent::{Agent, OpenRouterModel, Toolkit};
use crate::config::{AgentPrompts, Credentials, EnvSource, ProcessEnv};
use crate::dispatcher::{AgentFactory, AgentRuntime};
use crate::error::{AgentError, Result};
use crate::openai::missing_key_message;
use crate::tools::{Mem0Tools, YoutubeTools};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Constructs the toolkits attached to the agent.
pub trait ToolFactory: Send + Sync {
    /// The YouTube toolkit. Failure aborts initialization.
    fn youtube(&self) -> Result<Box<dyn Toolkit>>;

    /// The memory toolkit. Failure only omits it.
    fn memory(&self, api_key: &str) -> Result<Box<dyn Toolkit>>;
}

/// Builds the real YouTube and Mem0 toolkits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultToolFactory;

impl ToolFactory for DefaultToolFactory {
    fn youtube(&self) -> Result<Box<dyn Toolkit>> {
        Ok(Box::new(YoutubeTools::new()?))
    }

    fn memory(&self, api_key: &str) -> Result<Box<dyn Toolkit>> {
        Ok(Box::new(Mem0Tools::new(api_key)?))
    }
}

/// Assembles the YouTube analysis agent.
pub struct Initializer {
    env: Arc<dyn EnvSource>,
    tools: Arc<dyn ToolFactory>,
    prompts: AgentPrompts,
}

impl Default for Initializer {
    fn default() -> Self {
        Self::new(Arc::new(ProcessEnv))
    }
}

impl Initializer {
    /// Create an initializer reading credentials from `env`.
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self {
            env,
            tools: Arc::new(DefaultToolFactory),
            prompts: AgentPrompts::default(),
        }
    }

    /// Use a different toolkit factory.
    pub fn with_tool_factory(mut self, tools: Arc<dyn ToolFactory>) -> Self {
        self.tools = tools;
        self
    }

    /// Build the agent.
    ///
    /// The OpenRouter key is checked before any toolkit is constructed.
    pub fn initialize(&self) -> Result<Agent> {
        let credentials = Credentials::from_source(self.env.as_ref());

        let api_key = credentials
            .openrouter_api_key
            .as_deref()
            .ok_or_else(|| AgentError::MissingCredential(missing_key_message()))?;

        let model = OpenRouterModel::new(api_key, &credentials.model_name)?.with_response_cache();
        let toolkits = self.setup_tools(&credentials)?;

        let agent = Agent::new(Arc::new(model), toolkits, self.prompts.clone())
            .with_datetime_context(true)
            .with_markdown(true);

        info!("YouTube analysis agent initialized using {}", credentials.model_name);
        info!("Toolkits enabled: {}", agent.toolkit_names().join(", "));

        Ok(agent)
    }

    fn setup_tools(&self, credentials: &Credentials) -> Result<Vec<Box<dyn Toolkit>>> {
        let mut toolkits = Vec::new();

        let youtube = self.tools.youtube().map_err(|e| {
            warn!("Failed to initialize YouTube tools: {}", e);
            match e {
                AgentError::Capability(_) => e,
                other => AgentError::Capability(other.to_string()),
            }
        })?;
        info!("YouTube analysis enabled for video transcripts and metadata");
        toolkits.push(youtube);

        // Memory is optional
        if let Some(key) = &credentials.mem0_api_key {
            match self.tools.memory(key) {
                Ok(memory) => {
                    info!("Mem0 memory system enabled for conversation context");
                    toolkits.push(memory);
                }
                Err(e) => warn!("Mem0 initialization issue, continuing without memory: {}", e),
            }
        }

        Ok(toolkits)
    }
}

#[async_trait]
impl AgentFactory for Initializer {
    async fn build(&self) -> Result<Arc<dyn AgentRuntime>> {
        Ok(Arc::new(self.initialize()?))
    }
}
