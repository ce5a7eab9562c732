//! Agent runner with tool calling loop.

use super::message::Message;
use super::model::ChatModel;
use super::response::{AgentRunResponse, RunStatus, ToolCallRecord};
use super::tools::Toolkit;
use crate::config::AgentPrompts;
use crate::dispatcher::AgentRuntime;
use crate::error::{AgentError, Result};
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionTool, CreateChatCompletionRequestArgs,
    FinishReason,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Agent that answers with a chat model and calls toolkit functions.
pub struct Agent {
    name: String,
    model: Arc<dyn ChatModel>,
    toolkits: Vec<Box<dyn Toolkit>>,
    prompts: AgentPrompts,
    add_datetime_to_context: bool,
    markdown: bool,
    max_iterations: usize,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model.id())
            .field("toolkits", &self.toolkit_names())
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

impl Agent {
    /// Create a new agent with the given model, toolkits and prompts.
    pub fn new(model: Arc<dyn ChatModel>, toolkits: Vec<Box<dyn Toolkit>>, prompts: AgentPrompts) -> Self {
        Self {
            name: prompts.name.clone(),
            model,
            toolkits,
            prompts,
            add_datetime_to_context: false,
            markdown: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Include the current time in the system message.
    pub fn with_datetime_context(mut self, enabled: bool) -> Self {
        self.add_datetime_to_context = enabled;
        self
    }

    /// Ask the model for Markdown output.
    pub fn with_markdown(mut self, enabled: bool) -> Self {
        self.markdown = enabled;
        self
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_id(&self) -> &str {
        self.model.id()
    }

    /// Names of the attached toolkits, in order.
    pub fn toolkit_names(&self) -> Vec<&str> {
        self.toolkits.iter().map(|t| t.name()).collect()
    }

    /// Run the agent over a conversation.
    pub async fn run(&self, conversation: &[Message]) -> Result<AgentRunResponse> {
        if conversation.is_empty() {
            return Err(AgentError::InvalidInput("No messages to run".to_string()));
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        debug!("Starting run {} with {} message(s)", run_id, conversation.len());

        let now = self.add_datetime_to_context.then(chrono::Utc::now);
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.system_message(now, self.markdown))
                .build()
                .map_err(|e| AgentError::Agent(e.to_string()))?
                .into(),
        ];
        for message in conversation {
            messages.push(message.to_request_message()?);
        }

        let (definitions, routes) = self.function_table();
        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(AgentError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let mut args = CreateChatCompletionRequestArgs::default();
            args.model(self.model.id()).messages(messages.clone());
            if !definitions.is_empty() {
                args.tools(definitions.clone());
            }
            let request = args.build().map_err(|e| AgentError::Agent(e.to_string()))?;

            let response = self.model.complete(request).await?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| AgentError::Agent("No response from model".to_string()))?;

            let tool_calls = match &choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    let status = match choice.finish_reason {
                        Some(FinishReason::Length) => RunStatus::Incomplete,
                        _ => RunStatus::Completed,
                    };
                    return Ok(AgentRunResponse {
                        run_id,
                        agent_name: self.name.clone(),
                        model: self.model.id().to_string(),
                        content: choice.message.content.clone().unwrap_or_default(),
                        status,
                        tool_calls: tool_calls_made,
                        iterations,
                        created_at: chrono::Utc::now(),
                    });
                }
            };

            // Add assistant message with tool calls to history
            let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(tool_calls.clone())
                .build()
                .map_err(|e| AgentError::Agent(e.to_string()))?;
            messages.push(assistant_msg.into());

            for tool_call in tool_calls {
                let record = self.execute_tool_call(tool_call, &routes).await;

                let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(&tool_call.id)
                    .content(record.result.clone())
                    .build()
                    .map_err(|e| AgentError::Agent(e.to_string()))?;
                messages.push(tool_msg.into());

                tool_calls_made.push(record);
            }
        }
    }

    /// All function definitions plus a map from function name to toolkit index.
    fn function_table(&self) -> (Vec<ChatCompletionTool>, HashMap<String, usize>) {
        let mut definitions = Vec::new();
        let mut routes = HashMap::new();

        for (index, toolkit) in self.toolkits.iter().enumerate() {
            for definition in toolkit.definitions() {
                routes.insert(definition.function.name.clone(), index);
                definitions.push(definition);
            }
        }

        (definitions, routes)
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Failures are reported back to the model as the tool result.
    async fn execute_tool_call(
        &self,
        tool_call: &ChatCompletionMessageToolCall,
        routes: &HashMap<String, usize>,
    ) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match routes.get(name).and_then(|&i| self.toolkits.get(i)) {
            Some(toolkit) => match toolkit.call(name, arguments).await {
                Ok(output) => output,
                Err(e) => format!("Tool error: {}", e),
            },
            None => format!("Unknown function: {}", name),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

#[async_trait]
impl AgentRuntime for Agent {
    async fn run(&self, messages: &[Message]) -> Result<AgentRunResponse> {
        Agent::run(self, messages).await
    }
}
