//! Conversation messages exchanged with the agent.

use crate::error::{AgentError, Result};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};
use serde::{Deserialize, Serialize};

/// A single role/content pair supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// Convert to a chat-completions request message.
    ///
    /// Unknown roles are sent as user messages.
    pub fn to_request_message(&self) -> Result<ChatCompletionRequestMessage> {
        let content = self.content.clone();
        let message = match self.role.to_lowercase().as_str() {
            "system" | "developer" => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| AgentError::Agent(e.to_string()))?
                .into(),
            "assistant" | "agent" => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| AgentError::Agent(e.to_string()))?
                .into(),
            _ => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| AgentError::Agent(e.to_string()))?
                .into(),
        };
        Ok(message)
    }
}
