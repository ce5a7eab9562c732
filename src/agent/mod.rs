//! Agent runtime with tool calling.
//!
//! Provides an LLM agent that answers a conversation using a chat model and
//! the functions exposed by its toolkits, such as YouTube caption retrieval
//! and conversation memory.

mod message;
mod model;
mod response;
mod runner;
mod tools;

pub use message::Message;
pub use model::{ChatModel, OpenRouterModel};
pub use response::{AgentRunResponse, RunStatus, ToolCallRecord};
pub use runner::Agent;
pub use tools::{format_seconds, function_tool, parse_arguments, required_str, Toolkit};
