//! Results of agent runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Completed,
    /// The model stopped at its output token limit.
    Incomplete,
}

/// Response from an agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRunResponse {
    /// Unique id of this run.
    pub run_id: String,
    pub agent_name: String,
    /// Model that produced the answer.
    pub model: String,
    /// The final response content from the agent.
    pub content: String,
    pub status: RunStatus,
    /// Record of all tool calls made during execution.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model calls used.
    pub iterations: usize,
    pub created_at: DateTime<Utc>,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Name of the function called.
    pub name: String,
    /// JSON arguments passed to the function.
    pub arguments: String,
    /// Result returned by the function.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "get_youtube_video_captions".to_string(),
            arguments: r#"{"url": "dQw4w9WgXcQ"}"#.to_string(),
            result: "captions".to_string(),
        };
        assert_eq!(
            format!("{}", record),
            r#"get_youtube_video_captions({"url": "dQw4w9WgXcQ"})"#
        );
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&RunStatus::Completed).unwrap(), "\"COMPLETED\"");
    }
}
