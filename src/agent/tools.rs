//! Toolkit interface for the agent system.

use crate::error::{AgentError, Result};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use async_trait::async_trait;
use serde_json::Value;

/// A named group of functions the model can call.
#[async_trait]
pub trait Toolkit: Send + Sync {
    /// Toolkit name, used in logs.
    fn name(&self) -> &str;

    /// Function definitions advertised to the model.
    fn definitions(&self) -> Vec<ChatCompletionTool>;

    /// Execute `function` with JSON `arguments` and return text for the model.
    async fn call(&self, function: &str, arguments: &str) -> Result<String>;

    /// Names of the functions this toolkit provides.
    fn function_names(&self) -> Vec<String> {
        self.definitions()
            .into_iter()
            .map(|d| d.function.name)
            .collect()
    }
}

/// Build a function definition.
pub fn function_tool(name: &str, description: &str, parameters: Value) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: name.to_string(),
            description: Some(description.to_string()),
            parameters: Some(parameters),
            strict: None,
        },
    }
}

/// Parse tool arguments, treating an empty string as an empty object.
pub fn parse_arguments(arguments: &str) -> Result<Value> {
    if arguments.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(arguments)
        .map_err(|e| AgentError::Tool(format!("Invalid tool arguments: {}", e)))
}

/// Fetch a required string argument.
pub fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args[key]
        .as_str()
        .ok_or_else(|| AgentError::Tool(format!("Missing '{}' argument", key)))
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_seconds(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let args = parse_arguments(r#"{"url": "https://youtu.be/dQw4w9WgXcQ"}"#).unwrap();
        assert_eq!(required_str(&args, "url").unwrap(), "https://youtu.be/dQw4w9WgXcQ");
        assert!(required_str(&args, "query").is_err());

        assert!(parse_arguments("").unwrap().is_object());
        assert!(parse_arguments("{oops").is_err());
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(65.0), "01:05");
        assert_eq!(format_seconds(3665.0), "01:01:05");
        assert_eq!(format_seconds(0.0), "00:00");
    }
}
