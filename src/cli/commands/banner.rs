//! Startup banner.

use crate::cli::Output;
use crate::config::Credentials;
use console::style;

const EXAMPLE_QUERIES: &[&str] = &[
    "Analyze this video: https://www.youtube.com/watch?v=zjkBMFhNj_g",
    "Create a study guide from this lecture video",
    "Extract key points from this tutorial with timestamps",
    "Summarize this documentary with chapter breakdowns",
    "Analyze this product review and list all features mentioned",
];

/// Lines describing the active configuration.
pub fn configuration_lines(credentials: &Credentials) -> Vec<String> {
    let mut lines = Vec::new();
    if credentials.openrouter_api_key.is_some() {
        lines.push(format!("Model: {}", credentials.model_name));
    }
    lines.push("YouTube: Video analysis and transcripts".to_string());
    if credentials.has_memory() {
        lines.push("Memory: Conversation context".to_string());
    }
    lines
}

/// Print what the agent does, how it is configured and what to ask it.
pub fn print_banner(credentials: &Credentials) {
    Output::rule();
    println!("{}", style("YOUTUBE VIDEO ANALYSIS AGENT").bold());
    Output::rule();
    Output::kv("Purpose", "Analyze YouTube videos and create structured summaries");
    Output::kv("Powered by", "YouTube transcript extraction + AI analysis");
    for line in configuration_lines(credentials) {
        Output::list_item(&line);
    }
    Output::rule();
    println!("Example queries:");
    for query in EXAMPLE_QUERIES {
        Output::list_item(&format!("'{}'", query));
    }
    Output::rule();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_lines() {
        let credentials = Credentials {
            openrouter_api_key: Some("sk-or-test".to_string()),
            mem0_api_key: None,
            model_name: "openai/gpt-4o".to_string(),
        };
        assert_eq!(
            configuration_lines(&credentials),
            vec!["Model: openai/gpt-4o", "YouTube: Video analysis and transcripts"]
        );

        let bare = Credentials {
            mem0_api_key: Some("m0".to_string()),
            ..Credentials::default()
        };
        let lines = configuration_lines(&bare);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Memory: Conversation context");
    }
}
