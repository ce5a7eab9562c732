//! Ask command implementation.

use crate::agent::Message;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::EnvSource;
use crate::dispatcher::Dispatcher;
use anyhow::Result;

/// Send one prompt through the dispatcher and print the answer.
pub async fn run_ask(prompt: &str, dispatcher: &Dispatcher, env: &dyn EnvSource) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, env) {
        Output::error(&format!("{}", e));
        if preflight::is_blocking(Operation::Ask) {
            return Err(e.into());
        }
    }

    let spinner = Output::spinner("Agent working...");

    match dispatcher.handle(vec![Message::user(prompt)]).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::info(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
                }
                println!();
            }

            Output::info(&format!(
                "Run {} completed in {} iteration(s) using {}",
                response.run_id, response.iterations, response.model
            ));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate(r#"{"url": "https://youtu.be/abc"}"#, 10), r#"{"url":..."#);
    }
}
