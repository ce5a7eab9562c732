//! CLI module for the YouTube agent.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::{EnvOverrides, DEFAULT_MODEL, MEM0_API_KEY, MODEL_NAME, OPENROUTER_API_KEY};
use clap::{Parser, Subcommand};

/// YouTube Analysis Agent - Create structured summaries from YouTube videos
#[derive(Parser, Debug)]
#[command(name = "youtube-agent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the agent configuration document (JSON or TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// OpenRouter API key
    #[arg(long, env = OPENROUTER_API_KEY, hide_env_values = true, global = true)]
    pub openrouter_api_key: Option<String>,

    /// Mem0 API key for conversation memory (optional)
    #[arg(long, env = MEM0_API_KEY, hide_env_values = true, global = true)]
    pub mem0_api_key: Option<String>,

    /// Model ID for OpenRouter
    #[arg(long, env = MODEL_NAME, default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Log filter level for the chosen command and verbosity.
    ///
    /// The server logs startup progress by default; one-shot commands stay
    /// quiet unless `-v` is given.
    pub fn log_level(&self) -> &'static str {
        let base = match self.command {
            Some(Commands::Serve) | None => 1,
            _ => 0,
        };
        match base + self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Flag values layered over the process environment.
    pub fn env_overrides(&self) -> EnvOverrides {
        EnvOverrides::new()
            .set(OPENROUTER_API_KEY, self.openrouter_api_key.clone())
            .set(MEM0_API_KEY, self.mem0_api_key.clone())
            .set(MODEL_NAME, Some(self.model.clone()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the agent server (default)
    Serve,

    /// Send a single prompt to the agent and print the answer
    Ask {
        /// The prompt, e.g. "Analyze this video: https://www.youtube.com/watch?v=zjkBMFhNj_g"
        prompt: String,
    },

    /// Inspect the agent configuration document
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved configuration document
    Show,

    /// Show the locations searched for the configuration document
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, EnvSource};

    #[test]
    fn test_parse_defaults_to_serve() {
        let cli = Cli::try_parse_from(["youtube-agent", "--model", "openai/gpt-4o-mini"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.model, "openai/gpt-4o-mini");
    }

    #[test]
    fn test_flags_override_environment() {
        let cli = Cli::try_parse_from([
            "youtube-agent",
            "--openrouter-api-key",
            "sk-or-flag",
            "--mem0-api-key",
            "m0-flag",
            "ask",
            "Summarize this video",
        ])
        .unwrap();

        let overrides = cli.env_overrides();
        assert_eq!(overrides.var(OPENROUTER_API_KEY).as_deref(), Some("sk-or-flag"));

        let creds = Credentials::from_source(&overrides);
        assert_eq!(creds.mem0_api_key.as_deref(), Some("m0-flag"));
        assert!(matches!(cli.command, Some(Commands::Ask { .. })));
    }

    #[test]
    fn test_log_level_by_command() {
        let serve = Cli::try_parse_from(["youtube-agent"]).unwrap();
        assert_eq!(serve.log_level(), "info");

        let serve = Cli::try_parse_from(["youtube-agent", "-v", "serve"]).unwrap();
        assert_eq!(serve.log_level(), "debug");

        let ask = Cli::try_parse_from(["youtube-agent", "ask", "hi"]).unwrap();
        assert_eq!(ask.log_level(), "warn");

        let ask = Cli::try_parse_from(["youtube-agent", "-vvvv", "ask", "hi"]).unwrap();
        assert_eq!(ask.log_level(), "trace");
    }
}
