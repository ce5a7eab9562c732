//! Configuration module for the YouTube agent.
//!
//! Handles the agent configuration document, credential resolution and the
//! agent's prompt text.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{
    load_dotenv, Credentials, EnvOverrides, EnvSource, ProcessEnv, DEFAULT_MODEL, MEM0_API_KEY,
    MODEL_NAME, OPENROUTER_API_KEY,
};
pub use prompts::{without_current_time, AgentPrompts};
pub use settings::{AgentConfig, DeploymentConfig, EnvironmentVariable, CONFIG_FILE_NAME};
