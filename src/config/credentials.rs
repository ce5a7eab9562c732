//! Credential and model resolution from the environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable holding the OpenRouter API key.
pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
/// Environment variable holding the Mem0 API key.
pub const MEM0_API_KEY: &str = "MEM0_API_KEY";
/// Environment variable selecting the model.
pub const MODEL_NAME: &str = "MODEL_NAME";
/// Model used when `MODEL_NAME` is unset.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// Load a `.env` file into the process environment.
///
/// With no `path`, the file is searched for in the working directory and its
/// parents. Variables that are already set keep their values. Returns the
/// file that was loaded, if any.
pub fn load_dotenv(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

/// Source of environment-style key/value settings.
pub trait EnvSource: Send + Sync {
    /// Look up a variable. Empty values are treated as unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Explicit values layered over the process environment.
///
/// Used for CLI flags so they take precedence without mutating the
/// process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    values: HashMap<String, String>,
}

impl EnvOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `key` when `value` is present.
    pub fn set(mut self, key: &str, value: Option<String>) -> Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.values.insert(key.to_string(), v);
        }
        self
    }
}

impl EnvSource for EnvOverrides {
    fn var(&self, key: &str) -> Option<String> {
        self.values.var(key).or_else(|| ProcessEnv.var(key))
    }
}

/// Credentials and model selection read at initialization time.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openrouter_api_key: Option<String>,
    pub mem0_api_key: Option<String>,
    pub model_name: String,
}

impl Credentials {
    /// Resolve credentials from an environment source.
    pub fn from_source(env: &dyn EnvSource) -> Self {
        Self {
            openrouter_api_key: env.var(OPENROUTER_API_KEY),
            mem0_api_key: env.var(MEM0_API_KEY),
            model_name: env.var(MODEL_NAME).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn has_memory(&self) -> bool {
        self.mem0_api_key.is_some()
    }
}

// Keys must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openrouter_api_key", &self.openrouter_api_key.as_ref().map(|_| "***"))
            .field("mem0_api_key", &self.mem0_api_key.as_ref().map(|_| "***"))
            .field("model_name", &self.model_name)
            .finish()
    }
}
