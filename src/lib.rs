//! YouTube Agent - YouTube video analysis behind a single request handler
//!
//! An LLM agent that reads YouTube captions and metadata (and, optionally,
//! remembers conversation context through Mem0) to produce structured video
//! summaries with accurate timestamps.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Agent configuration document, credentials and prompts
//! - `agent` - Agent runtime: chat model, toolkits and the tool-calling loop
//! - `tools` - YouTube and Mem0 toolkits
//! - `initializer` - Builds the agent from environment-derived configuration
//! - `dispatcher` - Lazily initializes the agent once and forwards requests
//! - `cli` - Command line interface and the HTTP runner
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use youtube_agent::agent::Message;
//! use youtube_agent::dispatcher::Dispatcher;
//! use youtube_agent::initializer::Initializer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dispatcher = Dispatcher::new(Arc::new(Initializer::default()));
//!
//!     let response = dispatcher
//!         .handle(vec![Message::user(
//!             "Analyze this video: https://www.youtube.com/watch?v=zjkBMFhNj_g",
//!         )])
//!         .await?;
//!     println!("{}", response.content);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod initializer;
pub mod openai;
pub mod tools;

pub use error::{AgentError, Result};
