//! Toolkits attached to the agent.
//!
//! The YouTube toolkit is always present; the Mem0 memory toolkit is added
//! when a Mem0 API key is configured.

mod captions;
mod memory;
mod youtube;

pub use captions::{captions_text, parse_timestamp, parse_vtt, select_caption_url, timestamp_lines, CaptionCue};
pub use memory::{format_memories, Mem0Tools, DEFAULT_USER_ID, MEM0_API_BASE};
pub use youtube::YoutubeTools;
