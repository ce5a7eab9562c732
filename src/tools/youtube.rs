//! YouTube toolkit: video metadata, captions and caption timestamps.

use super::captions::{captions_text, parse_vtt, select_caption_url, timestamp_lines, CaptionCue};
use crate::agent::{function_tool, parse_arguments, required_str, Toolkit};
use crate::error::{AgentError, Result};
use async_openai::types::ChatCompletionTool;
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const OEMBED_URL: &str = "https://www.youtube.com/oembed";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Tools for reading YouTube videos.
pub struct YoutubeTools {
    http: reqwest::Client,
    video_id_regex: Regex,
    languages: Vec<String>,
}

impl YoutubeTools {
    pub fn new() -> Result<Self> {
        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .map_err(|e| AgentError::Capability(format!("YouTube tools: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AgentError::Capability(format!("YouTube tools: {}", e)))?;

        Ok(Self {
            http,
            video_id_regex,
            languages: vec!["en".to_string()],
        })
    }

    /// Extract video ID from a YouTube URL or bare ID.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        // Try group 1 (URL format) then group 2 (bare ID)
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    fn video_id_or_err(&self, url: &str) -> Result<String> {
        self.extract_video_id(url)
            .ok_or_else(|| AgentError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", url)))
    }

    fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }

    /// Fetch video metadata via oEmbed.
    pub async fn get_video_data(&self, url: &str) -> Result<String> {
        let video_id = self.video_id_or_err(url)?;

        let data: serde_json::Value = self
            .http
            .get(OEMBED_URL)
            .query(&[("format", "json"), ("url", Self::watch_url(&video_id).as_str())])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| AgentError::Tool(format!("Video {} not found or unavailable: {}", video_id, e)))?
            .json()
            .await?;

        let summary = json!({
            "video_id": video_id,
            "title": data["title"],
            "author_name": data["author_name"],
            "author_url": data["author_url"],
            "thumbnail_url": data["thumbnail_url"],
            "provider_name": data["provider_name"],
        });

        Ok(serde_json::to_string_pretty(&summary)?)
    }

    /// Fetch the captions of a video as plain text.
    pub async fn get_video_captions(&self, url: &str) -> Result<String> {
        let cues = self.fetch_cues(url).await?;
        if cues.is_empty() {
            return Ok("No captions found for video".to_string());
        }
        Ok(captions_text(&cues))
    }

    /// Fetch the captions of a video as timestamped lines.
    pub async fn get_video_timestamps(&self, url: &str) -> Result<String> {
        let cues = self.fetch_cues(url).await?;
        if cues.is_empty() {
            return Ok("No captions found for video".to_string());
        }
        Ok(timestamp_lines(&cues).join("\n"))
    }

    async fn fetch_cues(&self, url: &str) -> Result<Vec<CaptionCue>> {
        let video_id = self.video_id_or_err(url)?;
        let info = self.fetch_info_ytdlp(&video_id).await?;

        let Some(caption_url) = select_caption_url(&info, &self.languages) else {
            debug!("No caption tracks for {}", video_id);
            return Ok(Vec::new());
        };

        let vtt = self
            .http
            .get(&caption_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_vtt(&vtt))
    }

    /// Fetch video info (including caption tracks) using yt-dlp.
    async fn fetch_info_ytdlp(&self, video_id: &str) -> Result<serde_json::Value> {
        let url = Self::watch_url(video_id);

        let output = tokio::process::Command::new("yt-dlp")
            .args(["--dump-json", "--skip-download", "--no-warnings", &url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AgentError::ToolNotFound("yt-dlp".to_string())
                } else {
                    AgentError::Tool(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentError::Tool(format!(
                "Video {} not found or unavailable: {}",
                video_id, stderr
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&json_str)
            .map_err(|e| AgentError::Tool(format!("Failed to parse yt-dlp output: {}", e)))
    }
}

#[async_trait]
impl Toolkit for YoutubeTools {
    fn name(&self) -> &str {
        "youtube"
    }

    fn definitions(&self) -> Vec<ChatCompletionTool> {
        let url_param = json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "YouTube video URL or 11-character video ID"
                }
            },
            "required": ["url"]
        });

        vec![
            function_tool(
                "get_youtube_video_data",
                "Get metadata for a YouTube video: title, channel and thumbnail.",
                url_param.clone(),
            ),
            function_tool(
                "get_youtube_video_captions",
                "Get the full caption text of a YouTube video. \
                 Use this for summaries and content analysis.",
                url_param.clone(),
            ),
            function_tool(
                "get_video_timestamps",
                "Get the captions of a YouTube video with their start timestamps. \
                 Use this to build accurate chapter and segment timestamps.",
                url_param,
            ),
        ]
    }

    async fn call(&self, function: &str, arguments: &str) -> Result<String> {
        let args = parse_arguments(arguments)?;
        let url = required_str(&args, "url")?;

        match function {
            "get_youtube_video_data" => self.get_video_data(url).await,
            "get_youtube_video_captions" => self.get_video_captions(url).await,
            "get_video_timestamps" => self.get_video_timestamps(url).await,
            other => Err(AgentError::Tool(format!("Unknown YouTube function: {}", other))),
        }
    }
}
