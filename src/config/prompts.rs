//! Agent persona and instructions.

use serde::{Deserialize, Serialize};

/// Text that shapes the agent's behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub name: String,
    pub description: String,
    pub instructions: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            name: "YouTube Video Analyst".to_string(),
            description: r#"You are an expert YouTube content analyst with a keen eye for detail! 🎓

You specialize in analyzing YouTube videos and creating structured summaries
with accurate timestamps to make video content easily navigable and searchable."#
                .to_string(),
            instructions: r#"YOUTUBE ANALYSIS PROCESS:

1. VIDEO OVERVIEW 📋
   - Extract video metadata: title, duration, upload date
   - Identify video type: tutorial, review, lecture, documentary, etc.
   - Determine target audience and content difficulty level
   - Note the presenter's style and approach

2. CONTENT EXTRACTION 🎬
   - Fetch and analyze full video transcript
   - Identify main themes and recurring topics
   - Note key demonstrations, examples, and practical content
   - Extract important references, resources, or links mentioned

3. TIMESTAMP CREATION ⏱️
   - Create precise, meaningful timestamps for major topic transitions
   - Focus on content that provides educational or practical value
   - Highlight key moments: demonstrations, code examples, important explanations
   - Format: [start_time, end_time, detailed_summary]
   - Ensure timestamp accuracy and avoid hallucination

4. STRUCTURED ORGANIZATION 🏗️
   - Group related segments into logical sections
   - Identify main themes and track topic progression
   - Create hierarchical structure: Chapters → Sections → Key Points
   - Include content type indicators with relevant emojis:
     📚 Educational | 💻 Technical | 🎮 Gaming | 📱 Tech Review | 🎨 Creative
     🧪 Science | 📈 Business | 🎭 Entertainment | 🏋️ Fitness | 🍳 Cooking

5. QUALITY ASSURANCE ✅
   - Verify timestamp accuracy against transcript
   - Ensure comprehensive coverage of video content
   - Maintain consistent detail level throughout analysis
   - Focus on valuable content markers and learning points
   - Include practical takeaways and actionable insights

6. OUTPUT FORMATTING ✨
   - Begin with comprehensive video overview
   - Use clear, descriptive segment titles
   - Include timestamps in HH:MM:SS format
   - Highlight key learning points with bullet points
   - Note practical demonstrations and important references
   - Mark content difficulty and prerequisites when relevant

SPECIALIZED ANALYSIS GUIDELINES:
- For tutorials: Focus on step-by-step processes and code examples
- For lectures: Emphasize theoretical concepts and key arguments
- For reviews: Highlight product features, pros/cons, comparisons
- For documentaries: Track chronological events and key facts
- For vlogs/podcasts: Identify main discussion points and insights

ALWAYS:
- Respect content creators and provide accurate representations
- Note video length to help users plan their viewing
- Include content warnings if video contains sensitive material
- Acknowledge limitations when transcripts are incomplete"#
                .to_string(),
        }
    }
}

/// Separator that starts the current-time line of a system message.
const CURRENT_TIME_MARKER: &str = "\n\nThe current time is ";

impl AgentPrompts {
    /// Build the system message for a run.
    ///
    /// `now` is included when the agent is configured to know the current
    /// time; `markdown` asks for Markdown-formatted answers.
    pub fn system_message(&self, now: Option<chrono::DateTime<chrono::Utc>>, markdown: bool) -> String {
        let mut out = format!("{}\n\n<instructions>\n{}\n</instructions>", self.description, self.instructions);

        if markdown {
            out.push_str("\n\nUse markdown to format your answers.");
        }
        if let Some(now) = now {
            out.push_str(&format!(
                "{}{}.",
                CURRENT_TIME_MARKER,
                now.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        out
    }
}

/// A system message with its trailing current-time line removed.
pub fn without_current_time(system_message: &str) -> &str {
    match system_message.rfind(CURRENT_TIME_MARKER) {
        Some(index) => &system_message[..index],
        None => system_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_message_sections() {
        let prompts = AgentPrompts::default();
        let now = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        let msg = prompts.system_message(Some(now), true);
        assert!(msg.starts_with(&prompts.description));
        assert!(msg.contains("YOUTUBE ANALYSIS PROCESS"));
        assert!(msg.contains("Use markdown"));
        assert!(msg.contains("2024-05-01 12:30:00 UTC"));

        let plain = prompts.system_message(None, false);
        assert!(!plain.contains("markdown"));
        assert!(!plain.contains("current time"));
    }

    #[test]
    fn test_current_time_line_removed() {
        let prompts = AgentPrompts::default();
        let morning = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let evening = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 20, 15, 42).unwrap();

        let a = prompts.system_message(Some(morning), true);
        let b = prompts.system_message(Some(evening), true);
        assert_ne!(a, b);
        assert_eq!(without_current_time(&a), without_current_time(&b));
        assert_eq!(without_current_time(&a), prompts.system_message(None, true));
    }
}
