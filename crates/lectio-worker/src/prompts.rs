//! Fixed task prompts.
//!
//! The model is instructed, not verified: ordering and range rules in
//! the topics prompt are enforced again by the post-processor, and the
//! summary HTML conventions are taken on trust.

/// Prompt for chronological topic indexing of lecture audio.
///
/// When the true media duration is known (> 0) it is included as a
/// hard upper bound for timestamps.
pub fn topics_prompt(duration_seconds: u64) -> String {
    let time_context = if duration_seconds > 0 {
        format!("The audio duration is exactly {duration_seconds} seconds.\n\n")
    } else {
        String::new()
    };

    format!(
        r#"You are an expert educational content indexer for a learning platform.
Your task is to carefully listen to the provided audio and segment it into meaningful, navigable learning sections.

Accuracy is critical. Students will rely on your output to jump directly to relevant parts of the material.

{time_context}GENERAL RULES:
- Process the audio sequentially from start to end.
- Topics must be ordered chronologically by when they begin.
- Each topic must represent a distinct shift in subject, concept, or sub-topic.
- Do not merge unrelated ideas into one topic.
- Do not create vague or generic topics.
- You may create multiple topics within the same overall subject if the focus changes.

TIMESTAMP RULES:
- "timestamp_seconds" must represent the exact moment the topic clearly begins in the audio.
- Timestamps must be whole integers in seconds.
- Do not guess or estimate beyond what is heard.
- Do not generate timestamps greater than the actual audio duration.
- Do not generate overlapping or decreasing timestamps.
- Ignore brief silence, filler speech, or introductory remarks unless they contain instructional content.

KEYWORDS RULES:
- Extract keywords that are explicitly mentioned or clearly implied in the audio.
- Keywords should include technologies, methods, concepts, tools, or frameworks.
- Keywords must be concise and relevant.
- Do not invent terms that are not present in the audio.

OUTPUT FORMAT RULES:
- Make sure to cover the audio from start to end, including topics from the later part of the recording.
- Output only raw JSON.
- Do not use markdown formatting.
- Do not include explanations, comments, or extra text.
- The output must be a valid JSON array.

OUTPUT EXAMPLE SCHEMA:
[
  {{
    "topic": "Clear, descriptive title of the topic",
    "timestamp_seconds": 0,
    "keywords": ["keyword1", "keyword2", "keyword3"]
  }}
]
"#
    )
}

/// Prompt for the HTML study summary of a slide deck.
pub fn summary_prompt() -> &'static str {
    r#"You are an expert academic tutor.
Your task is to analyze the attached lecture slides PDF and create a comprehensive study summary for students.

OUTPUT FORMATTING RULES:
1. Return the result in clean, semantic HTML format (no markdown blocks).
2. Use <h3> for main section headers.
3. Use <p> for paragraphs.
4. Use <ul> and <li> for bullet points.
5. Use <strong> for key terminology.

CONTENT RULES:
1. Start with a 'Lecture Overview' paragraph summarizing the main theme.
2. Break down the content into 'Key Concepts' or 'Lecture Sections'.
3. Capture the most important definitions and formulas if present.
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_prompt_includes_duration_bound() {
        let prompt = topics_prompt(323);
        assert!(prompt.contains("exactly 323 seconds"));
    }

    #[test]
    fn test_topics_prompt_omits_unknown_duration() {
        let prompt = topics_prompt(0);
        assert!(!prompt.contains("exactly"));
        assert!(prompt.contains("timestamp_seconds"));
    }
}
