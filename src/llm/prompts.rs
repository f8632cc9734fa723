/// Instructions for the session summarizer. The transcript language is
/// detected first so the summary comes back in the language the table
/// actually spoke.
pub const SUMMARY_INSTRUCTIONS: &str = r#"You are an expert TTRPG Game Master and a helpful summarizer assistant.

First, detect the primary language used in the session transcript below.

Then, generate a detailed session summary in the same language you detected. Structure the summary exactly with the sections below and keep the content concise and useful for both players and the game master.

Required structure (produce these headings in the detected language):
1. GENERAL SESSION SUMMARY (1-2 paragraphs)
2. MAIN EVENTS (bullet points)
3. IMPORTANT PLAYER DECISIONS
4. DISCOVERIES AND REVELATIONS
5. HOOKS FOR THE NEXT SESSION

Lines prefixed with "|" in the transcript mark speech that overlapped in time."#;

/// Build the full summarization prompt around a rendered transcript
pub fn build_summary_prompt(transcript: &str, additional_context: &str) -> String {
    let mut prompt = String::with_capacity(
        SUMMARY_INSTRUCTIONS.len() + transcript.len() + additional_context.len() + 200,
    );

    prompt.push_str(SUMMARY_INSTRUCTIONS);
    prompt.push_str("\n\nHere is the session transcript to analyze:\n\n");
    prompt.push_str(transcript);

    if !additional_context.trim().is_empty() {
        prompt.push_str("\n\nAdditional context:\n");
        prompt.push_str(additional_context);
    }

    prompt.push_str("\n\nWrite the complete structured summary below, in the detected language.\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_transcript_and_sections() {
        let prompt = build_summary_prompt("[00:00.000] alice: hi\n", "");

        assert!(prompt.contains("[00:00.000] alice: hi"));
        assert!(prompt.contains("GENERAL SESSION SUMMARY"));
        assert!(prompt.contains("HOOKS FOR THE NEXT SESSION"));
        assert!(!prompt.contains("Additional context"));
    }

    #[test]
    fn test_prompt_includes_context_when_given() {
        let prompt = build_summary_prompt("transcript", "Campaign: Curse of Strahd");

        assert!(prompt.contains("Additional context"));
        assert!(prompt.contains("Curse of Strahd"));
    }
}
