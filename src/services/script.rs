use crate::adapters::text_generation::TextGenerationClient;
use crate::services::submission::WORDS_PER_MINUTE;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "You write scripts for short explainer videos. \
Reply with the script text only.";

pub struct ScriptComposer {
    text_client: TextGenerationClient,
}

impl ScriptComposer {
    pub fn new(text_client: TextGenerationClient) -> Self {
        Self { text_client }
    }

    /// Turn page text into a spoken script. Any failure returns `text` unchanged.
    pub async fn compose(
        &self,
        text: &str,
        language: &str,
        duration_minutes: f64,
        description: Option<&str>,
    ) -> String {
        let prompt = build_prompt(text, language, duration_minutes, description);

        match self
            .text_client
            .complete(SYSTEM_PROMPT, &prompt, language, duration_minutes)
            .await
        {
            Ok(script) => {
                info!(
                    "Generated {}-minute {} script ({} chars)",
                    duration_minutes,
                    language,
                    script.len()
                );
                script
            }
            Err(e) => {
                warn!("Script generation failed, using raw document text: {}", e);
                text.to_string()
            }
        }
    }
}

pub fn build_prompt(
    text: &str,
    language: &str,
    duration_minutes: f64,
    description: Option<&str>,
) -> String {
    let target_words = (duration_minutes * WORDS_PER_MINUTE).round() as u64;

    let mut prompt = format!(
        "Summarize the document below as a concise video script in {language}. \
The script will be read aloud in about {duration_minutes} minutes, so keep it to roughly {target_words} words. \
Present the key points directly: no narrator introductions, no stage directions, no scene descriptions."
    );

    if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
        prompt.push_str("\n\nAdditional guidance from the requester: ");
        prompt.push_str(description);
    }

    prompt.push_str("\n\nDocument:\n");
    prompt.push_str(text);
    prompt
}
