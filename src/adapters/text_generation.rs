use crate::error::{VideoError, VideoResult};
use crate::services::extract::extract_generated_text;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

const SERVICE: &str = "Text generation";

#[derive(Clone)]
pub struct TextGenerationClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    language: &'a str,
    duration_minutes: f64,
}

impl TextGenerationClient {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> VideoResult<Self> {
        let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
        })
    }

    /// Run one completion and return the generated text.
    pub async fn complete(
        &self,
        system_prompt: &str,
        prompt: &str,
        language: &str,
        duration_minutes: f64,
    ) -> VideoResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| VideoError::ConfigError("TEXT_API_KEY is not set".to_string()))?;

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            language,
            duration_minutes,
        };

        debug!("Requesting script completion ({} chars of prompt)", prompt.len());

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status_code = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Text generation API error ({}): {}", status_code, error_text);
            return Err(VideoError::external(
                SERVICE,
                format!("HTTP {}: {}", status_code, error_text),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VideoError::invalid_response(SERVICE, e.to_string()))?;

        extract_generated_text(&body)
            .ok_or_else(|| VideoError::invalid_response(SERVICE, "no generated text in response"))
    }
}
