use crate::adapters::video_vendor::VideoVendorClient;
use crate::confluence::client::{ActingAs, ConfluenceClient};
use crate::confluence::storage::word_count;
use crate::db::models::{DocumentRef, JobId, JobRecord, Requester};
use crate::db::store::{enqueue_active, JobStore};
use crate::error::{VideoError, VideoResult};
use crate::services::extract::extract_job_id;
use crate::services::normalize::{normalize_language, normalize_voice, parse_duration_to_minutes};
use crate::services::script::ScriptComposer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const WORDS_PER_MINUTE: f64 = 150.0;
const DURATION_BUFFER: f64 = 1.3;
pub const MIN_DURATION_MINUTES: f64 = 2.0;

// ── Request shapes ──
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    #[serde(default)]
    pub page_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "content", alias = "body")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSpecs {
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    #[serde(default)]
    pub document: Option<DocumentInput>,
    #[serde(default)]
    pub video_specs: VideoSpecs,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub job_id: Option<JobId>,
    pub status: &'static str,
    pub duration_minutes: f64,
    pub duration: String,
    pub tracked: bool,
}

// ── Duration math ──
pub fn round_up_to_half(minutes: f64) -> f64 {
    (minutes * 2.0).ceil() / 2.0
}

/// Reading-speed estimate with a buffer for pauses, never below the vendor minimum.
pub fn heuristic_minutes(words: usize) -> f64 {
    let estimate = words as f64 / WORDS_PER_MINUTE * DURATION_BUFFER;
    round_up_to_half(estimate).max(MIN_DURATION_MINUTES)
}

/// The longer of the heuristic and the user's choice, floored at the vendor
/// minimum and rounded up to the next half minute.
pub fn target_duration_minutes(words: usize, user_selected: Option<f64>) -> f64 {
    let combined = heuristic_minutes(words).max(user_selected.unwrap_or(0.0));
    round_up_to_half(combined.max(MIN_DURATION_MINUTES))
}

/// `3.0` → `"3"`, `2.5` → `"2.5"`
pub fn format_duration(minutes: f64) -> String {
    if minutes.fract() == 0.0 {
        format!("{}", minutes as i64)
    } else {
        format!("{}", minutes)
    }
}

pub struct VendorPayload<'a> {
    pub script: &'a str,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub duration_minutes: f64,
    pub voice: &'a str,
    pub language: &'a str,
}

/// The vendor schema is loosely documented, so the output shape is sent under
/// every field name it has been seen to accept.
pub fn build_payload(input: &VendorPayload<'_>) -> Value {
    json!({
        "prompt": input.script,
        "script": input.script,
        "title": input.title,
        "description": input.description,
        "duration": format_duration(input.duration_minutes),
        "duration_minutes": input.duration_minutes,
        "voice": input.voice,
        "language": input.language,
        "orientation": "landscape",
        "aspect_ratio": "16:9",
        "aspectRatio": "16:9",
        "output_format": "video",
        "outputFormat": "video",
        "output_type": "video",
        "audio_only": false,
    })
}

pub struct VideoJobSubmitter {
    store: Arc<dyn JobStore>,
    vendor: VideoVendorClient,
    confluence: ConfluenceClient,
    composer: ScriptComposer,
    default_voice: String,
}

impl VideoJobSubmitter {
    pub fn new(
        store: Arc<dyn JobStore>,
        vendor: VideoVendorClient,
        confluence: ConfluenceClient,
        composer: ScriptComposer,
        default_voice: String,
    ) -> Self {
        Self {
            store,
            vendor,
            confluence,
            composer,
            default_voice,
        }
    }

    pub async fn submit(
        &self,
        request: VideoRequest,
        acting_as: &ActingAs,
    ) -> VideoResult<SubmissionOutcome> {
        let document = request
            .document
            .ok_or_else(|| VideoError::validation("document", "Required"))?;
        if document.text.trim().is_empty() {
            return Err(VideoError::validation("document.text", "Document has no text"));
        }
        if !self.vendor.is_configured() {
            return Err(VideoError::ConfigError("VIDEO_API_KEY is not set".to_string()));
        }

        let specs = &request.video_specs;
        let user_minutes = specs.duration.as_ref().and_then(parse_duration_to_minutes);
        let words = word_count(&document.text);
        let duration_minutes = target_duration_minutes(words, user_minutes);
        let language = normalize_language(specs.language.as_deref().unwrap_or(""));
        let voice = normalize_voice(specs.voice.as_deref().unwrap_or(""), &self.default_voice);
        let description = request.description.as_deref();

        info!(
            "Submitting video for page {:?}: {} words, {} minutes, {} / {}",
            document.page_id, words, duration_minutes, language, voice
        );

        let script = self
            .composer
            .compose(&document.text, &language, duration_minutes, description)
            .await;

        let payload = build_payload(&VendorPayload {
            script: &script,
            title: document.title.as_deref(),
            description,
            duration_minutes,
            voice: &voice,
            language: &language,
        });

        let response = self.vendor.submit(&payload).await?;
        let job_id = extract_job_id(&response);

        let tracked = match (&job_id, &document.page_id) {
            (Some(job_id), Some(page_id)) => {
                self.track_job(job_id, page_id, document.title.clone(), acting_as)
                    .await
            }
            (None, _) => {
                warn!("Video vendor response carried no job id: {}", response);
                false
            }
            (Some(job_id), None) => {
                warn!("Job {} has no page id, it will not be polled", job_id);
                false
            }
        };

        Ok(SubmissionOutcome {
            job_id,
            status: "processing",
            duration_minutes,
            duration: format_duration(duration_minutes),
            tracked,
        })
    }

    /// Record the job for the poller. Storage problems never fail the submission.
    async fn track_job(
        &self,
        job_id: &str,
        page_id: &str,
        title: Option<String>,
        acting_as: &ActingAs,
    ) -> bool {
        let requested_by = self.lookup_requester(acting_as).await;
        let record = JobRecord::new(
            job_id.to_string(),
            DocumentRef {
                page_id: page_id.to_string(),
                title,
            },
            requested_by,
        );

        if let Err(e) = self.store.put(&record).await {
            error!("Failed to store job record {}: {}", job_id, e);
            return false;
        }

        match enqueue_active(self.store.as_ref(), job_id).await {
            Ok(_) => {
                info!("Tracking video job {} for page {}", job_id, page_id);
                true
            }
            Err(e) => {
                error!("Failed to add job {} to the active list: {}", job_id, e);
                false
            }
        }
    }

    async fn lookup_requester(&self, acting_as: &ActingAs) -> Option<Requester> {
        if *acting_as == ActingAs::App {
            return None;
        }

        match self.confluence.current_user(acting_as).await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Could not resolve requesting user: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_for_300_words() {
        assert_eq!(heuristic_minutes(300), 3.0);
        assert_eq!(target_duration_minutes(300, None), 3.0);
        assert_eq!(format_duration(target_duration_minutes(300, None)), "3");
    }

    #[test]
    fn test_heuristic_floor() {
        assert_eq!(heuristic_minutes(0), 2.0);
        assert_eq!(heuristic_minutes(50), 2.0);
    }

    #[test]
    fn test_user_duration_wins_when_longer() {
        assert_eq!(target_duration_minutes(300, Some(5.0)), 5.0);
        assert_eq!(target_duration_minutes(300, Some(4.2)), 4.5);
    }

    #[test]
    fn test_user_duration_below_minimum() {
        assert_eq!(target_duration_minutes(10, Some(0.5)), 2.0);
        assert_eq!(target_duration_minutes(300, Some(1.0)), 3.0);
    }

    #[test]
    fn test_target_is_half_minute_multiple_and_at_least_two() {
        for words in [0usize, 1, 149, 150, 231, 300, 451, 777, 1500, 4321] {
            for user in [None, Some(0.5), Some(1.0), Some(2.2), Some(3.0), Some(7.75)] {
                let target = target_duration_minutes(words, user);
                assert!(target >= MIN_DURATION_MINUTES);
                assert_eq!((target * 2.0).fract(), 0.0, "{} not a half-minute step", target);

                let expected = round_up_to_half(heuristic_minutes(words).max(user.unwrap_or(0.0)))
                    .max(MIN_DURATION_MINUTES);
                assert_eq!(target, expected);
            }
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(2.0), "2");
        assert_eq!(format_duration(2.5), "2.5");
        assert_eq!(format_duration(10.0), "10");
    }

    #[test]
    fn test_payload_forces_landscape_video() {
        let payload = build_payload(&VendorPayload {
            script: "Script",
            title: Some("Page"),
            description: None,
            duration_minutes: 2.5,
            voice: "warm-female",
            language: "english",
        });

        assert_eq!(payload["prompt"], "Script");
        assert_eq!(payload["script"], "Script");
        assert_eq!(payload["duration"], "2.5");
        assert_eq!(payload["orientation"], "landscape");
        assert_eq!(payload["aspect_ratio"], "16:9");
        assert_eq!(payload["aspectRatio"], "16:9");
        assert_eq!(payload["output_type"], "video");
        assert_eq!(payload["audio_only"], false);
        assert!(payload["description"].is_null());
    }

    #[test]
    fn test_request_accepts_content_alias() {
        let request: VideoRequest = serde_json::from_value(json!({
            "document": {"pageId": "42", "title": "T", "content": "hello world"},
            "videoSpecs": {"duration": "3 min", "language": "en"}
        }))
        .unwrap();

        let document = request.document.unwrap();
        assert_eq!(document.text, "hello world");
        assert_eq!(document.page_id.as_deref(), Some("42"));
        assert_eq!(request.video_specs.language.as_deref(), Some("en"));
    }
}
