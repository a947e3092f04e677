use crate::app_state::AppState;
use crate::confluence::storage::word_count;
use crate::error::{VideoError, VideoResult};
use crate::resolvers::invoke::parse_payload;
use crate::services::normalize::{normalize_language, parse_duration_to_minutes};
use crate::services::submission::{target_duration_minutes, VideoRequest};
use serde_json::{json, Value};

pub async fn handle_generate_script(state: AppState, payload: Value) -> VideoResult<Value> {
    let request: VideoRequest = parse_payload(payload)?;

    let document = request
        .document
        .ok_or_else(|| VideoError::validation("document", "Required"))?;
    if document.text.trim().is_empty() {
        return Err(VideoError::validation("document.text", "Document has no text"));
    }

    let specs = &request.video_specs;
    let user_minutes = specs.duration.as_ref().and_then(parse_duration_to_minutes);
    let duration_minutes = target_duration_minutes(word_count(&document.text), user_minutes);
    let language = normalize_language(specs.language.as_deref().unwrap_or(""));

    let script = state
        .script_composer()
        .compose(
            &document.text,
            &language,
            duration_minutes,
            request.description.as_deref(),
        )
        .await;

    Ok(json!({
        "script": script,
        "language": language,
        "durationMinutes": duration_minutes,
    }))
}
