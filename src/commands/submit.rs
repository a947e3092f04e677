use crate::app_state::AppState;
use crate::error::VideoResult;
use crate::resolvers::invoke::{parse_payload, InvocationContext};
use crate::services::submission::VideoRequest;
use serde_json::Value;
use tracing::info;

pub async fn handle_submit_video_job(
    state: AppState,
    context: InvocationContext,
    payload: Value,
) -> VideoResult<Value> {
    let request: VideoRequest = parse_payload(payload)?;

    let outcome = state
        .submitter()
        .submit(request, &context.acting_as())
        .await?;

    info!(
        "Video job {:?} submitted ({} minutes, tracked: {})",
        outcome.job_id, outcome.duration, outcome.tracked
    );

    Ok(serde_json::to_value(outcome)?)
}
