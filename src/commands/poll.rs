use crate::app_state::AppState;
use crate::error::{VideoError, VideoResult};
use crate::jobs::Job;
use serde_json::Value;
use tokio::sync::oneshot;

/// Runs a cycle on the job worker so it never overlaps a scheduled one.
pub async fn handle_poll_active_jobs(state: AppState) -> VideoResult<Value> {
    let (reply, summary) = oneshot::channel();
    state
        .job_sender
        .send(Job::PollActiveJobs { reply: Some(reply) })
        .map_err(|_| VideoError::InternalError("Job worker is not running".to_string()))?;

    let summary = summary
        .await
        .map_err(|_| VideoError::InternalError("Poll cycle did not complete".to_string()))?;
    Ok(serde_json::to_value(summary)?)
}
