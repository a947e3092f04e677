use crate::app_state::AppState;
use crate::db::models::JobStatus;
use crate::error::{VideoError, VideoResult};
use crate::jobs::poller::{classify_status, VendorOutcome};
use crate::resolvers::invoke::parse_payload;
use crate::services::extract::{extract_status, extract_video_url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatusPayload {
    #[serde(default, alias = "job_id")]
    job_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusView {
    pub job_id: String,
    pub status: JobStatus,
    pub vendor_status: Option<String>,
    pub video_url: Option<String>,
    pub tracked: bool,
}

/// Direct status check for one job. Vendor errors are returned to the caller;
/// nothing in the store is changed.
pub async fn handle_get_job_status(state: AppState, payload: Value) -> VideoResult<Value> {
    let request: JobStatusPayload = parse_payload(payload)?;
    let job_id = request
        .job_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| VideoError::validation("jobId", "Required"))?;

    let response = state.vendor.job_status(&job_id).await?;
    let vendor_status = extract_status(&response);
    let video_url = extract_video_url(&response);

    let status = match classify_status(vendor_status.as_deref().unwrap_or("")) {
        VendorOutcome::Ready if video_url.is_some() => JobStatus::Completed,
        VendorOutcome::Failed => JobStatus::Failed,
        _ => JobStatus::Processing,
    };

    let tracked = match state.store.get(&job_id).await {
        Ok(record) => record.is_some(),
        Err(e) => {
            warn!("Could not read job record {}: {}", job_id, e);
            false
        }
    };

    let view = JobStatusView {
        job_id,
        status,
        vendor_status,
        video_url,
        tracked,
    };
    Ok(serde_json::to_value(view)?)
}
