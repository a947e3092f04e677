use crate::app_state::AppState;
use crate::confluence::client::ActingAs;
use crate::error::{VideoError, VideoResult};
use crate::resolvers::verification::verify_invocation_signature;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

pub const SIGNATURE_HEADER: &str = "x-invocation-signature";
pub const TIMESTAMP_HEADER: &str = "x-invocation-timestamp";
pub const ACCOUNT_ID_HEADER: &str = "x-invocation-account-id";
pub const USER_TOKEN_HEADER: &str = "x-invocation-user-token";

#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub resolver: String,
    #[serde(default)]
    pub payload: Value,
}

/// Who triggered the invocation. Both fields are absent for host-scheduled calls.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    pub account_id: Option<String>,
    pub user_token: Option<String>,
}

impl InvocationContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            account_id: header_str(headers, ACCOUNT_ID_HEADER).map(str::to_string),
            user_token: header_str(headers, USER_TOKEN_HEADER).map(str::to_string),
        }
    }

    pub fn acting_as(&self) -> ActingAs {
        ActingAs::from_session(self.user_token.as_deref())
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

pub async fn handle_invoke(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let signature = header_str(&headers, SIGNATURE_HEADER).unwrap_or("");
    let timestamp = header_str(&headers, TIMESTAMP_HEADER).unwrap_or("");

    if let Err(e) =
        verify_invocation_signature(&state.config.invocation_secret, timestamp, &body, signature)
    {
        error!("Signature verification failed: {}", e);
        return e.into_response();
    }

    let request: InvokeRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to parse invocation: {}", e);
            return (StatusCode::BAD_REQUEST, "Invalid request").into_response();
        }
    };

    let context = InvocationContext::from_headers(&headers);
    debug!(
        "Received invocation: {} (account: {:?})",
        request.resolver, context.account_id
    );

    let resolver = request.resolver.clone();
    match dispatch(state, context, request).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            error!("Resolver {} failed: {}", resolver, e);
            e.into_response()
        }
    }
}

pub async fn dispatch(
    state: AppState,
    context: InvocationContext,
    request: InvokeRequest,
) -> VideoResult<Value> {
    match request.resolver.as_str() {
        "submitVideoJob" => {
            crate::commands::submit::handle_submit_video_job(state, context, request.payload).await
        }
        "pollActiveJobs" => crate::commands::poll::handle_poll_active_jobs(state).await,
        "getJobStatus" => {
            crate::commands::job_status::handle_get_job_status(state, request.payload).await
        }
        "getPage" => crate::commands::page::handle_get_page(state, context, request.payload).await,
        "generateScript" => {
            crate::commands::script::handle_generate_script(state, request.payload).await
        }
        other => Err(VideoError::validation(
            "resolver",
            format!(
                "Unknown resolver: {}. Available: submitVideoJob, pollActiveJobs, getJobStatus, getPage, generateScript",
                other
            ),
        )),
    }
}

/// Deserialize a resolver payload, reporting shape problems as validation errors.
pub fn parse_payload<T: for<'de> Deserialize<'de>>(payload: Value) -> VideoResult<T> {
    let payload = if payload.is_null() {
        Value::Object(Default::default())
    } else {
        payload
    };
    serde_json::from_value(payload).map_err(|e| VideoError::validation("payload", e.to_string()))
}
