use crate::error::{VideoError, VideoResult};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

const SERVICE: &str = "Video vendor";

#[derive(Clone)]
pub struct VideoVendorClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl VideoVendorClient {
    pub fn new(base_url: String, api_key: Option<String>) -> VideoResult<Self> {
        // Set 30-second timeout so a stuck render API cannot stall a poll cycle forever
        let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> VideoResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| VideoError::ConfigError("VIDEO_API_KEY is not set".to_string()))
    }

    /// Submit a render request. Returns the raw vendor response body.
    pub async fn submit(&self, payload: &Value) -> VideoResult<Value> {
        let api_key = self.api_key()?;
        let url = format!("{}/videos", self.base_url);

        debug!("Submitting video job to {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;

        let status_code = response.status();
        let body = response.text().await?;

        if !status_code.is_success() {
            let detail = vendor_error_detail(&body);
            error!("Video vendor submit error ({}): {}", status_code, detail);
            return Err(VideoError::external(
                SERVICE,
                format!("HTTP {}: {}", status_code, detail),
            ));
        }

        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Video vendor returned malformed JSON: {}", e);
            VideoError::invalid_response(SERVICE, "unexpected response format")
        })?;

        info!("Video vendor accepted job submission");
        Ok(parsed)
    }

    /// `{base}/videos/{job_id}` with the id percent-encoded as one path segment.
    fn job_url(&self, job_id: &str) -> VideoResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| VideoError::ConfigError(format!("Invalid VIDEO_API_URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| VideoError::ConfigError("VIDEO_API_URL cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["videos", job_id]);
        Ok(url)
    }

    /// Fetch the current vendor-side status document for a job.
    pub async fn job_status(&self, job_id: &str) -> VideoResult<Value> {
        let api_key = self.api_key()?;
        let url = self.job_url(job_id)?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(api_key)
            .send()
            .await?;

        let status_code = response.status();
        if !status_code.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VideoError::external(
                SERVICE,
                format!("HTTP {}: {}", status_code, vendor_error_detail(&body)),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| VideoError::invalid_response(SERVICE, format!("status body: {}", e)))
    }
}

/// Pull a human-readable message out of a vendor error body, falling back to
/// the raw text.
fn vendor_error_detail(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let detail = parsed.as_ref().and_then(|v| {
        v.get("error")
            .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(Value::as_str)))
            .or_else(|| v.get("message").and_then(Value::as_str))
            .or_else(|| v.get("detail").and_then(Value::as_str))
            .map(str::to_string)
    });

    match detail {
        Some(d) => d,
        None if body.trim().is_empty() => "Unknown error".to_string(),
        None => body.trim().to_string(),
    }
}
