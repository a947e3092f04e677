use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type JobId = String; // vendor-assigned
pub type PageId = String; // Confluence content id, e.g. "98304"

// ── Storage keys ──
pub const ACTIVE_JOBS_KEY: &str = "active-video-jobs";
const JOB_KEY_PREFIX: &str = "video-job-";

pub fn job_key(job_id: &str) -> String {
    format!("{}{}", JOB_KEY_PREFIX, job_id)
}

// ── Local job status ──
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

// ── Job record ──
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub page_id: PageId,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub account_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: JobId,
    pub page_id: PageId,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub document: DocumentRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<Requester>,
}

impl JobRecord {
    pub fn new(
        job_id: JobId,
        document: DocumentRef,
        requested_by: Option<Requester>,
    ) -> Self {
        Self {
            job_id,
            page_id: document.page_id.clone(),
            status: JobStatus::Processing,
            created_at: Utc::now(),
            document,
            requested_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_key() {
        assert_eq!(job_key("abc123"), "video-job-abc123");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = JobRecord::new(
            "job-1".to_string(),
            DocumentRef {
                page_id: "98304".to_string(),
                title: Some("Runbook".to_string()),
            },
            Some(Requester {
                account_id: "557058:abc".to_string(),
                display_name: "Sam Doe".to_string(),
            }),
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["jobId"], "job-1");
        assert_eq!(value["pageId"], "98304");
        assert_eq!(value["status"], "processing");
        assert_eq!(value["document"]["pageId"], "98304");
        assert_eq!(value["requestedBy"]["displayName"], "Sam Doe");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_requester_is_optional() {
        let record = JobRecord::new(
            "job-2".to_string(),
            DocumentRef {
                page_id: "1".to_string(),
                title: None,
            },
            None,
        );

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("requestedBy").is_none());

        let parsed: JobRecord = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, record);
    }
}
