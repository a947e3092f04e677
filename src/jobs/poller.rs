use crate::adapters::video_vendor::VideoVendorClient;
use crate::confluence::client::ActingAs;
use crate::db::models::{JobId, JobRecord};
use crate::db::store::JobStore;
use crate::services::comment::CommentPublisher;
use crate::services::extract::{extract_status, extract_video_url};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

const READY_STATUSES: &[&str] = &["completed", "ready", "success", "finished", "done", "complete"];
const FAILED_STATUSES: &[&str] = &["failed", "error", "cancelled", "denied", "rejected"];

/// Vendor status text folded onto our three-way lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorOutcome {
    Ready,
    Failed,
    Pending,
}

pub fn classify_status(status: &str) -> VendorOutcome {
    let status = status.trim().to_lowercase();
    if READY_STATUSES.contains(&status.as_str()) {
        VendorOutcome::Ready
    } else if FAILED_STATUSES.contains(&status.as_str()) {
        VendorOutcome::Failed
    } else {
        VendorOutcome::Pending
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollSummary {
    pub processed: usize,
    pub completed: usize,
    pub failed: usize,
    pub remaining: usize,
}

/// What happened to one job during a cycle.
enum JobOutcome {
    Dropped,
    Completed,
    Failed,
    Pending,
    Retry,
}

pub struct JobPoller {
    store: Arc<dyn JobStore>,
    vendor: VideoVendorClient,
    publisher: CommentPublisher,
}

impl JobPoller {
    pub fn new(
        store: Arc<dyn JobStore>,
        vendor: VideoVendorClient,
        publisher: CommentPublisher,
    ) -> Self {
        Self {
            store,
            vendor,
            publisher,
        }
    }

    /// Run one poll cycle over the active-jobs list.
    ///
    /// Jobs are checked sequentially in list order. The active list is then
    /// overwritten with the jobs that still need polling, followed by any ids
    /// enqueued while the cycle was running; a failure part-way through at
    /// worst re-polls some jobs next cycle.
    pub async fn run_cycle(&self) -> PollSummary {
        let cycle_id = Uuid::new_v4();
        self.poll_active_jobs()
            .instrument(info_span!("poll_cycle", %cycle_id))
            .await
    }

    async fn poll_active_jobs(&self) -> PollSummary {
        let active = match self.store.list_active().await {
            Ok(active) => active,
            Err(e) => {
                error!("Failed to read active jobs: {}", e);
                return PollSummary::default();
            }
        };

        if active.is_empty() {
            debug!("No active video jobs");
            return PollSummary::default();
        }

        info!("Polling {} active video jobs", active.len());

        let mut summary = PollSummary::default();
        let mut remaining: Vec<JobId> = Vec::with_capacity(active.len());

        for job_id in active.iter().cloned() {
            match self.poll_job(&job_id).await {
                JobOutcome::Dropped => {}
                JobOutcome::Completed => summary.completed += 1,
                JobOutcome::Failed => summary.failed += 1,
                JobOutcome::Pending => {
                    summary.processed += 1;
                    remaining.push(job_id);
                }
                JobOutcome::Retry => remaining.push(job_id),
            }
        }

        self.append_late_arrivals(&active, &mut remaining).await;

        if let Err(e) = self.store.set_active(&remaining).await {
            error!("Failed to rewrite active jobs list: {}", e);
        }

        summary.remaining = remaining.len();
        info!(
            processed = summary.processed,
            completed = summary.completed,
            failed = summary.failed,
            remaining = summary.remaining,
            "Poll cycle finished"
        );
        summary
    }

    /// Keep ids submitted after the cycle took its snapshot, in their order.
    async fn append_late_arrivals(&self, snapshot: &[JobId], remaining: &mut Vec<JobId>) {
        let current = match self.store.list_active().await {
            Ok(current) => current,
            Err(e) => {
                warn!("Failed to re-read active jobs, late submissions may be lost: {}", e);
                return;
            }
        };

        for job_id in current {
            if !snapshot.contains(&job_id) && !remaining.contains(&job_id) {
                debug!("Job {} was enqueued during the cycle", job_id);
                remaining.push(job_id);
            }
        }
    }

    async fn poll_job(&self, job_id: &str) -> JobOutcome {
        let record = match self.store.get(job_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!("No record for active job {}, dropping it", job_id);
                return JobOutcome::Dropped;
            }
            Err(e) => {
                error!("Failed to load job record {}: {}", job_id, e);
                return JobOutcome::Retry;
            }
        };

        let response = match self.vendor.job_status(job_id).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Status check for job {} failed, retrying next cycle: {}", job_id, e);
                return JobOutcome::Retry;
            }
        };

        let status = extract_status(&response).unwrap_or_default();
        match classify_status(&status) {
            VendorOutcome::Ready => match extract_video_url(&response) {
                Some(video_url) => {
                    self.complete_job(&record, &video_url).await;
                    JobOutcome::Completed
                }
                None => {
                    error!(
                        "Job {} reported '{}' but no video URL was found in the response: {}",
                        job_id, status, response
                    );
                    JobOutcome::Retry
                }
            },
            VendorOutcome::Failed => {
                info!("Job {} failed at the vendor with status '{}'", job_id, status);
                self.retire(job_id).await;
                JobOutcome::Failed
            }
            VendorOutcome::Pending => {
                debug!("Job {} still in progress ({})", job_id, status);
                JobOutcome::Pending
            }
        }
    }

    async fn complete_job(&self, record: &JobRecord, video_url: &str) {
        info!("Job {} finished: {}", record.job_id, video_url);

        // The comment failing must not keep a finished video in the queue forever
        if let Err(e) = self
            .publisher
            .publish(
                &record.page_id,
                video_url,
                record.requested_by.as_ref(),
                &ActingAs::App,
            )
            .await
        {
            warn!(
                "Job {} completed without a page comment: {}",
                record.job_id, e
            );
        }

        self.retire(&record.job_id).await;
    }

    async fn retire(&self, job_id: &str) {
        if let Err(e) = self.store.delete(job_id).await {
            error!("Failed to delete job record {}: {}", job_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_vocabulary() {
        for status in ["completed", "READY", "Success", "finished", "done", "complete"] {
            assert_eq!(classify_status(status), VendorOutcome::Ready, "{}", status);
        }
    }

    #[test]
    fn test_failed_vocabulary() {
        for status in ["failed", "Error", "CANCELLED", "denied", "rejected"] {
            assert_eq!(classify_status(status), VendorOutcome::Failed, "{}", status);
        }
    }

    #[test]
    fn test_unknown_is_pending() {
        for status in ["processing", "queued", "rendering", "", "completed_partially"] {
            assert_eq!(classify_status(status), VendorOutcome::Pending, "{}", status);
        }
    }
}
