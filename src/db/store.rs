use crate::db::models::{job_key, JobId, JobRecord, ACTIVE_JOBS_KEY};
use crate::db::queries::kv;
use crate::error::VideoResult;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Persistent job bookkeeping shared by the submitter and the poller.
///
/// Records live under `video-job-<jobId>`; the ordered list of ids still being
/// polled lives under `active-video-jobs` and is always rewritten whole.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, job_id: &str) -> VideoResult<Option<JobRecord>>;

    async fn put(&self, record: &JobRecord) -> VideoResult<()>;

    async fn delete(&self, job_id: &str) -> VideoResult<()>;

    async fn list_active(&self) -> VideoResult<Vec<JobId>>;

    async fn set_active(&self, job_ids: &[JobId]) -> VideoResult<()>;

    async fn health_check(&self) -> bool {
        true
    }
}

/// Append an id to the active list unless it is already there.
pub async fn enqueue_active(store: &dyn JobStore, job_id: &str) -> VideoResult<bool> {
    let mut active = store.list_active().await?;
    if active.iter().any(|id| id == job_id) {
        return Ok(false);
    }

    active.push(job_id.to_string());
    store.set_active(&active).await?;
    Ok(true)
}

fn decode_active(value: Option<Value>) -> VideoResult<Vec<JobId>> {
    match value {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(v) => Ok(serde_json::from_value(v)?),
    }
}

// ── Postgres-backed key-value store ──
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn get(&self, job_id: &str) -> VideoResult<Option<JobRecord>> {
        match kv::get_value(&self.pool, &job_key(job_id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, record: &JobRecord) -> VideoResult<()> {
        let value = serde_json::to_value(record)?;
        kv::set_value(&self.pool, &job_key(&record.job_id), value).await
    }

    async fn delete(&self, job_id: &str) -> VideoResult<()> {
        kv::delete_value(&self.pool, &job_key(job_id)).await
    }

    async fn list_active(&self) -> VideoResult<Vec<JobId>> {
        decode_active(kv::get_value(&self.pool, ACTIVE_JOBS_KEY).await?)
    }

    async fn set_active(&self, job_ids: &[JobId]) -> VideoResult<()> {
        let value = serde_json::to_value(job_ids)?;
        kv::set_value(&self.pool, ACTIVE_JOBS_KEY, value).await
    }

    async fn health_check(&self) -> bool {
        crate::db::health_check(&self.pool).await
    }
}

// ── In-memory store (tests and local runs without Postgres) ──
#[derive(Default)]
pub struct MemoryJobStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, job_id: &str) -> VideoResult<Option<JobRecord>> {
        let entries = self.entries.lock().await;
        match entries.get(&job_key(job_id)) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn put(&self, record: &JobRecord) -> VideoResult<()> {
        let value = serde_json::to_value(record)?;
        self.entries
            .lock()
            .await
            .insert(job_key(&record.job_id), value);
        Ok(())
    }

    async fn delete(&self, job_id: &str) -> VideoResult<()> {
        self.entries.lock().await.remove(&job_key(job_id));
        Ok(())
    }

    async fn list_active(&self) -> VideoResult<Vec<JobId>> {
        let value = self.entries.lock().await.get(ACTIVE_JOBS_KEY).cloned();
        decode_active(value)
    }

    async fn set_active(&self, job_ids: &[JobId]) -> VideoResult<()> {
        let value = serde_json::to_value(job_ids)?;
        self.entries
            .lock()
            .await
            .insert(ACTIVE_JOBS_KEY.to_string(), value);
        Ok(())
    }
}
