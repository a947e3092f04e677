#![allow(dead_code)]

use page_video_bot::db::models::{DocumentRef, JobRecord, Requester};
use page_video_bot::db::store::{enqueue_active, JobStore, MemoryJobStore, PgJobStore};
use page_video_bot::jobs::worker::JobWorker;
use page_video_bot::{AppConfig, AppState};
use sqlx::PgPool;
use std::sync::Arc;
use wiremock::MockServer;

pub const APP_EMAIL: &str = "bot@example.com";
pub const APP_TOKEN: &str = "app-token";
pub const INVOCATION_SECRET: &str = "test-secret";

pub struct TestContext {
    pub vendor: MockServer,
    pub confluence: MockServer,
    pub text: MockServer,
    pub store: Arc<MemoryJobStore>,
    pub state: AppState,
}

pub struct TestOptions {
    pub video_api_key: Option<String>,
    pub text_api_key: Option<String>,
    pub start_worker: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            video_api_key: Some("vendor-key".to_string()),
            text_api_key: None,
            start_worker: true,
        }
    }
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_options(TestOptions::default()).await
    }

    pub async fn with_options(options: TestOptions) -> Self {
        let vendor = MockServer::start().await;
        let confluence = MockServer::start().await;
        let text = MockServer::start().await;

        let config = AppConfig {
            database_url: "postgres://unused".to_string(),
            invocation_secret: INVOCATION_SECRET.to_string(),
            confluence_base_url: confluence.uri(),
            confluence_app_email: APP_EMAIL.to_string(),
            confluence_app_token: APP_TOKEN.to_string(),
            video_api_url: vendor.uri(),
            video_api_key: options.video_api_key,
            text_api_url: text.uri(),
            text_api_key: options.text_api_key,
            text_model: "test-model".to_string(),
            default_voice: "alloy".to_string(),
            poll_interval_secs: 60,
            host: "127.0.0.1".to_string(),
            port: 0,
        };

        let store = Arc::new(MemoryJobStore::new());

        // Create job channel; host-invoked polls go through the worker
        let (job_sender, job_receiver) = tokio::sync::mpsc::unbounded_channel();

        let state = AppState::new(store.clone(), config, job_sender)
            .expect("Failed to build app state");

        if options.start_worker {
            tokio::spawn(JobWorker::new(job_receiver, state.poller()).start());
        }

        Self {
            vendor,
            confluence,
            text,
            store,
            state,
        }
    }

    /// Store a job record and add it to the active list, as a submission would.
    pub async fn seed_job(&self, job_id: &str, page_id: &str) -> JobRecord {
        let record = JobRecord::new(
            job_id.to_string(),
            DocumentRef {
                page_id: page_id.to_string(),
                title: Some("Test page".to_string()),
            },
            Some(Requester {
                account_id: "557058:requester".to_string(),
                display_name: "Sam Doe".to_string(),
            }),
        );

        self.store.put(&record).await.expect("Failed to store record");
        enqueue_active(self.store.as_ref(), job_id)
            .await
            .expect("Failed to enqueue job");
        record
    }

    pub async fn active_jobs(&self) -> Vec<String> {
        self.store.list_active().await.expect("Failed to list active jobs")
    }
}

pub fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}

/// A migrated Postgres store, or `None` when `DATABASE_URL` is not set.
pub async fn pg_store() -> Option<(PgPool, PgJobStore)> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = page_video_bot::db::create_pool(&database_url)
        .await
        .expect("Failed to connect to test database");
    page_video_bot::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some((pool.clone(), PgJobStore::new(pool)))
}
