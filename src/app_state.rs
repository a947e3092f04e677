use crate::adapters::text_generation::TextGenerationClient;
use crate::adapters::video_vendor::VideoVendorClient;
use crate::config::AppConfig;
use crate::confluence::client::ConfluenceClient;
use crate::db::store::JobStore;
use crate::error::VideoResult;
use crate::jobs::poller::JobPoller;
use crate::jobs::Job;
use crate::services::comment::CommentPublisher;
use crate::services::script::ScriptComposer;
use crate::services::submission::VideoJobSubmitter;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobStore>,
    pub config: Arc<AppConfig>,
    pub confluence: ConfluenceClient,
    pub text_client: TextGenerationClient,
    pub vendor: VideoVendorClient,
    pub job_sender: mpsc::UnboundedSender<Job>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn JobStore>,
        config: AppConfig,
        job_sender: mpsc::UnboundedSender<Job>,
    ) -> VideoResult<Self> {
        let confluence = ConfluenceClient::new(
            config.confluence_base_url.clone(),
            config.confluence_app_email.clone(),
            config.confluence_app_token.clone(),
        )?;
        let text_client = TextGenerationClient::new(
            config.text_api_url.clone(),
            config.text_api_key.clone(),
            config.text_model.clone(),
        )?;
        let vendor = VideoVendorClient::new(config.video_api_url.clone(), config.video_api_key.clone())?;

        Ok(Self {
            store,
            config: Arc::new(config),
            confluence,
            text_client,
            vendor,
            job_sender,
        })
    }

    pub fn script_composer(&self) -> ScriptComposer {
        ScriptComposer::new(self.text_client.clone())
    }

    pub fn comment_publisher(&self) -> CommentPublisher {
        CommentPublisher::new(self.confluence.clone())
    }

    pub fn submitter(&self) -> VideoJobSubmitter {
        VideoJobSubmitter::new(
            self.store.clone(),
            self.vendor.clone(),
            self.confluence.clone(),
            self.script_composer(),
            self.config.default_voice.clone(),
        )
    }

    pub fn poller(&self) -> JobPoller {
        JobPoller::new(self.store.clone(), self.vendor.clone(), self.comment_publisher())
    }
}
