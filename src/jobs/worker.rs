use crate::jobs::poller::JobPoller;
use crate::jobs::Job;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub struct JobWorker {
    receiver: mpsc::UnboundedReceiver<Job>,
    poller: Arc<JobPoller>,
}

impl JobWorker {
    pub fn new(receiver: mpsc::UnboundedReceiver<Job>, poller: JobPoller) -> Self {
        Self {
            receiver,
            poller: Arc::new(poller),
        }
    }

    pub async fn start(mut self) {
        info!("Job worker started");

        // Jobs run one at a time so poll cycles never overlap each other
        while let Some(job) = self.receiver.recv().await {
            self.process_job(job).await;
        }

        info!("Job worker stopped");
    }

    async fn process_job(&self, job: Job) {
        match job {
            Job::PollActiveJobs { reply } => {
                // Spawn each cycle in a separate task to isolate panics and prevent worker death
                let poller = self.poller.clone();
                let handle = tokio::spawn(async move { poller.run_cycle().await });

                match handle.await {
                    Ok(summary) => {
                        if let Some(reply) = reply {
                            if reply.send(summary).is_err() {
                                warn!("Poll cycle finished after its caller went away");
                            }
                        }
                    }
                    Err(e) => error!("Poll cycle aborted: {}", e),
                }
            }
        }
    }
}
