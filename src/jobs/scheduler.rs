use crate::jobs::Job;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Queue a poll job on every tick until the worker goes away.
pub async fn run_poll_schedule(period: Duration, sender: mpsc::UnboundedSender<Job>) {
    info!("Polling active video jobs every {}s", period.as_secs());

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        debug!("Scheduling poll cycle");

        if sender.send(Job::PollActiveJobs { reply: None }).is_err() {
            warn!("Job worker channel closed, stopping poll schedule");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_schedule_sends_poll_jobs() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_poll_schedule(Duration::from_secs(60), sender));

        // First tick fires immediately
        assert!(matches!(receiver.recv().await, Some(Job::PollActiveJobs { reply: None })));
        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(matches!(receiver.recv().await, Some(Job::PollActiveJobs { reply: None })));

        drop(receiver);
        tokio::time::advance(Duration::from_secs(60)).await;
        handle.await.unwrap();
    }
}
