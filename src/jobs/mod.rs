pub mod poller;
pub mod scheduler;
pub mod worker;

use crate::jobs::poller::PollSummary;
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum Job {
    /// One pass over the active-jobs list. Host invocations pass a reply
    /// channel to receive the cycle summary; scheduled ticks do not.
    PollActiveJobs {
        reply: Option<oneshot::Sender<PollSummary>>,
    },
}
