use crate::confluence::client::{ActingAs, ConfluenceClient};
use crate::confluence::storage::video_comment_html;
use crate::db::models::Requester;
use crate::error::VideoResult;
use tracing::{error, info};

#[derive(Clone)]
pub struct CommentPublisher {
    confluence: ConfluenceClient,
}

impl CommentPublisher {
    pub fn new(confluence: ConfluenceClient) -> Self {
        Self { confluence }
    }

    /// Post the finished video link on the page. Returns the comment id.
    pub async fn publish(
        &self,
        page_id: &str,
        video_url: &str,
        requested_by: Option<&Requester>,
        acting_as: &ActingAs,
    ) -> VideoResult<String> {
        let html = video_comment_html(video_url, requested_by);

        match self
            .confluence
            .post_footer_comment(page_id, &html, acting_as)
            .await
        {
            Ok(comment_id) => {
                info!("Posted video comment {} on page {}", comment_id, page_id);
                Ok(comment_id)
            }
            Err(e) => {
                error!("Failed to post video comment on page {}: {}", page_id, e);
                Err(e)
            }
        }
    }
}
