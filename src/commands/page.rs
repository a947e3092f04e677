use crate::app_state::AppState;
use crate::confluence::storage::{storage_to_text, word_count};
use crate::error::{VideoError, VideoResult};
use crate::resolvers::invoke::{parse_payload, InvocationContext};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagePayload {
    #[serde(default)]
    page_id: Option<String>,
}

pub async fn handle_get_page(
    state: AppState,
    context: InvocationContext,
    payload: Value,
) -> VideoResult<Value> {
    let request: PagePayload = parse_payload(payload)?;
    let page_id = request
        .page_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| VideoError::validation("pageId", "Required"))?;

    let page = state
        .confluence
        .get_page(&page_id, &context.acting_as())
        .await?;
    let text = storage_to_text(page.storage_html());

    Ok(json!({
        "pageId": page.id,
        "title": page.title,
        "wordCount": word_count(&text),
        "text": text,
    }))
}
