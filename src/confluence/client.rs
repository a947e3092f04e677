use crate::db::models::Requester;
use crate::error::{VideoError, VideoResult};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

const SERVICE: &str = "Confluence";

/// Which identity a Confluence call is made as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActingAs {
    /// The invoking user's session token.
    User(String),
    /// The service's own account. Used outside any user session, e.g. by the poller.
    App,
}

impl ActingAs {
    /// The invoking user when a session token is present, otherwise the app.
    pub fn from_session(user_token: Option<&str>) -> Self {
        match user_token.map(str::trim) {
            Some(token) if !token.is_empty() => ActingAs::User(token.to_string()),
            _ => ActingAs::App,
        }
    }
}

#[derive(Clone)]
pub struct ConfluenceClient {
    http_client: Client,
    base_url: String,
    app_email: String,
    app_token: String,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<PageBody>,
}

#[derive(Debug, Deserialize)]
pub struct PageBody {
    pub storage: Option<StorageValue>,
}

#[derive(Debug, Deserialize)]
pub struct StorageValue {
    pub value: String,
}

impl Page {
    pub fn storage_html(&self) -> &str {
        self.body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map(|s| s.value.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentUser {
    account_id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    public_name: Option<String>,
}

impl ConfluenceClient {
    pub fn new(base_url: String, app_email: String, app_token: String) -> VideoResult<Self> {
        // Set 30-second timeout to prevent hanging requests to the Confluence API
        let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            app_email,
            app_token,
        })
    }

    fn authorize(&self, request: RequestBuilder, acting_as: &ActingAs) -> RequestBuilder {
        match acting_as {
            ActingAs::User(token) => request.bearer_auth(token),
            ActingAs::App => request.basic_auth(&self.app_email, Some(&self.app_token)),
        }
    }

    async fn check(response: reqwest::Response, what: &str) -> VideoResult<reqwest::Response> {
        let status_code = response.status();
        if status_code == reqwest::StatusCode::NOT_FOUND {
            return Err(VideoError::NotFound(what.to_string()));
        }
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Confluence API error on {} ({}): {}", what, status_code, error_text);
            return Err(VideoError::external(
                SERVICE,
                format!("{} failed: HTTP {}: {}", what, status_code, error_text),
            ));
        }
        Ok(response)
    }

    pub async fn get_page(&self, page_id: &str, acting_as: &ActingAs) -> VideoResult<Page> {
        debug!("Fetching Confluence page {}", page_id);

        let request = self.http_client.get(format!(
            "{}/wiki/api/v2/pages/{}?body-format=storage",
            self.base_url, page_id
        ));
        let response = self.authorize(request, acting_as).send().await?;
        let response = Self::check(response, &format!("page {}", page_id)).await?;

        response
            .json()
            .await
            .map_err(|e| VideoError::invalid_response(SERVICE, e.to_string()))
    }

    /// Post a footer comment in storage format. Returns the new comment id.
    pub async fn post_footer_comment(
        &self,
        page_id: &str,
        html: &str,
        acting_as: &ActingAs,
    ) -> VideoResult<String> {
        #[derive(Deserialize)]
        struct CommentResponse {
            id: String,
        }

        let request = self
            .http_client
            .post(format!("{}/wiki/api/v2/footer-comments", self.base_url))
            .json(&json!({
                "pageId": page_id,
                "body": {
                    "representation": "storage",
                    "value": html,
                },
            }));
        let response = self.authorize(request, acting_as).send().await?;
        let response = Self::check(response, "footer comment").await?;

        let created: CommentResponse = response
            .json()
            .await
            .map_err(|e| VideoError::invalid_response(SERVICE, e.to_string()))?;

        Ok(created.id)
    }

    pub async fn current_user(&self, acting_as: &ActingAs) -> VideoResult<Requester> {
        let request = self
            .http_client
            .get(format!("{}/wiki/rest/api/user/current", self.base_url));
        let response = self.authorize(request, acting_as).send().await?;
        let response = Self::check(response, "current user").await?;

        let user: CurrentUser = response
            .json()
            .await
            .map_err(|e| VideoError::invalid_response(SERVICE, e.to_string()))?;

        let display_name = user
            .display_name
            .or(user.public_name)
            .unwrap_or_else(|| user.account_id.clone());

        Ok(Requester {
            account_id: user.account_id,
            display_name,
        })
    }
}
