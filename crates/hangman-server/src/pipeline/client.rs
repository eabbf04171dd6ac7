//! Async client for the JSONPlaceholder sample-data API.

use std::time::Duration;

use hangman::{PipelineError, PipelineResult, Record};

/// Public API the pipeline reads from by default.
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com";

/// Per-request timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP client for posts, users, and comments.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("hangman-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /posts?_limit={limit}`
    pub async fn fetch_posts(&self, limit: usize) -> PipelineResult<Vec<Record>> {
        self.get_records(&format!("/posts?_limit={limit}"), "posts")
            .await
    }

    /// `GET /users?_limit={limit}`
    pub async fn fetch_users(&self, limit: usize) -> PipelineResult<Vec<Record>> {
        self.get_records(&format!("/users?_limit={limit}"), "users")
            .await
    }

    /// `GET /posts/{post_id}/comments`
    pub async fn fetch_comments(&self, post_id: u64) -> PipelineResult<Vec<Record>> {
        self.get_records(&format!("/posts/{post_id}/comments"), "comments")
            .await
    }

    async fn get_records(&self, path: &str, what: &str) -> PipelineResult<Vec<Record>> {
        let url = format!("{}{path}", self.base_url);
        tracing::info!("Fetching {what} from {url}");

        let result = self.get_inner(&url).await;
        match &result {
            Ok(records) => tracing::info!("Successfully fetched {} {what}", records.len()),
            Err(e) => tracing::error!("Error fetching {what}: {e}"),
        }
        result
    }

    async fn get_inner(&self, url: &str) -> PipelineResult<Vec<Record>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<Record>>()
            .await
            .map_err(|e| PipelineError::Http(format!("invalid JSON body: {e}")))
    }
}
