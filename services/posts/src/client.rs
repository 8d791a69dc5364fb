//! HTTP client for the posts REST API
//!
//! Every operation is a single request/response round trip. Nothing is
//! cached and nothing is retried; callers decide what to re-fetch.

use common::ClientConfig;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{PostError, PostResult};
use crate::models::wire::{ApiEnvelope, PageEnvelope};
use crate::models::{ListQuery, NewPost, PageResult, Post, PostChanges};
use crate::validation::{validate_changes, validate_new_post};

/// Client for the posts REST API
#[derive(Debug, Clone)]
pub struct PostClient {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl PostClient {
    /// Create a new posts client for the API rooted at `base_url`
    pub fn new(base_url: &str) -> PostResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PostError::connectivity("configure", format!("invalid API URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PostError::connectivity(
                "configure",
                "API URL cannot hold a path",
            ));
        }

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            token: None,
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &ClientConfig) -> PostResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PostError::connectivity("configure", e))?;

        Ok(Self::new(&config.api_url)?.with_http_client(http))
    }

    /// Use a custom HTTP client (for connection pool reuse or testing)
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL of the API
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List posts with pagination and optional author/subject filters
    pub async fn list(&self, query: &ListQuery) -> PostResult<PageResult> {
        const OPERATION: &str = "list posts";
        debug!("Listing posts: {:?}", query);

        let request = self
            .request(Method::GET, &["posts"])?
            .query(&query.to_params());

        self.fetch_page(request, OPERATION, query.page_size, None)
            .await
    }

    /// Search posts by free-text term
    ///
    /// The term is sent as given; an empty term is not turned into a listing
    /// here.
    pub async fn search(&self, term: &str, page: u32, page_size: u32) -> PostResult<PageResult> {
        const OPERATION: &str = "search posts";
        debug!("Searching posts for `{}` (page {})", term, page);

        let request = self.request(Method::GET, &["posts", "search"])?.query(&[
            ("q", term.to_string()),
            ("page", page.to_string()),
            ("limit", page_size.to_string()),
        ]);

        self.fetch_page(request, OPERATION, page_size, Some(term))
            .await
    }

    /// Get a post by ID
    pub async fn get_by_id(&self, id: &str) -> PostResult<Post> {
        const OPERATION: &str = "get post";
        if id.trim().is_empty() {
            return Err(PostError::NotFound("Post ID was not provided".to_string()));
        }
        debug!("Getting post: {}", id);

        let request = self.request(Method::GET, &["posts", id])?;
        let (status, body) = Self::dispatch(request, OPERATION).await?;
        let envelope: ApiEnvelope<Post> = Self::decode(status, &body, OPERATION)?;

        if status.is_success() && envelope.success {
            return Self::expect_post(envelope, OPERATION);
        }

        if envelope.errors.is_empty() && !status.is_server_error() {
            return Err(PostError::NotFound(
                envelope
                    .message
                    .unwrap_or_else(|| "Post not found".to_string()),
            ));
        }
        Err(Self::failure(status, envelope.message, envelope.errors, OPERATION))
    }

    /// Create a new post
    ///
    /// The payload is validated before anything is sent.
    pub async fn create(&self, post: &NewPost) -> PostResult<Post> {
        const OPERATION: &str = "create post";
        validate_new_post(post).map_err(PostError::Validation)?;

        let request = self.request(Method::POST, &["posts"])?.json(post);
        let created = self.send_for_post(request, OPERATION).await?;

        info!("Created post: {}", created.id);
        Ok(created)
    }

    /// Update a post with the fields that are set in `changes`
    pub async fn update(&self, id: &str, changes: &PostChanges) -> PostResult<Post> {
        const OPERATION: &str = "update post";
        if id.trim().is_empty() {
            return Err(PostError::NotFound("Post ID was not provided".to_string()));
        }
        validate_changes(changes).map_err(PostError::Validation)?;

        let request = self.request(Method::PUT, &["posts", id])?.json(changes);
        let updated = self.send_for_post(request, OPERATION).await?;

        info!("Updated post: {}", updated.id);
        Ok(updated)
    }

    /// Delete a post by ID
    pub async fn delete(&self, id: &str) -> PostResult<()> {
        const OPERATION: &str = "delete post";
        if id.trim().is_empty() {
            return Err(PostError::NotFound("Post ID was not provided".to_string()));
        }

        let request = self.request(Method::DELETE, &["posts", id])?;
        let (status, body) = Self::dispatch(request, OPERATION).await?;
        let envelope: ApiEnvelope<serde_json::Value> = Self::decode(status, &body, OPERATION)?;

        if status.is_success() && envelope.success {
            info!("Deleted post: {}", id);
            return Ok(());
        }
        Err(Self::failure(status, envelope.message, envelope.errors, OPERATION))
    }

    /// Check if the API is reachable
    pub async fn health(&self) -> PostResult<bool> {
        let request = self.request(Method::GET, &["health"])?;
        let (status, _) = Self::dispatch(request, "health check").await?;
        Ok(status.is_success())
    }

    fn endpoint(&self, segments: &[&str]) -> PostResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PostError::connectivity("configure", "API URL cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> PostResult<RequestBuilder> {
        let request = self.http.request(method, self.endpoint(segments)?);
        Ok(match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn dispatch(
        request: RequestBuilder,
        operation: &'static str,
    ) -> PostResult<(StatusCode, Vec<u8>)> {
        let response = request.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", operation, e);
            PostError::connectivity(operation, e)
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PostError::connectivity(operation, e))?;
        debug!("{} answered with {}", operation, status);

        Ok((status, body.to_vec()))
    }

    /// Decode a structured body; anything else is a connectivity failure
    fn decode<T: DeserializeOwned>(
        status: StatusCode,
        body: &[u8],
        operation: &'static str,
    ) -> PostResult<T> {
        serde_json::from_slice(body).map_err(|e| {
            if status.is_success() {
                PostError::connectivity(operation, format!("unexpected response body: {}", e))
            } else {
                PostError::connectivity(operation, format!("HTTP {}", status))
            }
        })
    }

    fn failure(
        status: StatusCode,
        message: Option<String>,
        errors: Vec<String>,
        operation: &'static str,
    ) -> PostError {
        if !errors.is_empty() {
            return PostError::Validation(errors);
        }
        if status == StatusCode::NOT_FOUND {
            return PostError::NotFound(message.unwrap_or_else(|| "Post not found".to_string()));
        }
        PostError::Rejected(message.unwrap_or_else(|| format!("Failed to {}", operation)))
    }

    fn expect_post(envelope: ApiEnvelope<Post>, operation: &'static str) -> PostResult<Post> {
        let post = envelope
            .data
            .ok_or_else(|| PostError::connectivity(operation, "response carried no post"))?;
        if !post.has_consistent_timestamps() {
            warn!("Post {} was updated before it was created", post.id);
        }
        Ok(post)
    }

    async fn send_for_post(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> PostResult<Post> {
        let (status, body) = Self::dispatch(request, operation).await?;
        let envelope: ApiEnvelope<Post> = Self::decode(status, &body, operation)?;

        if status.is_success() && envelope.success {
            return Self::expect_post(envelope, operation);
        }
        Err(Self::failure(status, envelope.message, envelope.errors, operation))
    }

    async fn fetch_page(
        &self,
        request: RequestBuilder,
        operation: &'static str,
        page_size: u32,
        term: Option<&str>,
    ) -> PostResult<PageResult> {
        let (status, body) = Self::dispatch(request, operation).await?;
        let envelope: PageEnvelope = Self::decode(status, &body, operation)?;

        if !(status.is_success() && envelope.success) {
            return Err(Self::failure(
                status,
                envelope.message,
                envelope.errors,
                operation,
            ));
        }

        let pagination = envelope
            .pagination
            .ok_or_else(|| PostError::connectivity(operation, "response carried no pagination"))?;

        // An empty result set has no pages.
        let total_pages = if pagination.total_items == 0 {
            0
        } else {
            pagination.total_pages
        };

        for post in envelope.data.iter().filter(|p| !p.has_consistent_timestamps()) {
            warn!("Post {} was updated before it was created", post.id);
        }

        Ok(PageResult {
            items: envelope.data,
            current_page: pagination.current_page,
            total_pages,
            total_items: pagination.total_items,
            page_size: pagination.page_size.unwrap_or(page_size),
            search_term: term.map(|requested| {
                envelope
                    .search_term
                    .unwrap_or_else(|| requested.to_string())
            }),
        })
    }
}
