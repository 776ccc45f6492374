//! HTTP client helpers (REST).
//!
//! # Design
//! - Every request carries the same-origin session cookie; the backend owns auth.
//! - Non-2xx responses surface as [`ApiError::Status`] so views can log and move on.

use blog_export_api_models::{BlogDto, DateRange, PdfDownload, UserDto, paths};
use gloo_net::http::{Request, Response};
use thiserror::Error;
use web_sys::RequestCredentials;

/// Failure modes for REST calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub(crate) enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("http {0}")]
    Status(u16),
    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Absolute (or origin-relative) URL for an endpoint path.
    pub(crate) fn url(&self, path: &str) -> String {
        paths::join(&self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Response, ApiError> {
        let response = Request::get(&self.url(path))
            .credentials(RequestCredentials::SameOrigin)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        if !response.ok() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response)
    }

    async fn get_json<T: for<'de> serde::Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        self.get(path)
            .await?
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub(crate) async fn fetch_blogs(&self) -> Result<Vec<BlogDto>, ApiError> {
        self.get_json(&paths::blogs()).await
    }

    pub(crate) async fn fetch_blog(&self, id: &str) -> Result<BlogDto, ApiError> {
        self.get_json(&paths::blog(id)).await
    }

    /// Register a blog; the refreshed list in the body is ignored in favour of a re-fetch.
    pub(crate) async fn add_blog(&self, url: &str) -> Result<(), ApiError> {
        self.get(&paths::add_blog(url)).await.map(|_| ())
    }

    pub(crate) async fn fetch_downloads(&self, blog_id: &str) -> Result<Vec<PdfDownload>, ApiError> {
        self.get_json(&paths::list_downloads(blog_id)).await
    }

    pub(crate) async fn fetch_user(&self) -> Result<UserDto, ApiError> {
        self.get_json(&paths::user()).await
    }

    pub(crate) fn pdf_url(&self, blog_id: &str, download: &PdfDownload) -> String {
        self.url(&paths::pdf(blog_id, download.file_name()))
    }

    pub(crate) fn logout_url(&self) -> String {
        self.url(&paths::logout())
    }

    pub(crate) fn download_stream_url(&self, blog_id: &str) -> String {
        self.url(&paths::download(blog_id))
    }

    pub(crate) fn generate_stream_url(&self, blog_id: &str, range: &DateRange) -> String {
        self.url(&paths::generate(blog_id, range))
    }
}
