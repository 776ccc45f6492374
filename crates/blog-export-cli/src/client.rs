//! Shared client utilities, error types, and logging setup for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use blog_export_api_models::paths;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// Default logging filter when `RUST_LOG` is not provided.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// HTTP clients constructed from CLI options.
pub(crate) struct CliDependencies {
    /// Client for request/response calls, bounded by `--timeout`.
    pub(crate) client: Client,
    /// Client for job streams, which run until the backend finishes.
    pub(crate) stream_client: Client,
}

impl CliDependencies {
    /// Build both HTTP clients with the request id and session cookie attached.
    pub(crate) fn from_cli(cli: &Cli, session: Option<&str>, trace_id: &str) -> CliResult<Self> {
        let headers = default_headers(trace_id, session)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(cli.timeout))
            .redirect(Policy::none())
            .default_headers(headers.clone())
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
        let stream_client = Client::builder()
            .connect_timeout(Duration::from_secs(cli.timeout))
            .redirect(Policy::none())
            .default_headers(headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            stream_client,
        })
    }
}

fn default_headers(trace_id: &str, session: Option<&str>) -> CliResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
        CliError::failure(anyhow!("trace identifier contains invalid characters"))
    })?;
    headers.insert(HEADER_REQUEST_ID, request_id);
    if let Some(cookie) = session {
        let mut value = HeaderValue::from_str(cookie)
            .map_err(|_| CliError::validation("session cookie contains invalid characters"))?;
        value.set_sensitive(true);
        headers.insert(COOKIE, value);
    }
    Ok(headers)
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) stream_client: Client,
    pub(crate) base_url: Url,
}

impl AppContext {
    /// Resolve an endpoint path against the API base, keeping the base path.
    pub(crate) fn endpoint(&self, path: &str) -> CliResult<Url> {
        paths::join(self.base_url.as_str(), path)
            .parse::<Url>()
            .map_err(|err| CliError::failure(anyhow!("invalid endpoint URL for {path}: {err}")))
    }

    /// `GET` builder for a request/response endpoint.
    pub(crate) fn get(&self, path: &str) -> CliResult<RequestBuilder> {
        Ok(self.client.get(self.endpoint(path)?))
    }

    /// `GET` builder for a job stream endpoint.
    pub(crate) fn stream(&self, path: &str) -> CliResult<RequestBuilder> {
        Ok(self
            .stream_client
            .get(self.endpoint(path)?)
            .header(reqwest::header::ACCEPT, "text/event-stream"))
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    let url = input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported URL scheme '{}'", url.scheme()));
    }
    Ok(url)
}

/// Normalise the session cookie provided to the CLI.
pub(crate) fn parse_session(input: Option<String>) -> CliResult<Option<String>> {
    let Some(raw) = input else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !trimmed.contains('=') {
        return Err(CliError::validation(
            "session must be a cookie header value such as JSESSIONID=<id>",
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Install the stderr tracing subscriber.
///
/// Honours `RUST_LOG`; a subscriber that is already installed is left in place.
pub(crate) fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Error body returned by the backend framework.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Classify an HTTP response into a CLI error.
pub(crate) async fn classify_problem(response: reqwest::Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();

    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();
    let body = serde_json::from_slice::<ErrorBody>(&bytes).ok();

    let message = body
        .as_ref()
        .and_then(|body| body.message.clone().filter(|text| !text.is_empty()))
        .or_else(|| body.as_ref().and_then(|body| body.error.clone()))
        .unwrap_or(body_text);

    // Unauthenticated requests are redirected to the sign-in page.
    if status.is_redirection()
        || matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
    {
        return CliError::validation(format!(
            "not signed in (status {status}); pass --session or set BLOG_EXPORT_SESSION"
        ));
    }
    if matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND) {
        let detail = if message.is_empty() {
            format!("request rejected with status {status}")
        } else {
            format!("{message} (status {status})")
        };
        return CliError::validation(detail);
    }
    if message.is_empty() {
        CliError::failure(anyhow!("request failed with status {status}"))
    } else {
        CliError::failure(anyhow!("{message} (status {status})"))
    }
}

/// Send a request and turn transport errors or non-success statuses into a `CliError`.
pub(crate) async fn send(builder: RequestBuilder, action: &str) -> CliResult<reqwest::Response> {
    let response = builder
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to {action}: {err}")))?;
    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }
    Ok(response)
}
