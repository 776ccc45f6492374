//! Endpoint paths exposed by the export backend.
//!
//! # Design
//! - Paths are relative to the API base (see [`DEFAULT_BASE_PATH`]).
//! - Every caller-supplied segment or query value is percent-encoded.

use crate::range::DateRange;
use urlencoding::encode;

/// Context path the backend is mounted under.
pub const DEFAULT_BASE_PATH: &str = "/blog-export";

/// `GET` the blog list.
#[must_use]
pub fn blogs() -> String {
    "/blogs".to_string()
}

/// `GET` a single blog.
#[must_use]
pub fn blog(id: &str) -> String {
    format!("/blogs/{}", encode(id))
}

/// `GET` to register a blog by URL; responds with the refreshed list.
#[must_use]
pub fn add_blog(url: &str) -> String {
    format!("/addBlog?url={}", encode(url.trim()))
}

/// `GET` the generated PDFs available for a blog.
#[must_use]
pub fn list_downloads(blog_id: &str) -> String {
    format!("/listdownloads/{}", encode(blog_id))
}

/// `GET` a generated PDF as an attachment.
#[must_use]
pub fn pdf(blog_id: &str, file_name: &str) -> String {
    format!("/pdf/{}?filename={}", encode(blog_id), encode(file_name))
}

/// SSE stream driving a blog download job.
#[must_use]
pub fn download(blog_id: &str) -> String {
    format!("/download/{}", encode(blog_id))
}

/// SSE stream driving PDF generation for a date range.
#[must_use]
pub fn generate(blog_id: &str, range: &DateRange) -> String {
    let query = range
        .query_pairs()
        .iter()
        .map(|(key, value)| format!("{key}={}", encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("/generate/{}?{query}", encode(blog_id))
}

/// `GET` the signed-in user.
#[must_use]
pub fn user() -> String {
    "/user".to_string()
}

/// Navigation target that ends the session.
#[must_use]
pub fn logout() -> String {
    "/logout".to_string()
}

/// Join an API base (absolute URL or path) with an endpoint path.
#[must_use]
pub fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
