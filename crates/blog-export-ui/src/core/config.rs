//! API base resolution for the browser client.
//!
//! # Design
//! - The backend serves the UI, so requests default to the page origin.
//! - A non-empty stored override wins over the derived default.

use blog_export_api_models::paths::DEFAULT_BASE_PATH;

/// Local storage key holding an optional API base override.
pub const API_BASE_KEY: &str = "blog_export.api_base";

/// Resolve the API base from an optional override and the page origin.
#[must_use]
pub fn resolve_api_base(override_value: Option<&str>, origin: Option<&str>) -> String {
    if let Some(value) = override_value.map(str::trim).filter(|value| !value.is_empty()) {
        return value.trim_end_matches('/').to_string();
    }
    let origin = origin
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "null")
        .unwrap_or_default();
    format!("{}{DEFAULT_BASE_PATH}", origin.trim_end_matches('/'))
}
