//! Environment helpers for the app shell.

use crate::core::config::{API_BASE_KEY, resolve_api_base};
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;

/// API base from the stored override or the page origin.
pub(crate) fn api_base_url() -> String {
    let stored = LocalStorage::get::<String>(API_BASE_KEY).ok();
    let origin = window().location().origin().ok();
    resolve_api_base(stored.as_deref(), origin.as_deref())
}
