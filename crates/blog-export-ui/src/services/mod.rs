//! Transport helpers for the backend REST API.

#[cfg(target_arch = "wasm32")]
pub(crate) mod api;
