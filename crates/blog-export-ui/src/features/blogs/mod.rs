//! Blog list, add form and detail views.
//!
//! # Design
//! - The list mirrors the store; views re-fetch when a refresh is requested.
//! - The add form validates the URL locally before calling the backend.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub(crate) mod view;
