//! Backend job tracking (blog downloads and PDF generation).
//!
//! # Design
//! - Jobs report progress over SSE; the stream runner lives in the app layer.
//! - State transitions are pure so they can be tested natively.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub(crate) mod view;
