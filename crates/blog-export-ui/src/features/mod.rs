//! Feature slices grouped by screen area.

pub mod blogs;
pub mod jobs;
pub mod pdf;
#[cfg(target_arch = "wasm32")]
pub(crate) mod session;
