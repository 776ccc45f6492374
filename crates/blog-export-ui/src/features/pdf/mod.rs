//! PDF export and download feature wiring.
//!
//! # Design
//! - The export form keeps raw date strings and validates only on submit.
//! - Generated PDFs are listed per blog and linked straight to the fetch endpoint.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub(crate) mod view;
