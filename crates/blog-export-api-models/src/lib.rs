#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions)]
//! Shared HTTP DTOs for the Blog Export API.
//!
//! These types are re-used by the web UI and the CLI for response decoding so
//! both clients agree on the contract exposed by the export backend. Field
//! names follow the backend's camelCase JSON.

pub mod paths;
pub mod range;
pub mod sse;

use serde::{Deserialize, Serialize};

pub use range::{DateRange, DateRangeError, WIRE_DATE_FORMAT};

/// Prefix every finished job status starts with.
pub const COMPLETED_STATUS_PREFIX: &str = "Completed";

/// Blog tracked by the backend for export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlogDto {
    /// Backend identifier (absent on freshly submitted blogs).
    #[serde(default)]
    pub id: Option<String>,
    /// Source URL of the blog.
    #[serde(default)]
    pub url: Option<String>,
    /// Display name resolved by the backend crawler.
    #[serde(default)]
    pub name: Option<String>,
    /// Last download date formatted by the backend (`dd MMM yyyy`), empty when never downloaded.
    #[serde(default)]
    pub last_download: String,
}

impl BlogDto {
    /// Best label for the blog: the name, then the URL, then a placeholder.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.url.as_deref().filter(|url| !url.trim().is_empty()))
            .unwrap_or("(unnamed)")
    }

    /// Whether the backend has recorded at least one completed download.
    #[must_use]
    pub fn has_downloaded(&self) -> bool {
        !self.last_download.trim().is_empty()
    }
}

/// Signed-in user as reported by the backend session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Account e-mail, also the backend user key.
    #[serde(default)]
    pub email: String,
}

impl UserDto {
    /// Full name with empty parts skipped.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Progress event emitted on the download and PDF generation streams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadStatusEvent {
    /// Human-readable job status.
    pub status: String,
}

impl ReadStatusEvent {
    /// Whether this status marks the end of the job.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.starts_with(COMPLETED_STATUS_PREFIX)
    }
}

/// Backend jobs reported over server-sent events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Crawl and store a blog's posts, comments and images.
    Download,
    /// Render a date range of a blog into a PDF.
    GeneratePdf,
}

impl JobKind {
    /// Prefix used when logging a failed job.
    #[must_use]
    pub const fn failure_label(self) -> &'static str {
        match self {
            Self::Download => "Failed downloading blog",
            Self::GeneratePdf => "Failed creating pdf",
        }
    }

    /// Short label for progress output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::GeneratePdf => "generate",
        }
    }
}

/// Generated PDF entry returned by the list-downloads endpoint.
///
/// The backend returns storage keys which may carry a folder prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PdfDownload {
    /// Storage key as returned by the backend.
    pub key: String,
}

impl PdfDownload {
    /// Wrap a storage key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// File name used for display and for the PDF fetch endpoint.
    ///
    /// Empty when the key names a folder (trailing `/`).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or_default()
    }
}

/// PDF layout choices offered by the export form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfTemplate {
    /// Images floated left with text wrapping around them.
    #[default]
    LeftWrapImages,
}

impl PdfTemplate {
    /// Every selectable template, in menu order.
    #[must_use]
    pub const fn all() -> [Self; 1] {
        [Self::LeftWrapImages]
    }

    /// Numeric value used by the select control.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::LeftWrapImages => 1,
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LeftWrapImages => "Left Wrap Images",
        }
    }

    /// Resolve a select control value.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|template| template.value().to_string() == value.trim())
    }
}
