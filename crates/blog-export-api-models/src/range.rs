//! Date range accepted by the PDF generation endpoint.

use chrono::NaiveDate;
use thiserror::Error;

/// `chrono` format for dates on the wire (`yyyy-MM-dd`).
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation failures for a PDF date range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateRangeError {
    /// A bound was left empty.
    #[error("{field} is required")]
    Missing {
        /// Name of the missing bound.
        field: &'static str,
    },
    /// A bound is not a `yyyy-MM-dd` date.
    #[error("{field} must be a date in yyyy-mm-dd form (got '{value}')")]
    Invalid {
        /// Name of the offending bound.
        field: &'static str,
        /// Raw input.
        value: String,
    },
    /// The start date is after the end date.
    #[error("start date {from} is after end date {to}")]
    Inverted {
        /// Requested start date.
        from: NaiveDate,
        /// Requested end date.
        to: NaiveDate,
    },
}

/// Inclusive date range for PDF generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting inverted bounds.
    ///
    /// # Errors
    /// Returns [`DateRangeError::Inverted`] when `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DateRangeError> {
        if from > to {
            return Err(DateRangeError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// Parse a range from `yyyy-MM-dd` inputs (e.g. HTML date controls).
    ///
    /// # Errors
    /// Returns [`DateRangeError`] when a bound is empty, malformed or the range is inverted.
    pub fn parse(from: &str, to: &str) -> Result<Self, DateRangeError> {
        let from = parse_bound("start date", from)?;
        let to = parse_bound("end date", to)?;
        Self::new(from, to)
    }

    /// First day of the range.
    #[must_use]
    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last day of the range.
    #[must_use]
    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    /// `fromDate`/`toDate` query parameters in wire format.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("fromDate", self.from.format(WIRE_DATE_FORMAT).to_string()),
            ("toDate", self.to.format(WIRE_DATE_FORMAT).to_string()),
        ]
    }
}

fn parse_bound(field: &'static str, value: &str) -> Result<NaiveDate, DateRangeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DateRangeError::Missing { field });
    }
    NaiveDate::parse_from_str(trimmed, WIRE_DATE_FORMAT).map_err(|_| DateRangeError::Invalid {
        field,
        value: trimmed.to_string(),
    })
}
