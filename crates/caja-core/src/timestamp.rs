//! # Sale Timestamps
//!
//! Normalization of sale timestamps and report dates.
//!
//! ## Why Normalize?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Timestamp Normalization                              │
//! │                                                                         │
//! │   Front ends send whatever their date library produces:                │
//! │                                                                         │
//! │     "2024-03-05T14:30:00.000Z"      (browser toISOString)              │
//! │     "2024-03-05T14:30:00-05:00"     (zoned ISO)                        │
//! │     "2024-03-05 14:30:00"           (already normalized)               │
//! │     "2024-03-05"                    (date picker, no time)             │
//! │                                                                         │
//! │   The sale table stores ONE canonical shape:                           │
//! │                                                                         │
//! │     "2024-03-05 14:30:00"                                              │
//! │                                                                         │
//! │   Daily reports then filter with a plain date-prefix match             │
//! │   (date LIKE '2024-03-05%'), which only works if every stored          │
//! │   value follows the canonical shape.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Zoned inputs keep their face-value wall clock: the offset is dropped after
//! parsing, never applied. This keeps stored values independent of the server
//! timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{ValidationError, ValidationResult};

/// Canonical storage format for sale timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wire format for report dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Sale Timestamp Normalization
// =============================================================================

/// Normalizes a sale timestamp into `YYYY-MM-DD HH:MM:SS`.
///
/// ## Accepted Inputs
/// - RFC 3339 (`2024-03-05T14:30:00Z`, `2024-03-05T14:30:00-05:00`)
/// - ISO without offset (`2024-03-05T14:30:00`, with optional fraction)
/// - Already-canonical (`2024-03-05 14:30:00`)
/// - Date only (`2024-03-05` → midnight)
///
/// ## Example
/// ```rust
/// use caja_core::timestamp::normalize_sale_timestamp;
///
/// assert_eq!(
///     normalize_sale_timestamp("2024-03-05T14:30:00.000Z").unwrap(),
///     "2024-03-05 14:30:00"
/// );
/// assert_eq!(
///     normalize_sale_timestamp("2024-03-05").unwrap(),
///     "2024-03-05 00:00:00"
/// );
/// ```
pub fn normalize_sale_timestamp(raw: &str) -> ValidationResult<String> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "date".to_string(),
        });
    }

    // Zoned ISO: keep the wall clock as written, drop the offset.
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Ok(zoned.naive_local().format(TIMESTAMP_FORMAT).to_string());
    }

    // ISO without offset, fraction optional.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.format(TIMESTAMP_FORMAT).to_string());
    }

    // Already canonical.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Ok(naive.format(TIMESTAMP_FORMAT).to_string());
    }

    // Date only: midnight.
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        // and_hms_opt(0,0,0) is always valid for midnight
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.format(TIMESTAMP_FORMAT).to_string());
        }
    }

    Err(ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: "expected an ISO date or date-time".to_string(),
    })
}

// =============================================================================
// Report Dates
// =============================================================================

/// Validates a report date (`fecha` query parameter).
///
/// ## Rules
/// - Must parse as a real calendar date in `YYYY-MM-DD` form
/// - Returned normalized, ready to use as a date-prefix filter
///
/// ## Example
/// ```rust
/// use caja_core::timestamp::validate_report_date;
///
/// assert_eq!(validate_report_date("2024-03-05").unwrap(), "2024-03-05");
/// assert!(validate_report_date("05-03-2024").is_err());
/// assert!(validate_report_date("2024-02-30").is_err());
/// ```
pub fn validate_report_date(raw: &str) -> ValidationResult<String> {
    let raw = raw.trim();

    let date =
        NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ValidationError::InvalidFormat {
            field: "fecha".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        })?;

    Ok(date.format(DATE_FORMAT).to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
