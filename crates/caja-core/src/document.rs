//! # Document Numbers
//!
//! Formatting and parsing for sale document numbers.
//!
//! ## What Is a Document Number?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Document Number                                   │
//! │                                                                         │
//! │   One customer transaction = one receipt = one document number.        │
//! │   A receipt covering three products produces three Sale rows, all      │
//! │   stamped with the SAME document number:                               │
//! │                                                                         │
//! │        sale.id  product     document_number                            │
//! │        ───────  ──────────  ───────────────                            │
//! │          17     Leche 1L      000000042                                │
//! │          18     Pan           000000042                                │
//! │          19     Azúcar 1kg    000000042                                │
//! │                                                                         │
//! │   Storage: INTEGER (42)    •    Wire: "000000042" (9-digit, padded)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numbers are allocated by the database (atomic increment-and-return, see
//! caja-db). This module only converts between the stored integer and the
//! padded string the API exposes.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

use crate::error::{ValidationError, ValidationResult};

/// Width of the padded wire representation.
pub const DOCUMENT_NUMBER_WIDTH: usize = 9;

// =============================================================================
// Formatting
// =============================================================================

/// Renders a document number as the 9-digit zero-padded receipt identifier.
///
/// ## Example
/// ```rust
/// use caja_core::document::format_document_number;
///
/// assert_eq!(format_document_number(42), "000000042");
/// assert_eq!(format_document_number(1), "000000001");
/// ```
///
/// Numbers past 999,999,999 simply widen; nothing truncates.
pub fn format_document_number(number: i64) -> String {
    format!("{number:0width$}", width = DOCUMENT_NUMBER_WIDTH)
}

/// Serde helper: serialize an `i64` document-number field as its padded form.
///
/// Used by the view types so every response renders receipts the way they
/// print: `"document_number": "000000042"`, never a bare `42`.
pub fn serialize_padded<S>(number: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_document_number(*number))
}

/// Serde helper: deserialize a document number from either a JSON integer or
/// a (possibly padded) string.
///
/// The till echoes back whichever form it last saw, so `42` and
/// `"000000042"` must both land as `42`.
pub fn deserialize_document_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct DocumentNumberVisitor;

    impl Visitor<'_> for DocumentNumberVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a document number as an integer or digit string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value).map_err(|_| E::custom("document number out of range"))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
            parse_document_number(value).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(DocumentNumberVisitor)
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a document number from its wire form.
///
/// Accepts both the padded form ("000000042") and a plain integer ("42").
///
/// ## Rules
/// - Must not be empty
/// - Must be all digits (an integer ≥ 1)
///
/// ## Example
/// ```rust
/// use caja_core::document::parse_document_number;
///
/// assert_eq!(parse_document_number("000000042").unwrap(), 42);
/// assert_eq!(parse_document_number("42").unwrap(), 42);
/// assert!(parse_document_number("recibo-42").is_err());
/// ```
pub fn parse_document_number(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "document_number".to_string(),
        });
    }

    let number: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "document_number".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if number < 1 {
        return Err(ValidationError::MustBePositive {
            field: "document_number".to_string(),
        });
    }

    Ok(number)
}

// =============================================================================
// Unit Tests
// =============================================================================
