//! # caja-core: Pure Business Logic for Caja POS
//!
//! This crate is the **heart** of Caja POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caja POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP Clients (front desk)                    │   │
//! │  │    Branch UI ──► Sales UI ──► Reports UI ──► Admin UI          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  │    route handlers, retry policy, auth, external lookup          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ document  │  │ timestamp │  │ validation│  │   │
//! │  │   │  Branch   │  │  9-digit  │  │ normalize │  │   rules   │  │   │
//! │  │   │   Sale    │  │  numbers  │  │  parsing  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    caja-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Branch, User, Client, Product, Sale, views)
//! - [`document`] - Document-number formatting and parsing
//! - [`timestamp`] - Sale timestamp normalization and report dates
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::document::{format_document_number, parse_document_number};
//!
//! // Receipts carry 9-digit zero-padded numbers
//! assert_eq!(format_document_number(42), "000000042");
//!
//! // Parsing accepts the padded form back
//! assert_eq!(parse_document_number("000000042").unwrap(), 42);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod timestamp;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use caja_core::ValidationError` instead of
// `use caja_core::error::ValidationError`

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Client row the liveness probe reads.
///
/// ## Why a constant?
/// `GET /keep-alive` doubles as a smoke test of the database path: it reads
/// one well-known client row and echoes its name. Row 1 is seeded as the
/// walk-in customer on every installation.
pub const KEEP_ALIVE_CLIENT_ID: i64 = 1;

/// Maximum length accepted for client search queries.
///
/// ## Business Reason
/// Search input comes straight from a text box; capping it keeps LIKE
/// patterns bounded. Longer input is a typo or a paste accident, not a query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;
