//! # Repository Module
//!
//! Database repository implementations for Caja POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list_all()                                      │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list_all(&self)                                                   │
//! │  ├── create_with_branch(&self, product, branch_id)                     │
//! │  ├── update_pricing(&self, product_id, branch_id, changes)             │
//! │  └── set_branch_state(&self, product_id, branch_id, state)             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! │  • Multi-statement flows own their transactions                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BranchRepository`] - Branch CRUD and state toggling
//! - [`UserRepository`] - User accounts and credential lookup
//! - [`ClientRepository`] - Client CRUD and document/name search
//! - [`ProductRepository`] - Product catalog and per-branch inventory
//! - [`SaleRepository`] - Sale registration, reversal and reporting

pub mod branch;
pub mod client;
pub mod product;
pub mod sale;
pub mod user;

pub use branch::BranchRepository;
pub use client::ClientRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;
pub use user::UserRepository;
