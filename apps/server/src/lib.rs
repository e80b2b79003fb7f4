//! # Caja POS Server
//!
//! HTTP backend for the Caja point-of-sale system.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Caja POS Server                                 │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /branch       │  │  /user         │  │  /client                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • addbranch    │  │ • adduser      │  │ • addclient                ││
//! │  │ • allbranches  │  │ • allusers     │  │ • allclients / search      ││
//! │  │ • update       │  │ • update       │  │ • update                   ││
//! │  │ • disable /    │  │ • disable /    │  │ • apicliente/:documento    ││
//! │  │   activate     │  │   activate     │  │   (local + RENIEC)         ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /product      │  │  /sale         │  │  /report                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • addproduct   │  │ • registrar-   │  │ • ventas-del-dia?fecha=    ││
//! │  │ • allproducts  │  │   venta        │  │ • eliminar_venta/:numero   ││
//! │  │ • update       │  │ • detallesVenta│  │                            ││
//! │  │ • per-branch   │  │ • total-ventas │  │                            ││
//! │  │   pricing      │  │ • last-doc-num │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  caja-db     │  │ RetryPolicy  │  │  ReniecClient            ││  │
//! │  │  │              │  │              │  │                          ││  │
//! │  │  │ SQLite pool  │  │ Transient    │  │ External document        ││  │
//! │  │  │ repositories │  │ failures only│  │ lookup (optional)        ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PORT` - HTTP listen port (default: 3000)
//! - `DATABASE_PATH` - SQLite database file (default: ./data/caja.db)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `RETRY_MAX_ATTEMPTS` - Attempt ceiling for transient DB failures (default: 3)
//! - `RETRY_DELAY_MS` - Pause between attempts (default: 2000)
//! - `RENIEC_API_URL` - Base URL of the document lookup API
//! - `RENIEC_API_TOKEN` - Bearer token; lookups stay local when unset

pub mod auth;
pub mod config;
pub mod error;
pub mod reniec;
pub mod retry;
pub mod routes;
pub mod state;

// Re-exports
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
