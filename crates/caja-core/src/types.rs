//! # Domain Types
//!
//! Core domain types used throughout Caja POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Entity rows (SELECT → FromRow → Serialize)                            │
//! │  ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌──────────┐ │
//! │  │  Branch   │ │   User    │ │  Client   │ │  Product  │ │   Sale   │ │
//! │  │  id       │ │  id       │ │  id       │ │  id       │ │  id      │ │
//! │  │  name     │ │  username │ │  name     │ │  name     │ │  doc#    │ │
//! │  │  state    │ │  role     │ │  document │ │  code     │ │  total   │ │
//! │  └───────────┘ └───────────┘ └───────────┘ └───────────┘ └──────────┘ │
//! │                     ▲                                                   │
//! │                     │ no password field - hashes never leave caja-db   │
//! │                                                                         │
//! │  Join views (reports, listings, receipts)                              │
//! │  ┌────────────────┐ ┌────────────────┐ ┌─────────────────────────┐    │
//! │  │ ProductListing │ │ SaleDetailLine │ │ DailySaleSummary        │    │
//! │  │ product×branch │ │ receipt lines  │ │ one row per document#   │    │
//! │  └────────────────┘ └────────────────┘ └─────────────────────────┘    │
//! │                                                                         │
//! │  Request payloads (Deserialize, Option fields = partial update)        │
//! │  NewBranch, BranchUpdate, NewUser, UserUpdate, NewClient, ...          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Fidelity
//! The HTTP contract predates this codebase: Spanish field names
//! (`cantidad_producto`, `numero_documento`, `usuario`), camelCase payload
//! keys (`branchId`, `stockQuantity`), and the two state spellings
//! (`disabled` for branches, `disable` for users and product availability)
//! are all load-bearing. Serde and sqlx renames keep the Rust side idiomatic
//! without moving the wire.

use serde::{Deserialize, Serialize};

use crate::document::{deserialize_document_number, serialize_padded};

// =============================================================================
// State Enums
// =============================================================================

/// Soft-delete state for a branch.
///
/// Transitions only `active ↔ disabled`; rows are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum BranchState {
    Active,
    Disabled,
}

impl Default for BranchState {
    fn default() -> Self {
        BranchState::Active
    }
}

/// Soft-delete state for users and per-branch product availability.
///
/// The legacy schema spells the inactive value `disable` (no trailing `d`)
/// for these tables, unlike branches. Stored values must not change, so the
/// variant renames preserve the historical spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    Active,
    Disable,
}

impl Default for RecordState {
    fn default() -> Self {
        RecordState::Active
    }
}

// =============================================================================
// Branch
// =============================================================================

/// A store branch.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub manager: Option<String>,
    pub phone: Option<String>,
    pub state: BranchState,
}

// =============================================================================
// User
// =============================================================================

/// A system user (cashier, manager, admin).
///
/// Deliberately has no password field: credential material stays inside
/// caja-db and is verified at the API layer, never serialized.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub state: RecordState,
}

// =============================================================================
// Client
// =============================================================================

/// A customer. `document` is the national identity number used for the
/// external lookup; `points` accumulate loyalty balance.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub points: i64,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog. Pricing and stock live per-branch on
/// [`ProductBranch`].
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,
}

/// Per-branch pricing, stock, and availability for a product.
///
/// Composite key (product_id, branch_id). `stock_quantity` is expected to
/// stay ≥ 0 but the schema does not enforce it; an oversell drives it
/// negative rather than failing the sale.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductBranch {
    pub product_id: i64,
    pub branch_id: i64,
    pub price: f64,
    pub stock_quantity: i64,
    pub state: RecordState,
}

// =============================================================================
// Sale
// =============================================================================

/// One sale line item. Rows sharing a `document_number` form one receipt.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub client_id: i64,
    pub user_id: i64,
    pub branch_id: i64,
    pub product_id: i64,
    #[serde(serialize_with = "serialize_padded")]
    pub document_number: i64,
    #[serde(rename = "cantidad_producto")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "cantidad_producto"))]
    pub quantity: i64,
    pub total: f64,
    /// Canonical `YYYY-MM-DD HH:MM:SS` (see [`crate::timestamp`]).
    pub date: String,
    pub payment_method: Option<String>,
    pub print_count: i64,
}

/// Validated input for registering one sale line item.
///
/// Built by the API layer after validation and timestamp normalization;
/// the repository inserts it verbatim.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub client_id: i64,
    pub user_id: i64,
    pub branch_id: i64,
    pub product_id: i64,
    pub document_number: i64,
    pub quantity: i64,
    pub total: f64,
    /// Already normalized to `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
    pub payment_method: Option<String>,
}

// =============================================================================
// Join Views
// =============================================================================

/// One row of the product listing: a product joined with its per-branch
/// pricing and the branch it is stocked in.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductListing {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub stock_quantity: i64,
    pub price: f64,
    pub state: RecordState,
    pub branch_id: i64,
    pub branch_name: String,
}

/// One receipt line for the sale detail view. Spanish field names are the
/// wire contract.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleDetailLine {
    pub producto: String,
    pub precio: f64,
    pub cantidad: i64,
    #[serde(serialize_with = "serialize_padded")]
    pub numero_documento: i64,
    pub subtotal: f64,
}

/// One receipt line for the print view.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalePrintLine {
    #[serde(serialize_with = "serialize_padded")]
    pub document_number: i64,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

/// One aggregated row of the daily sales report: a whole receipt collapsed
/// to its total, earliest line timestamp, cashier, and customer.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DailySaleSummary {
    pub usuario: String,
    pub cliente: String,
    #[serde(serialize_with = "serialize_padded")]
    pub numero_documento: i64,
    pub primer_fecha: String,
    pub total_venta: f64,
    pub payment_method: Option<String>,
}

// =============================================================================
// Request Payloads
// =============================================================================

/// Body of `POST /branch/addbranch`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBranch {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `PUT /branch/:id`. Absent fields leave columns unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `POST /user/adduser`. The password arrives in clear and is
/// hashed before it ever reaches a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of `PUT /user/:id`. A present, non-empty password is re-hashed;
/// anything else leaves the stored hash untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of `POST /client/addclient`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `PUT /client/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
}

/// Body of `POST /product/addproduct`. `branchId` names the branch that
/// gets the initial [`ProductBranch`] row, priced at `price` with stock 0.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "branchId")]
    pub branch_id: i64,
    pub price: f64,
}

/// Body of `PUT /product/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Body of `PUT /product/:productId/branch/:branchId`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingUpdate {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, rename = "stockQuantity")]
    pub stock_quantity: Option<i64>,
}

/// Body of `POST /sale/registrar-venta`.
///
/// `document_number` is accepted either as an integer or as the padded
/// string the number generator hands out, since the till posts back
/// whichever form it last saw.
#[derive(Debug, Clone, Deserialize)]
pub struct SalePayload {
    pub client_id: i64,
    pub user_id: i64,
    pub branch_id: i64,
    pub product_id: i64,
    #[serde(deserialize_with = "deserialize_document_number")]
    pub document_number: i64,
    pub cantidad_producto: i64,
    pub total: f64,
    pub date: String,
    #[serde(default)]
    pub payment_method: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serialization_spellings() {
        // branch: active/disabled
        assert_eq!(
            serde_json::to_string(&BranchState::Disabled).unwrap(),
            "\"disabled\""
        );
        // user/product_branch: active/disable (legacy spelling, no trailing d)
        assert_eq!(
            serde_json::to_string(&RecordState::Disable).unwrap(),
            "\"disable\""
        );
        assert_eq!(
            serde_json::to_string(&RecordState::Active).unwrap(),
            "\"active\""
        );
    }

    #[test]
    fn test_sale_serializes_quantity_as_cantidad_producto() {
        let sale = Sale {
            id: 1,
            client_id: 1,
            user_id: 1,
            branch_id: 1,
            product_id: 1,
            document_number: 42,
            quantity: 3,
            total: 12.5,
            date: "2024-03-05 14:30:00".to_string(),
            payment_method: Some("efectivo".to_string()),
            print_count: 0,
        };
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["cantidad_producto"], 3);
        assert_eq!(json["document_number"], "000000042");
        assert!(json.get("quantity").is_none());
    }

    #[test]
    fn test_detail_line_pads_document_number() {
        let line = SaleDetailLine {
            producto: "Leche 1L".to_string(),
            precio: 4.5,
            cantidad: 2,
            numero_documento: 7,
            subtotal: 9.0,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["numero_documento"], "000000007");
    }

    #[test]
    fn test_partial_update_payloads_default_to_no_changes() {
        let update: BranchUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.name.is_none());
        assert!(update.phone.is_none());

        let update: PricingUpdate =
            serde_json::from_str(r#"{"stockQuantity": 10}"#).unwrap();
        assert_eq!(update.stock_quantity, Some(10));
        assert!(update.price.is_none());
    }

    #[test]
    fn test_new_product_accepts_camel_case_branch_id() {
        let payload: NewProduct =
            serde_json::from_str(r#"{"name":"Pan","branchId":2,"price":1.2}"#).unwrap();
        assert_eq!(payload.branch_id, 2);
        assert_eq!(payload.price, 1.2);
        assert!(payload.code.is_none());
    }

    #[test]
    fn test_sale_payload_accepts_padded_document_number() {
        let payload: SalePayload = serde_json::from_str(
            r#"{
                "client_id": 1,
                "user_id": 2,
                "branch_id": 1,
                "product_id": 5,
                "document_number": "000000042",
                "cantidad_producto": 3,
                "total": 10.5,
                "date": "2024-03-05T14:30:00"
            }"#,
        )
        .unwrap();
        assert_eq!(payload.document_number, 42);
        assert_eq!(payload.cantidad_producto, 3);
        assert!(payload.payment_method.is_none());
    }

    #[test]
    fn test_daily_summary_uses_report_column_names() {
        let row = DailySaleSummary {
            usuario: "lucia".to_string(),
            cliente: "CLIENTE VARIOS".to_string(),
            numero_documento: 41,
            primer_fecha: "2024-03-05 09:12:00".to_string(),
            total_venta: 55.0,
            payment_method: Some("efectivo".to_string()),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["numero_documento"], "000000041");
        assert_eq!(json["total_venta"], 55.0);
        assert_eq!(json["usuario"], "lucia");
    }

    #[test]
    fn test_user_row_has_no_password_key() {
        let user = User {
            id: 9,
            username: "lucia".to_string(),
            role: "cajera".to_string(),
            state: RecordState::Active,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["state"], "active");
    }
}
