use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Client;

/// Invoice status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[sqlx(rename = "draft")]
    Draft,
    #[sqlx(rename = "sent")]
    Sent,
    #[sqlx(rename = "paid")]
    Paid,
    #[sqlx(rename = "overdue")]
    Overdue,
}

/// Invoice model representing a persisted invoice.
///
/// This struct maps to the `invoices` table. The four stored totals
/// (`subtotal`, `line_discount_total`, `tax_amount`, `total_amount`)
/// are always recomputed by the calculator from the submitted line
/// items before persisting; clients never supply them directly.
///
/// `client_id` is a weak reference: an invoice draft may exist without
/// a client selected, but PDF rendering requires one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    /// Unique identifier for the invoice
    pub id: Uuid,

    /// ID of the user who owns this invoice
    pub user_id: Uuid,

    /// The billed client, if one has been selected
    pub client_id: Option<Uuid>,

    /// Invoice number (unique per user)
    pub invoice_number: String,

    /// Optional customer reference number
    pub reference_number: Option<String>,

    /// Date when the invoice was issued
    pub issue_date: NaiveDate,

    /// Due date for payment. No ordering relative to `issue_date` is
    /// enforced anywhere.
    pub due_date: NaiveDate,

    /// Invoice status
    pub status: InvoiceStatus,

    /// Global tax rate as a fraction, applied after per-line discounts
    pub tax_rate: Decimal,

    /// Flat discount amount, subtracted after tax
    pub additional_discount: Decimal,

    /// Sum of raw line amounts, before any discount
    pub subtotal: Decimal,

    /// Sum of per-line discount amounts
    pub line_discount_total: Decimal,

    /// Tax on the post-line-discount subtotal
    pub tax_amount: Decimal,

    /// Final payable amount
    pub total_amount: Decimal,

    /// Free-text notes printed on the invoice
    pub notes: Option<String>,

    /// Free-text payment terms printed on the invoice
    pub terms: Option<String>,

    /// Timestamp when the invoice was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the invoice was last updated
    pub updated_at: DateTime<Utc>,
}

/// One billable row of an invoice.
///
/// `unit_price` is nullable: `None` means "not yet entered" and is
/// treated as zero for arithmetic but preserved for display/editing.
/// `line_total` is derived, never independently settable. `sort_order`
/// is the display and print order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Option<Decimal>,
    /// Per-line discount as a fraction in [0,1] (not enforced)
    pub discount_rate: Decimal,
    /// Derived: `quantity * (unit_price ?? 0) * (1 - discount_rate)`
    pub line_total: Decimal,
    pub sort_order: i32,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

fn default_unit() -> String {
    "pcs".to_string()
}

/// Line item as submitted by the editing form.
///
/// Defaults mirror a freshly added row: quantity 1, unit "pcs", no
/// price, no discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItemInput {
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub discount_rate: Decimal,
}

/// Invoice creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub client_id: Option<Uuid>,
    pub invoice_number: String,
    pub reference_number: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub additional_discount: Decimal,
    pub notes: Option<String>,
    pub terms: Option<String>,
    pub items: Vec<InvoiceItemInput>,
}

/// Invoice update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInvoice {
    pub client_id: Option<Uuid>,
    pub invoice_number: Option<String>,
    pub reference_number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub tax_rate: Option<Decimal>,
    pub additional_discount: Option<Decimal>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    /// When present, replaces the full item set
    pub items: Option<Vec<InvoiceItemInput>>,
}

/// Invoice response (invoice plus its line items and client)
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
    pub client: Option<Client>,
}
