use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Payment model representing money received against an invoice.
///
/// Flat record with no derived fields; the core consumes payments only
/// as read-only history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    /// Unique identifier for the payment
    pub id: Uuid,

    /// ID of the user who owns this payment
    pub user_id: Uuid,

    /// Invoice this payment applies to
    pub invoice_id: Uuid,

    /// Amount received
    pub amount: Decimal,

    /// Date the payment was made
    pub payment_date: NaiveDate,

    /// Free-form method label, e.g. "bank transfer"
    pub payment_method: String,

    pub notes: Option<String>,

    /// Timestamp when the payment was recorded
    pub created_at: DateTime<Utc>,
}

/// Payment creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub notes: Option<String>,
}
