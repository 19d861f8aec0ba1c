use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Company profile and application settings for a user.
///
/// Single source of truth for the issuer block on rendered invoices
/// and for the tax-rate/currency defaults the invoice form starts
/// from. One row per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// ID of the user this profile belongs to
    pub user_id: Uuid,

    /// Company name printed on invoices
    pub company_name: String,

    /// Company address; may span multiple lines
    pub company_address: String,

    pub company_email: Option<String>,
    pub company_phone: Option<String>,

    /// Tax registration number
    pub tax_id: Option<String>,

    /// Free-text bank details printed on invoices
    pub bank_details: Option<String>,

    /// ISO 4217 currency code
    pub default_currency: String,

    /// Default global tax rate as a fraction for new invoices
    pub default_tax_rate: Decimal,

    /// Default payment terms in days
    pub default_payment_terms: i32,

    /// Timestamp when the profile was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the profile was last updated
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Placeholder profile used until the user fills in their company
    /// settings, so rendering and form defaults still work.
    pub fn placeholder(user_id: Uuid) -> Self {
        let now = Utc::now();
        Profile {
            user_id,
            company_name: "Your Company Name".to_string(),
            company_address: "123 Business St\nYour City, ST 12345".to_string(),
            company_email: Some("info@yourcompany.com".to_string()),
            company_phone: Some("(555) 123-4567".to_string()),
            tax_id: None,
            bank_details: None,
            default_currency: "USD".to_string(),
            default_tax_rate: Decimal::new(8, 2),
            default_payment_terms: 30,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Profile update request (also used for first-time creation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub tax_id: Option<String>,
    pub bank_details: Option<String>,
    pub default_currency: Option<String>,
    pub default_tax_rate: Option<Decimal>,
    pub default_payment_terms: Option<i32>,
}
