use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Client model representing a billable customer.
///
/// This struct maps to the `clients` table. The address fields beyond
/// `address` are optional; the PDF renderer only prints the ones that
/// are present.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    /// Unique identifier for the client
    pub id: Uuid,

    /// ID of the user who owns this client
    pub user_id: Uuid,

    /// Client or company name
    pub name: String,

    /// Contact email address
    pub email: String,

    /// Street address
    pub address: String,

    /// Contact phone number
    pub phone: Option<String>,

    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,

    /// Timestamp when the client was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the client was last updated
    pub updated_at: DateTime<Utc>,
}

/// Client creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Client update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}
