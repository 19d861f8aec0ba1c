use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregated figures shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Sum of payments received this calendar month
    pub monthly_revenue: Decimal,

    /// Percent change of `monthly_revenue` vs the previous month
    pub monthly_revenue_change: Decimal,

    /// Number of invoices issued this calendar month
    pub total_invoices_this_month: i64,

    /// Outstanding total across sent and overdue invoices
    pub outstanding_total: Decimal,

    /// Number of payments recorded in the last 30 days
    pub recent_payments: i64,
}
