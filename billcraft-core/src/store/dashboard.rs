use chrono::{Datelike, Days, Months, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::dashboard::DashboardMetrics;

/// Computes the dashboard aggregates for a user.
///
/// Month boundaries are calendar months in UTC; "recent" payments are
/// the trailing 30 days.
pub async fn dashboard_metrics(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<DashboardMetrics, sqlx::Error> {
    let today = Utc::now().date_naive();
    let month_start = today.with_day(1).unwrap_or(today);
    let prev_month_start = month_start
        .checked_sub_months(Months::new(1))
        .unwrap_or(month_start);
    let recent_cutoff = today.checked_sub_days(Days::new(30)).unwrap_or(today);

    let monthly_revenue: Option<Decimal> = sqlx::query_scalar(
        "SELECT SUM(amount) FROM payments WHERE user_id = $1 AND payment_date >= $2",
    )
    .bind(user_id)
    .bind(month_start)
    .fetch_one(pool)
    .await?;
    let monthly_revenue = monthly_revenue.unwrap_or(Decimal::ZERO);

    let previous_revenue: Option<Decimal> = sqlx::query_scalar(
        "SELECT SUM(amount) FROM payments WHERE user_id = $1 AND payment_date >= $2 AND payment_date < $3",
    )
    .bind(user_id)
    .bind(prev_month_start)
    .bind(month_start)
    .fetch_one(pool)
    .await?;
    let previous_revenue = previous_revenue.unwrap_or(Decimal::ZERO);

    let monthly_revenue_change = if previous_revenue.is_zero() {
        Decimal::ZERO
    } else {
        (monthly_revenue - previous_revenue) / previous_revenue * Decimal::ONE_HUNDRED
    };

    let total_invoices_this_month: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM invoices WHERE user_id = $1 AND issue_date >= $2",
    )
    .bind(user_id)
    .bind(month_start)
    .fetch_one(pool)
    .await?;

    let outstanding_total: Option<Decimal> = sqlx::query_scalar(
        "SELECT SUM(total_amount) FROM invoices WHERE user_id = $1 AND status IN ('sent', 'overdue')",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let recent_payments: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM payments WHERE user_id = $1 AND payment_date >= $2",
    )
    .bind(user_id)
    .bind(recent_cutoff)
    .fetch_one(pool)
    .await?;

    Ok(DashboardMetrics {
        monthly_revenue,
        monthly_revenue_change,
        total_invoices_this_month,
        outstanding_total: outstanding_total.unwrap_or(Decimal::ZERO),
        recent_payments,
    })
}
