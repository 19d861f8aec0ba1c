use axum::extract::State;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::dashboard::DashboardMetrics;
use crate::store;
use crate::AppState;

/// GET /api/dashboard/metrics
pub async fn get_metrics(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<DashboardMetrics>, AppError> {
    let metrics = store::dashboard::dashboard_metrics(&state.db, user_id).await?;
    Ok(Json(metrics))
}
