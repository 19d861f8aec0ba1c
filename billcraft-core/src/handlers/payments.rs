use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::payment::{CreatePayment, Payment};
use crate::store;
use crate::AppState;

/// GET /api/payments
pub async fn list_payments(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = store::payments::list_payments(&state.db, user_id).await?;
    Ok(Json(payments))
}

/// POST /api/payments
pub async fn create_payment(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(input): Json<CreatePayment>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = store::payments::create_payment(&state.db, user_id, input)
        .await?
        .ok_or(AppError::NotFound("invoice"))?;
    info!(
        "Recorded payment {} against invoice {} for user {}",
        payment.id, payment.invoice_id, user_id
    );
    Ok((StatusCode::CREATED, Json(payment)))
}

/// DELETE /api/payments/:id
pub async fn delete_payment(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = store::payments::delete_payment(&state.db, user_id, id).await?;
    if !deleted {
        return Err(AppError::NotFound("payment"));
    }
    info!("Deleted payment {} for user {}", id, user_id);
    Ok(StatusCode::NO_CONTENT)
}
