use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::client::{Client, CreateClient, UpdateClient};
use crate::store;
use crate::AppState;

/// GET /api/clients
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = store::clients::list_clients(&state.db, user_id).await?;
    Ok(Json(clients))
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(input): Json<CreateClient>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let client = store::clients::create_client(&state.db, user_id, input).await?;
    info!("Created client {} for user {}", client.id, user_id);
    Ok((StatusCode::CREATED, Json(client)))
}

/// PUT /api/clients/:id
pub async fn update_client(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateClient>,
) -> Result<Json<Client>, AppError> {
    let client = store::clients::update_client(&state.db, user_id, id, input)
        .await?
        .ok_or(AppError::NotFound("client"))?;
    Ok(Json(client))
}

/// DELETE /api/clients/:id
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = store::clients::delete_client(&state.db, user_id, id).await?;
    if !deleted {
        return Err(AppError::NotFound("client"));
    }
    info!("Deleted client {} for user {}", id, user_id);
    Ok(StatusCode::NO_CONTENT)
}
