use axum::extract::State;
use axum::response::Json;
use axum::Extension;
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::profile::{Profile, UpdateProfile};
use crate::store;
use crate::AppState;

/// GET /api/profile
///
/// Returns the saved profile, or the placeholder defaults if the user
/// has not filled in company settings yet.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Profile>, AppError> {
    let profile = store::profile::get_profile(&state.db, user_id)
        .await?
        .unwrap_or_else(|| Profile::placeholder(user_id));
    Ok(Json(profile))
}

/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(input): Json<UpdateProfile>,
) -> Result<Json<Profile>, AppError> {
    let profile = store::profile::upsert_profile(&state.db, user_id, input).await?;
    info!("Updated profile for user {}", user_id);
    Ok(Json(profile))
}
