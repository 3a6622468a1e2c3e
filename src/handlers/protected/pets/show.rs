// handlers/protected/pets/show.rs - GET /pets/:id handler

use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::api::Page;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// Pet detail for any signed-in user; `isMod` tells the view whether to
/// show moderation controls.
pub async fn pet_show(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Page> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found("Pet not found"))?;
    let pet = state
        .pets
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pet not found"))?;

    Ok(ApiResponse::success(
        Page::new("pets/pet-details")
            .with("pet", pet)
            .with_user(&current.user)
            .with("isMod", current.user.is_mod()),
    ))
}
