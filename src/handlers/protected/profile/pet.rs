// handlers/protected/profile/pet.rs - owner-scoped pet handlers under /profile

use axum::{
    extract::{Extension, Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::api::Page;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::PetForm;
use crate::state::AppState;

pub async fn new_pet_get(Extension(current): Extension<CurrentUser>) -> ApiResult<Page> {
    Ok(ApiResponse::success(Page::new("user/new-pet").with_user(&current.user)))
}

/// Creates a pet and links it to the current user.
pub async fn new_pet_post(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<PetForm>,
) -> Result<Response, ApiError> {
    let data = form.into_data()?;
    let user = state.profile_service().add_pet(&current.user, data).await?;
    state.session_service().replace_snapshot(&current.token_hash, &user).await?;
    Ok(Redirect::to("/profile").into_response())
}

pub async fn owned_pet_show(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Page> {
    let pet = state.profile_service().owned_pet(&current.user, &id).await?;
    Ok(ApiResponse::success(
        Page::new("user/pet-details")
            .with_user(&current.user)
            .with("pet", pet),
    ))
}

pub async fn owned_pet_edit_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Page> {
    let pet = state.profile_service().owned_pet(&current.user, &id).await?;
    Ok(ApiResponse::success(
        Page::new("user/edit-pet")
            .with_user(&current.user)
            .with("pet", pet),
    ))
}

/// Replaces every field of an owned pet. Ownership is checked before the
/// form is looked at.
pub async fn owned_pet_edit_post(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<PetForm>,
) -> Result<Response, ApiError> {
    let profile = state.profile_service();
    profile.owned_pet(&current.user, &id).await?;
    profile.update_pet(&current.user, &id, form.into_data()?).await?;
    Ok(Redirect::to("/profile").into_response())
}

/// Unlinks and deletes an owned pet.
pub async fn owned_pet_delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = state.profile_service().remove_pet(&current.user, &id).await?;
    state.session_service().replace_snapshot(&current.token_hash, &user).await?;
    Ok(Redirect::to("/profile").into_response())
}
