// handlers/protected/profile/account.rs - /profile/edit and /profile/delete handlers

use axum::{
    extract::{Extension, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tracing::warn;

use crate::api::Page;
use crate::error::ApiError;
use crate::middleware::auth::clear_session_cookie;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::AccountForm;
use crate::state::AppState;

pub async fn account_edit_get(Extension(current): Extension<CurrentUser>) -> ApiResult<Page> {
    Ok(ApiResponse::success(Page::new("user/edit-user").with_user(&current.user)))
}

/// Updates username, email and (when non-blank) password, then refreshes
/// the session snapshot.
pub async fn account_edit_post(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<AccountForm>,
) -> Result<Response, ApiError> {
    let user = state.profile_service().update_account(&current.user, form).await?;
    state.session_service().replace_snapshot(&current.token_hash, &user).await?;
    Ok(Redirect::to("/profile").into_response())
}

pub async fn account_delete_get(Extension(current): Extension<CurrentUser>) -> ApiResult<Page> {
    Ok(ApiResponse::success(Page::new("user/delete-user").with_user(&current.user)))
}

/**
 * POST /profile/delete - Delete the account and every pet it owns
 *
 * Pets and the user record are deleted concurrently. On success all of the
 * user's sessions end, the cookie is cleared and the browser goes to `/`.
 */
pub async fn account_delete_post(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    state.profile_service().delete_user(&current.user).await?;

    // The user is gone, so any surviving session already fails authentication.
    if let Err(e) = state.session_service().destroy_all(current.user.id).await {
        warn!("Sessions of deleted user {} not removed: {}", current.user.id, e);
    }

    Ok((
        [(header::SET_COOKIE, clear_session_cookie(&state.config))],
        Redirect::to("/"),
    )
        .into_response())
}
