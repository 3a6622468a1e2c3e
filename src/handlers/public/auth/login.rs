// handlers/public/auth/login.rs - GET/POST /login handlers

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::api::Page;
use crate::error::ApiError;
use crate::middleware::auth::session_cookie;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::LoginForm;
use crate::state::AppState;

pub async fn login_get() -> ApiResult<Page> {
    Ok(ApiResponse::success(Page::new("auth/login")))
}

/**
 * POST /login - Verify credentials and start a session
 *
 * Form fields: `username`, `password`.
 * On success the session token is set in the session cookie and the
 * browser is redirected (303) to `/profile`. Wrong credentials answer 401.
 */
pub async fn login_post(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let user = state.account_service().login(form).await?;
    let token = state.session_service().issue(&user).await?;

    Ok((
        [(header::SET_COOKIE, session_cookie(&state.config, &token.token))],
        Redirect::to("/profile"),
    )
        .into_response())
}
