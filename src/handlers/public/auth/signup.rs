// handlers/public/auth/signup.rs - GET/POST /signup handlers

use axum::{extract::State, response::{IntoResponse, Redirect, Response}, Form};

use crate::api::Page;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SignupForm;
use crate::state::AppState;

pub async fn signup_get() -> ApiResult<Page> {
    Ok(ApiResponse::success(Page::new("auth/signup")))
}

/// Registers a USER account and sends the browser to the login page.
pub async fn signup_post(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, ApiError> {
    state.account_service().signup(form).await?;
    Ok(Redirect::to("/login").into_response())
}
