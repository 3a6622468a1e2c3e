// handlers/public/auth/logout.rs - POST /logout handler

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};

use crate::error::ApiError;
use crate::middleware::auth::{clear_session_cookie, extract_session_token};
use crate::state::AppState;

/// Ends the current session, if any, and clears the cookie.
pub async fn logout_post(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = extract_session_token(&headers, &state.config.session.cookie_name) {
        state.session_service().destroy(&token).await?;
        tracing::info!("Session ended");
    }

    Ok((
        [(header::SET_COOKIE, clear_session_cookie(&state.config))],
        Redirect::to("/"),
    )
        .into_response())
}
