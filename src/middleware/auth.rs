use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::config::AppConfig;
use crate::database::models::User;
use crate::error::ApiError;
use crate::services::Authenticated;
use crate::state::AppState;

/// The authenticated user for this request, freshly loaded from the user store.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: User,
    /// Key of the session the request came in on, for snapshot updates.
    pub token_hash: String,
}

impl From<Authenticated> for CurrentUser {
    fn from(auth: Authenticated) -> Self {
        Self {
            user: auth.user,
            token_hash: auth.token_hash,
        }
    }
}

/// Session authentication middleware. Requests without a live session are
/// redirected to the login page; others get a `CurrentUser` extension.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_session_token(&headers, &state.config.session.cookie_name) else {
        debug!("No session cookie on {}", request.uri().path());
        return Redirect::to("/login").into_response();
    };

    match state.session_service().authenticate(&token).await {
        Ok(Some(auth)) => {
            request.extensions_mut().insert(CurrentUser::from(auth));
            next.run(request).await
        }
        Ok(None) => {
            debug!("Stale session cookie on {}", request.uri().path());
            (
                [(header::SET_COOKIE, clear_session_cookie(&state.config))],
                Redirect::to("/login"),
            )
                .into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Extract the session token from the Cookie header(s)
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}

/// `Set-Cookie` value carrying a new session token.
pub fn session_cookie(config: &AppConfig, token: &str) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; {}",
        config.session.cookie_name,
        token,
        config.session.max_age_secs,
        same_site(config)
    )
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie(config: &AppConfig) -> String {
    format!(
        "{}=; HttpOnly; Path=/; Max-Age=0; {}",
        config.session.cookie_name,
        same_site(config)
    )
}

fn same_site(config: &AppConfig) -> &'static str {
    if config.session.secure_cookie {
        "SameSite=None; Secure"
    } else {
        "SameSite=Lax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_the_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; sid=abc123; lang=en"));
        assert_eq!(extract_session_token(&headers, "sid").as_deref(), Some("abc123"));
        assert_eq!(extract_session_token(&headers, "other"), None);
    }

    #[test]
    fn empty_cookie_value_is_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sid="));
        assert_eq!(extract_session_token(&headers, "sid"), None);
    }

    #[test]
    fn cookie_attributes_follow_environment() {
        let dev = AppConfig::development();
        let cookie = session_cookie(&dev, "tok");
        assert_eq!(cookie, "sid=tok; HttpOnly; Path=/; Max-Age=600; SameSite=Lax");

        let prod = AppConfig::production();
        assert!(session_cookie(&prod, "tok").ends_with("SameSite=None; Secure"));
        assert!(clear_session_cookie(&prod).contains("Max-Age=0"));
    }
}
