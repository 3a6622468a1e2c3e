use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

pub use state::AppState;

/// Full application router over the given state.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .merge(public_routes())
        // Session-protected
        .merge(pets_routes(state.clone()))
        .merge(profile_routes(state.clone()))
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{self, auth};

    Router::new()
        .route("/", get(public::home_get))
        .route("/health", get(public::health_get))
        .route("/signup", get(auth::signup_get).post(auth::signup_post))
        .route("/login", get(auth::login_get).post(auth::login_post))
        .route("/logout", post(auth::logout_post))
}

fn pets_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::pets;

    Router::new()
        .route("/pets", get(pets::pets_list))
        .route("/pets/:id", get(pets::pet_show))
        .route_layer(from_fn_with_state(state, middleware::session_auth_middleware))
}

fn profile_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::profile;

    Router::new()
        .route("/profile", get(profile::profile_show))
        .route("/profile/new-pet", get(profile::new_pet_get).post(profile::new_pet_post))
        .route(
            "/profile/edit",
            get(profile::account_edit_get).post(profile::account_edit_post),
        )
        .route(
            "/profile/delete",
            get(profile::account_delete_get).post(profile::account_delete_post),
        )
        .route("/profile/:id", get(profile::owned_pet_show))
        .route(
            "/profile/:id/edit",
            get(profile::owned_pet_edit_get).post(profile::owned_pet_edit_post),
        )
        .route("/profile/:id/delete", post(profile::owned_pet_delete))
        .route_layer(from_fn_with_state(state, middleware::session_auth_middleware))
}

/// Credentialed CORS for the configured origins; disabled origins yield a
/// layer that adds no headers.
fn cors_layer(config: &config::AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
}
