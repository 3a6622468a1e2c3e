// handlers/public/mod.rs - Public handlers (no session required)

pub mod auth;
pub mod health;
pub mod home;

pub use auth::*;
pub use health::health_get;
pub use home::home_get;
