use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{HealthCheck, MemoryStore, PetRepository, PgStore, SessionStore, UserRepository};
use crate::services::{AccountService, ProfileService, SessionService};

/// Shared handler state. Every store sits behind a trait object so the same
/// router runs on Postgres or on the in-process store.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub pets: Arc<dyn PetRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub health: Arc<dyn HealthCheck>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn memory(config: AppConfig) -> Self {
        Self::from_store(Arc::new(MemoryStore::new()), config)
    }

    pub fn postgres(pool: PgPool, config: AppConfig) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool)), config)
    }

    fn from_store<S>(store: Arc<S>, config: AppConfig) -> Self
    where
        S: UserRepository + PetRepository + SessionStore + HealthCheck + 'static,
    {
        Self {
            users: store.clone(),
            pets: store.clone(),
            sessions: store.clone(),
            health: store,
            config: Arc::new(config),
        }
    }

    pub fn account_service(&self) -> AccountService {
        AccountService::new(
            self.users.clone(),
            self.config.security.bcrypt_cost,
            self.config.security.min_password_length,
        )
    }

    pub fn profile_service(&self) -> ProfileService {
        ProfileService::new(self.users.clone(), self.pets.clone(), self.config.security.bcrypt_cost)
    }

    pub fn session_service(&self) -> SessionService {
        SessionService::new(self.sessions.clone(), self.users.clone(), self.config.session.max_age_secs)
    }
}
