use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{NewUser, Pet, PetData, Role, SessionRecord, SessionUser, User, UserChanges};
use crate::filter::{DirectFilter, FilterError};

/// Storage failure kinds. Callers branch on the variant, never on driver
/// error codes.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated on '{field}'")]
    UniqueViolation { field: String },

    #[error("Invalid data: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Unknown(String),
}

impl From<FilterError> for RepoError {
    fn from(err: FilterError) -> Self {
        RepoError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => RepoError::UniqueViolation {
                field: unique_field(db_err.constraint()),
            },
            sqlx::Error::Database(db_err) if db_err.is_check_violation() || db_err.is_foreign_key_violation() => {
                RepoError::Validation(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepoError::Unavailable(err.to_string())
            }
            other => RepoError::Unknown(other.to_string()),
        }
    }
}

/// Maps a constraint name such as `users_username_key` to the column it guards.
fn unique_field(constraint: Option<&str>) -> String {
    match constraint {
        Some(name) if name.contains("username") => "username".to_string(),
        Some(name) => name.to_string(),
        None => "unknown".to_string(),
    }
}

#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Pets whose top-level fields equal every entry of `filter`, in store order.
    async fn find_by_filter(&self, filter: &DirectFilter) -> Result<Vec<Pet>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pet>, RepoError>;
    /// Pets for `ids`, in the order of `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Pet>, RepoError>;
    async fn find_by_name(&self, name: &str) -> Result<Vec<Pet>, RepoError>;
    async fn create(&self, data: PetData) -> Result<Pet, RepoError>;
    async fn update(&self, id: Uuid, data: PetData) -> Result<Pet, RepoError>;
    /// Deletes every pet whose id is in `ids`; returns how many went away.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
    async fn list(&self) -> Result<Vec<User>, RepoError>;
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, RepoError>;
    async fn set_role(&self, id: Uuid, role: Role) -> Result<User, RepoError>;
    /// Appends `pet_id` to the user's pets unless already present, atomically.
    async fn append_pet(&self, user_id: Uuid, pet_id: Uuid) -> Result<(), RepoError>;
    /// Removes the first occurrence of `pet_id` from the user's pets, atomically.
    async fn remove_pet(&self, user_id: Uuid, pet_id: Uuid) -> Result<(), RepoError>;
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: SessionRecord) -> Result<(), RepoError>;
    async fn find(&self, token_hash: &str) -> Result<Option<SessionRecord>, RepoError>;
    /// Replaces the user snapshot and pushes the expiry out.
    async fn refresh(&self, token_hash: &str, user: SessionUser, expires_at: DateTime<Utc>) -> Result<(), RepoError>;
    async fn delete(&self, token_hash: &str) -> Result<(), RepoError>;
    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, RepoError>;
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
