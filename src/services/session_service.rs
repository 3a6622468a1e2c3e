use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::ServiceError;
use crate::auth::{self, SessionToken};
use crate::database::models::{SessionRecord, SessionUser, User};
use crate::database::{SessionStore, UserRepository};

/// A request's resolved session.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub token_hash: String,
}

/// Server-side sessions with rolling expiry. The stored user snapshot is
/// replaced from the user store on every authenticated request.
pub struct SessionService {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserRepository>,
    max_age_secs: i64,
}

impl SessionService {
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn UserRepository>, max_age_secs: i64) -> Self {
        Self {
            sessions,
            users,
            max_age_secs,
        }
    }

    /// Starts a session; the returned token is what goes into the cookie.
    pub async fn issue(&self, user: &User) -> Result<SessionToken, ServiceError> {
        let token = SessionToken::generate();
        self.sessions
            .create(SessionRecord {
                token_hash: token.hash.clone(),
                user: SessionUser::from(user),
                expires_at: auth::session_expiry(Utc::now(), self.max_age_secs),
            })
            .await?;
        info!("Session started for {}", user.username);
        Ok(token)
    }

    /// Resolves a cookie token to the current user. Expired sessions and
    /// sessions whose user is gone are deleted and resolve to `None`.
    pub async fn authenticate(&self, token: &str) -> Result<Option<Authenticated>, ServiceError> {
        let token_hash = auth::hash_token(token);
        let Some(session) = self.sessions.find(&token_hash).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if session.is_expired(now) {
            debug!("Session for {} expired", session.user.username);
            self.sessions.delete(&token_hash).await?;
            return Ok(None);
        }

        let Some(user) = self.users.find_by_id(session.user.id).await? else {
            debug!("Session user {} no longer exists", session.user.id);
            self.sessions.delete(&token_hash).await?;
            return Ok(None);
        };

        self.sessions
            .refresh(&token_hash, SessionUser::from(&user), auth::session_expiry(now, self.max_age_secs))
            .await?;
        Ok(Some(Authenticated { user, token_hash }))
    }

    /// Replaces the session's user snapshot after a mutation.
    pub async fn replace_snapshot(&self, token_hash: &str, user: &User) -> Result<(), ServiceError> {
        self.sessions
            .refresh(token_hash, SessionUser::from(user), auth::session_expiry(Utc::now(), self.max_age_secs))
            .await?;
        Ok(())
    }

    pub async fn destroy(&self, token: &str) -> Result<(), ServiceError> {
        self.sessions.delete(&auth::hash_token(token)).await?;
        Ok(())
    }

    pub async fn destroy_all(&self, user_id: Uuid) -> Result<u64, ServiceError> {
        let count = self.sessions.delete_for_user(user_id).await?;
        info!("Destroyed {} sessions of user {}", count, user_id);
        Ok(count)
    }

    pub async fn purge_expired(&self) -> Result<u64, ServiceError> {
        Ok(self.sessions.purge_expired(Utc::now()).await?)
    }
}
