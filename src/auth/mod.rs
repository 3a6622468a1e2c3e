use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug)]
pub enum AuthError {
    Hashing(String),
    TaskFailed(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Hashing(msg) => write!(f, "Password hashing error: {}", msg),
            AuthError::TaskFailed(msg) => write!(f, "Password hashing task failed: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Hashes a password with bcrypt on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::TaskFailed(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Checks a password against a stored bcrypt hash on the blocking pool.
/// A malformed hash counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::TaskFailed(e.to_string()))?;
    Ok(verified.unwrap_or(false))
}

/// A freshly issued session token. Only `hash` is persisted; `token` goes
/// to the client in the cookie.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub hash: String,
}

impl SessionToken {
    pub fn generate() -> Self {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let hash = hash_token(&token);
        Self { token, hash }
    }
}

/// Hex SHA-256 of a cookie token, the key sessions are stored under.
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

pub fn session_expiry(now: DateTime<Utc>, max_age_secs: i64) -> DateTime<Utc> {
    now + Duration::seconds(max_age_secs)
}
