use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::ServiceError;
use crate::auth;
use crate::database::models::{NewUser, Role, User};
use crate::database::UserRepository;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration and credential checks.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
    min_password_length: usize,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, bcrypt_cost: u32, min_password_length: usize) -> Self {
        Self {
            users,
            bcrypt_cost,
            min_password_length,
        }
    }

    /// New accounts always start with the USER role and no pets.
    pub async fn signup(&self, form: SignupForm) -> Result<User, ServiceError> {
        let username = form.username.trim().to_string();
        if username.is_empty() {
            return Err(ServiceError::validation("username", "Please provide your username."));
        }
        if form.password.chars().count() < self.min_password_length {
            return Err(ServiceError::validation(
                "password",
                format!(
                    "Your password needs to be at least {} characters long.",
                    self.min_password_length
                ),
            ));
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(ServiceError::duplicate("username", "Username already taken."));
        }

        let password = auth::hash_password(form.password, self.bcrypt_cost).await?;
        let user = self
            .users
            .create(NewUser {
                username,
                email: form.email.trim().to_string(),
                password,
                role: Role::User,
            })
            .await?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn login(&self, form: LoginForm) -> Result<User, ServiceError> {
        let username = form.username.trim();
        if username.is_empty() || form.password.is_empty() {
            return Err(ServiceError::validation(
                "username",
                "Please enter both, username and password to login.",
            ));
        }

        let Some(user) = self.users.find_by_username(username).await? else {
            warn!("Login failed: unknown user {}", username);
            return Err(ServiceError::InvalidCredentials);
        };

        if !auth::verify_password(form.password, user.password.clone()).await? {
            warn!("Login failed: wrong password for {}", username);
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }
}
