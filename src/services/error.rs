use thiserror::Error;

use crate::auth::AuthError;
use crate::database::RepoError;

/// Outcome of a failed service operation, already phrased for the user
/// where the user can do something about it.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{message}")]
    Duplicate { field: String, message: String },

    #[error("Wrong credentials.")]
    InvalidCredentials,

    #[error("{0}")]
    NotAuthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(RepoError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Duplicate {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_authorized_for_pet() -> Self {
        ServiceError::NotAuthorized("Not authorized for that pet".to_string())
    }
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation { field } if field == "username" => {
                ServiceError::duplicate(field, "The username you chose is already in use.")
            }
            RepoError::UniqueViolation { field } => {
                let message = format!("That {} is already in use.", field);
                ServiceError::duplicate(field, message)
            }
            RepoError::NotFound(what) => ServiceError::NotFound(format!("Not found: {}", what)),
            other => ServiceError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_race_reads_as_duplicate() {
        let err: ServiceError = RepoError::UniqueViolation {
            field: "username".to_string(),
        }
        .into();
        assert!(matches!(err, ServiceError::Duplicate { ref field, .. } if field == "username"));
        assert_eq!(err.to_string(), "The username you chose is already in use.");
    }

    #[test]
    fn unavailable_store_stays_a_storage_error() {
        let err: ServiceError = RepoError::Unavailable("pool timed out".to_string()).into();
        assert!(matches!(err, ServiceError::Storage(RepoError::Unavailable(_))));
    }
}
