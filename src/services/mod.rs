pub mod account_service;
pub mod error;
pub mod ownership;
pub mod profile_service;
pub mod session_service;

pub use account_service::{AccountService, LoginForm, SignupForm};
pub use error::ServiceError;
pub use ownership::OwnershipGuard;
pub use profile_service::{AccountForm, PetForm, ProfileService};
pub use session_service::{Authenticated, SessionService};
