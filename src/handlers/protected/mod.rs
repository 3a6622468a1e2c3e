// handlers/protected/mod.rs - Session-protected handlers
//
// Every route here sits behind `session_auth_middleware`, which rejects
// requests without a live session and inserts `CurrentUser`.

pub mod pets;
pub mod profile;

pub use pets::*;
pub use profile::*;
