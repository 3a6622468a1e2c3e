pub mod login;
pub mod logout;
pub mod signup;

pub use login::{login_get, login_post};
pub use logout::logout_post;
pub use signup::{signup_get, signup_post};
