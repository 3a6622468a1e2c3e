pub mod format;

pub use format::{Page, ProfileView, UserView};
