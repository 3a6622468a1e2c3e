pub mod pet;
pub mod session;
pub mod user;

pub use pet::{Address, Pet, PetData, ADDRESS_FIELDS};
pub use session::{SessionRecord, SessionUser};
pub use user::{NewUser, Role, User, UserChanges};
