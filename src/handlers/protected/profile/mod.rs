pub mod account;
pub mod pet;
pub mod show;

pub use account::{account_delete_get, account_delete_post, account_edit_get, account_edit_post};
pub use pet::{new_pet_get, new_pet_post, owned_pet_delete, owned_pet_edit_get, owned_pet_edit_post, owned_pet_show};
pub use show::profile_show;
