pub mod list;
pub mod show;

pub use list::pets_list;
pub use show::pet_show;
