pub mod error;
pub mod filter_where;
pub mod planner;
pub mod types;

pub use error::FilterError;
pub use planner::PetQueryPlanner;
pub use types::*;
