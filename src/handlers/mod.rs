// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (session required, ownership checked
// where a pet id is involved).

pub mod protected;
pub mod public;
