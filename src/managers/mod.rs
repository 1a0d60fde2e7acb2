// NavHub managers
// Managers own the ordered in-memory collections and apply user mutations.

pub mod engine_manager;
pub mod section_manager;
