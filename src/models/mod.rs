pub mod ai_types;
pub mod plan;
pub mod saved_plan;
pub mod user;
