pub mod plan_repository;
pub mod user_repository;
