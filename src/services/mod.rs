pub mod ai_service;
pub mod greeting_service;
pub mod plan_dispatcher;
pub mod plan_service;
pub mod prompt_templates;
pub mod response_validator;
pub mod schedule_builder;
pub mod schedule_utils;
pub mod time_budget;
pub mod user_service;
