pub mod assignees_handlers;
pub mod assignees_models;
