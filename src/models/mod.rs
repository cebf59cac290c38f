// src/models/mod.rs

pub mod envelope;
pub mod patch;
pub mod assignee;
pub mod project;
pub mod task;
pub mod project_assignee;
pub mod dashboard;
