// src/routes.rs

pub mod routes;
pub mod system;
pub mod tasks;
pub mod projects;
pub mod assignees;
pub mod dashboard;
