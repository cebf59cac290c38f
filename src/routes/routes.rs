use actix_web::{web, HttpRequest};

use crate::error::AppError;

/// Everything under `/api`, plus extractor error handling.
pub fn api_configure(cfg: &mut web::ServiceConfig) {
    extractor_configure(cfg);
    system_configure(cfg);
    tasks_configure(cfg);
    projects_configure(cfg);
    assignees_configure(cfg);
    dashboard_configure(cfg);
}

// Malformed bodies, paths and query strings answer 400 with the envelope.
pub fn extractor_configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req: &HttpRequest| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req: &HttpRequest| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req: &HttpRequest| AppError::validation(err.to_string()).into()),
    );
}

use super::system::system_handlers;

pub fn system_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(system_handlers::root_get))
        .route("/api/health", web::get().to(system_handlers::health));
}

use super::tasks::tasks_handlers;

pub fn tasks_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tasks")
            .route("", web::get().to(tasks_handlers::list_tasks))
            .route("", web::post().to(tasks_handlers::create_task))
            .route("/{id}", web::get().to(tasks_handlers::get_task))
            .route("/{id}", web::patch().to(tasks_handlers::update_task))
            .route("/{id}", web::delete().to(tasks_handlers::delete_task))
    );
}

use super::projects::projects_handlers;

pub fn projects_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/projects")
            .route("", web::get().to(projects_handlers::list_projects))
            .route("", web::post().to(projects_handlers::create_project))
            .route("/{id}", web::get().to(projects_handlers::get_project))
            .route("/{id}", web::patch().to(projects_handlers::update_project))
            .route("/{id}", web::delete().to(projects_handlers::delete_project))
            .route("/{id}/tasks", web::get().to(projects_handlers::get_project_tasks))
            .route("/{id}/assignees", web::get().to(projects_handlers::get_project_members))
            .route("/{id}/assignees", web::post().to(projects_handlers::add_project_member))
            .route("/{id}/assignees/{assignee_id}", web::delete().to(projects_handlers::remove_project_member))
    );
}

use super::assignees::assignees_handlers;

pub fn assignees_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/assignees")
            .route("", web::get().to(assignees_handlers::list_assignees))
            .route("", web::post().to(assignees_handlers::create_assignee))
            .route("/{id}", web::get().to(assignees_handlers::get_assignee))
            .route("/{id}", web::patch().to(assignees_handlers::update_assignee))
            .route("/{id}", web::delete().to(assignees_handlers::delete_assignee))
            .route("/{id}/tasks", web::get().to(assignees_handlers::get_assignee_tasks))
            .route("/{id}/projects", web::get().to(assignees_handlers::get_assignee_projects))
            .route("/{id}/projects", web::post().to(assignees_handlers::join_project))
            .route("/{id}/projects/{project_id}", web::delete().to(assignees_handlers::leave_project))
    );
}

use super::dashboard::dashboard_handlers;

pub fn dashboard_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/dashboard")
            .route("", web::get().to(dashboard_handlers::get_dashboard))
            .route("/stats", web::get().to(dashboard_handlers::get_dashboard_stats))
    );
}
