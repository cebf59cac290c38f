use actix_web::{web, HttpResponse};
use log::info;

use crate::error::AppError;
use crate::models::envelope::ApiResponse;
use crate::models::project::{NewProject, ProjectFilter, ProjectPatch};
use crate::store::Store;
use super::projects_models::{AddMemberRequest, MemberPath};

pub async fn list_projects(
    store: web::Data<Store>,
    filter: web::Query<ProjectFilter>,
) -> Result<HttpResponse, AppError> {
    let projects = store.list_projects(&filter).await?;
    info!("Listed {} projects", projects.len());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(projects)))
}

pub async fn get_project(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let project = store.get_project(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(project)))
}

pub async fn create_project(
    store: web::Data<Store>,
    request: web::Json<NewProject>,
) -> Result<HttpResponse, AppError> {
    let project = store.create_project(request.into_inner()).await?;
    info!("Created project {}: {}", project.id, project.name);
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(project, "Project created successfully")))
}

pub async fn update_project(
    store: web::Data<Store>,
    id: web::Path<i64>,
    request: web::Json<ProjectPatch>,
) -> Result<HttpResponse, AppError> {
    let project = store.update_project(id.into_inner(), request.into_inner()).await?;
    info!("Updated project {}", project.id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(project, "Project updated successfully")))
}

pub async fn delete_project(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let report = store.delete_project(id.into_inner()).await?;
    info!(
        "Deleted project {} ({} tasks, {} memberships removed)",
        report.id, report.tasks_deleted, report.assignments_removed
    );
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(report, "Project deleted successfully")))
}

pub async fn get_project_tasks(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let tasks = store.tasks_for_project(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tasks)))
}

pub async fn get_project_members(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let members = store.project_members(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(members)))
}

pub async fn add_project_member(
    store: web::Data<Store>,
    id: web::Path<i64>,
    request: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, AppError> {
    let AddMemberRequest { assignee_id, role } = request.into_inner();
    let membership = store.assign_to_project(id.into_inner(), assignee_id, role).await?;
    info!("Assigned {} to project {}", membership.assignee_id, membership.project_id);
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(membership, "Assignee added to project")))
}

pub async fn remove_project_member(
    store: web::Data<Store>,
    path: web::Path<MemberPath>,
) -> Result<HttpResponse, AppError> {
    let MemberPath { id, assignee_id } = path.into_inner();
    store.unassign_from_project(id, assignee_id).await?;
    info!("Removed {} from project {}", assignee_id, id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        serde_json::json!({ "project_id": id, "assignee_id": assignee_id }),
        "Assignee removed from project",
    )))
}
