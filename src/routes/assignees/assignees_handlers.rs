use actix_web::{web, HttpResponse};
use log::info;

use crate::error::AppError;
use crate::models::assignee::{AssigneeFilter, AssigneePatch, NewAssignee};
use crate::models::envelope::ApiResponse;
use crate::store::Store;
use super::assignees_models::{JoinProjectRequest, ProjectMembershipPath};

pub async fn list_assignees(
    store: web::Data<Store>,
    filter: web::Query<AssigneeFilter>,
) -> Result<HttpResponse, AppError> {
    let assignees = store.list_assignees(&filter).await?;
    info!("Listed {} assignees", assignees.len());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(assignees)))
}

pub async fn get_assignee(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let assignee = store.get_assignee(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(assignee)))
}

pub async fn create_assignee(
    store: web::Data<Store>,
    request: web::Json<NewAssignee>,
) -> Result<HttpResponse, AppError> {
    let assignee = store.create_assignee(request.into_inner()).await?;
    info!("Created assignee {}: {}", assignee.id, assignee.email);
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(assignee, "Assignee created successfully")))
}

pub async fn update_assignee(
    store: web::Data<Store>,
    id: web::Path<i64>,
    request: web::Json<AssigneePatch>,
) -> Result<HttpResponse, AppError> {
    let assignee = store.update_assignee(id.into_inner(), request.into_inner()).await?;
    info!("Updated assignee {}", assignee.id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(assignee, "Assignee updated successfully")))
}

pub async fn delete_assignee(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let report = store.delete_assignee(id.into_inner()).await?;
    info!(
        "Deleted assignee {} ({} tasks unassigned, {} projects unowned)",
        report.id, report.tasks_unassigned, report.projects_unowned
    );
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(report, "Assignee deleted successfully")))
}

pub async fn get_assignee_tasks(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let tasks = store.tasks_for_assignee(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tasks)))
}

pub async fn get_assignee_projects(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let projects = store.assignee_projects(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(projects)))
}

pub async fn join_project(
    store: web::Data<Store>,
    id: web::Path<i64>,
    request: web::Json<JoinProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let JoinProjectRequest { project_id, role } = request.into_inner();
    let membership = store.assign_to_project(project_id, id.into_inner(), role).await?;
    info!("Assigned {} to project {}", membership.assignee_id, membership.project_id);
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(membership, "Assignee added to project")))
}

pub async fn leave_project(
    store: web::Data<Store>,
    path: web::Path<ProjectMembershipPath>,
) -> Result<HttpResponse, AppError> {
    let ProjectMembershipPath { id, project_id } = path.into_inner();
    store.unassign_from_project(project_id, id).await?;
    info!("Removed {} from project {}", id, project_id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        serde_json::json!({ "project_id": project_id, "assignee_id": id }),
        "Assignee removed from project",
    )))
}
