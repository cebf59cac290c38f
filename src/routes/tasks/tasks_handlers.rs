use actix_web::{web, HttpResponse};
use log::info;

use crate::error::AppError;
use crate::models::envelope::ApiResponse;
use crate::models::task::{NewTask, TaskFilter, TaskPatch};
use crate::store::Store;

pub async fn list_tasks(
    store: web::Data<Store>,
    filter: web::Query<TaskFilter>,
) -> Result<HttpResponse, AppError> {
    let tasks = store.list_tasks(&filter).await?;
    info!("Listed {} tasks", tasks.len());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tasks)))
}

pub async fn get_task(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let task = store.get_task(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(task)))
}

pub async fn create_task(
    store: web::Data<Store>,
    request: web::Json<NewTask>,
) -> Result<HttpResponse, AppError> {
    let task = store.create_task(request.into_inner()).await?;
    info!("Created task {}: {}", task.id, task.title);
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(task, "Task created successfully")))
}

pub async fn update_task(
    store: web::Data<Store>,
    id: web::Path<i64>,
    request: web::Json<TaskPatch>,
) -> Result<HttpResponse, AppError> {
    let task = store.update_task(id.into_inner(), request.into_inner()).await?;
    info!("Updated task {}", task.id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(task, "Task updated successfully")))
}

pub async fn delete_task(
    store: web::Data<Store>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let report = store.delete_task(id.into_inner()).await?;
    info!("Deleted task {}", report.id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(report, "Task deleted successfully")))
}
