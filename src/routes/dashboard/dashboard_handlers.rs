use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::models::envelope::ApiResponse;
use crate::store::Store;

pub async fn get_dashboard(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let dashboard = store.dashboard().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(dashboard)))
}

pub async fn get_dashboard_stats(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let stats = store.dashboard_stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}
