use actix_web::{HttpResponse, Responder};
use log::info;
use serde_json::json;

use crate::models::envelope::ApiResponse;

// Default handler for the root path
pub async fn root_get() -> impl Responder {
    HttpResponse::Ok().body("Hello, this is the Project Tracker API.")
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::ok(json!({ "status": "ok" })))
}

pub async fn not_found() -> impl Responder {
    info!("No route matched");
    HttpResponse::NotFound().json(ApiResponse::failure("Route not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn unmatched_routes_get_an_envelope() {
        let app = test::init_service(
            App::new()
                .route("/api/health", web::get().to(health))
                .default_service(web::to(not_found)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "ok");

        let req = test::TestRequest::get().uri("/api/widgets").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }
}
