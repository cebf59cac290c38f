use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

mod config;
mod error;
mod models;
mod routes;
mod store;

use config::Config;
use store::Store;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let store = Store::connect(&config).await.map_err(|e| {
        error!("Failed to open store at {}: {}", config.database_url, e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    if config.init_schema {
        if let Err(e) = store.init_schema().await {
            error!("Failed to initialize schema: {}", e);
            store.close().await;
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e));
        }
    }
    if config.seed {
        if let Err(e) = store.seed().await {
            error!("Failed to seed store: {}", e);
        }
    }

    info!("Server running at http://{}", config.server_address);

    let data = web::Data::new(store.clone());
    let result = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(data.clone())
            .configure(routes::routes::api_configure)
            .default_service(web::to(routes::system::system_handlers::not_found))
    })
    .bind(&config.server_address)?
    .run()
    .await;

    store.close().await;
    result
}
