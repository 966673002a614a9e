use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use hrms::middleware::RequestId;
use hrms::{AuthService, Config, init_store, routes};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("HRMS API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("Starting HRMS API server...");

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );
    if config.is_production() && config.bootstrap_admin_password == "admin123" {
        log::warn!("Bootstrap admin is using the default password");
    }
    if config.has_insecure_jwt_secret() {
        log::warn!("JWT_SECRET is unset; tokens are signed with the built-in development key");
    }

    let auth_service = AuthService::new(config.clone());
    let admin_hash = auth_service.hash_password(&config.bootstrap_admin_password)?;
    let store = init_store(&config, admin_hash);
    log::info!("In-memory store initialized");

    let store_data = web::Data::new(store);
    let auth_data = web::Data::new(auth_service);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    let client_origin = config.client_base_url.clone();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(store_data.clone())
            .app_data(auth_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&client_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
