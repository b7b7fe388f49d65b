pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::shipment_service::ShipmentService;
pub use config::{AppConfig, CarrierConfig};
pub use db::{create_pool, DbPool};

use infrastructure::ghtk_client::GhtkClient;
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::settings_repo::DieselSettingsRepository;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::submit_shipments,
        handlers::orders::submit_shipment,
        handlers::orders::get_shipment,
        handlers::settings::update_carrier_token,
        handlers::settings::carrier_token_status,
    ),
    components(schemas(
        handlers::orders::SubmitShipmentsRequest,
        handlers::orders::SubmitShipmentsResponse,
        handlers::orders::ShipmentResponse,
        handlers::orders::ShipmentStatusResponse,
        handlers::settings::UpdateCarrierTokenRequest,
        handlers::settings::CarrierTokenStatusResponse,
    )),
    tags(
        (name = "shipments", description = "Send orders to GHTK"),
        (name = "settings", description = "Carrier configuration"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Wire the Postgres-backed stores and the GHTK client into a service.
///
/// Builds a blocking HTTP client, so it must not be called from inside an
/// async runtime.
pub fn build_service(
    pool: DbPool,
    carrier: &CarrierConfig,
) -> Result<ShipmentService, reqwest::Error> {
    let client = GhtkClient::new(carrier)?;
    log::info!("GHTK endpoint: {}", client.endpoint());
    Ok(ShipmentService::new(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(DieselSettingsRepository::new(pool)),
        Arc::new(client),
    ))
}

/// Register the shipment and settings routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route(
                "/shipments",
                web::post().to(handlers::orders::submit_shipments),
            )
            .route(
                "/{id}/shipment",
                web::post().to(handlers::orders::submit_shipment),
            )
            .route("/{id}/shipment", web::get().to(handlers::orders::get_shipment)),
    )
    .service(
        web::scope("/settings")
            .route(
                "/carrier-token",
                web::put().to(handlers::settings::update_carrier_token),
            )
            .route(
                "/carrier-token",
                web::get().to(handlers::settings::carrier_token_status),
            ),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: ShipmentService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
