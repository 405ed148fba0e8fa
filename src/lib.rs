pub mod api_doc;
pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::application::cart_service::CartService;
use crate::application::catalog_service::CatalogService;
use crate::application::order_service::OrderService;
use crate::domain::transition::ConfirmPolicy;
use crate::errors::AppError;
use crate::identity::IdentityResolver;
use crate::infrastructure::cart_repo::DieselCartRepository;
use crate::infrastructure::catalog_repo::DieselCatalogRepository;
use crate::infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    if !applied.is_empty() {
        log::info!("Applied {} database migration(s)", applied.len());
    }
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    identity: Arc<dyn IdentityResolver>,
    confirm_policy: ConfirmPolicy,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let catalog = web::Data::new(CatalogService::new(DieselCatalogRepository::new(
        pool.clone(),
    )));
    let carts = web::Data::new(CartService::new(DieselCartRepository::new(pool.clone())));
    let orders = web::Data::new(OrderService::new(
        DieselOrderRepository::new(pool),
        confirm_policy,
    ));
    let identity: web::Data<dyn IdentityResolver> = web::Data::from(identity);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(catalog.clone())
            .app_data(carts.clone())
            .app_data(orders.clone())
            .app_data(identity.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .wrap(Logger::default())
            .service(
                web::scope("/products")
                    .route("", web::get().to(handlers::products::list_products))
                    .route("/categories", web::get().to(handlers::products::list_categories))
                    .route("/{id}", web::get().to(handlers::products::get_product))
                    .route("/{id}/stock", web::get().to(handlers::products::get_stock)),
            )
            .service(
                web::resource("/cart")
                    .route(web::get().to(handlers::cart::list_cart))
                    .route(web::post().to(handlers::cart::add_line))
                    .route(web::put().to(handlers::cart::update_line))
                    .route(web::delete().to(handlers::cart::remove_line)),
            )
            .route("/checkout", web::post().to(handlers::orders::checkout))
            .service(
                web::scope("/orders")
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("", web::put().to(handlers::orders::update_status))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}/cancel", web::put().to(handlers::orders::cancel_order))
                    .route("/{id}/return", web::put().to(handlers::orders::return_order))
                    .route("/{id}/confirm", web::put().to(handlers::orders::confirm_order)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
