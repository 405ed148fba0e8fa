use std::sync::Arc;

use bookstore_service::config::AppConfig;
use bookstore_service::identity::JwtIdentityResolver;
use bookstore_service::{build_server, create_pool, run_migrations};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));

    let pool = create_pool(&config.database_url).expect("Failed to create DB pool");
    run_migrations(&pool).expect("Failed to run database migrations");

    let identity = Arc::new(JwtIdentityResolver::new(&config.jwt_secret));

    log::info!(
        "Starting server at http://{}:{} (confirm policy: {:?})",
        config.host,
        config.port,
        config.confirm_policy
    );

    build_server(
        pool,
        identity,
        config.confirm_policy,
        &config.host,
        config.port,
    )?
    .await
}
