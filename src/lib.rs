pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::account_service::AccountService;
use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use infrastructure::account_repo::DieselAccountRepository;
use infrastructure::catalog_repo::DieselCatalogRepository;
use infrastructure::order_repo::DieselOrderRepository;

pub use config::Settings;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Services shared by every worker.
pub struct AppState {
    pub orders: OrderService<DieselOrderRepository, DieselAccountRepository>,
    pub accounts: AccountService<DieselAccountRepository>,
    pub catalog: CatalogService<DieselCatalogRepository>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(pool: DbPool, admin_token: Option<String>) -> Self {
        Self {
            orders: OrderService::new(
                DieselOrderRepository::new(pool.clone()),
                DieselAccountRepository::new(pool.clone()),
            ),
            accounts: AccountService::new(DieselAccountRepository::new(pool.clone())),
            catalog: CatalogService::new(DieselCatalogRepository::new(pool)),
            admin_token,
        }
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    admin_token: Option<String>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    if admin_token.is_none() {
        log::warn!("ADMIN_TOKEN is not set; GET /orders without credentials lists every order");
    }
    let state = web::Data::new(AppState::new(pool, admin_token));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(handlers::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", handlers::ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
