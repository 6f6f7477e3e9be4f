pub mod api_doc;
pub mod application;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use bigdecimal::BigDecimal;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use secrecy::SecretString;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::auth_service::AuthService;
use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use config::AdminCredentials;
use domain::errors::DomainError;
use domain::ports::Mailer;
use infrastructure::memory::{InMemoryOrderRepository, InMemoryProductRepository};
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::product_repo::DieselProductRepository;
use infrastructure::seed::seed_demo_catalog;
use infrastructure::token::TokenCodec;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(format!("failed to run migrations: {e}")))?;
    Ok(())
}

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(catalog: CatalogService, orders: OrderService, auth: AuthService) -> Self {
        Self {
            catalog,
            orders,
            auth,
        }
    }

    /// Services backed by Postgres through `pool`.
    pub fn postgres(
        pool: DbPool,
        admin: AdminCredentials,
        jwt_secret: SecretString,
        token_ttl_secs: i64,
        shipping_fee: BigDecimal,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, DomainError> {
        let products = Arc::new(DieselProductRepository::new(pool.clone()));
        let seeded = seed_demo_catalog(products.as_ref())?;
        if seeded > 0 {
            log::info!("Seeded {seeded} demo products");
        }

        Ok(Self::new(
            CatalogService::new(products),
            OrderService::new(Arc::new(DieselOrderRepository::new(pool)), mailer, shipping_fee),
            AuthService::new(admin, TokenCodec::new(jwt_secret), token_ttl_secs),
        ))
    }

    /// Services backed by process memory, seeded with the demo catalog.
    pub fn in_memory(
        admin: AdminCredentials,
        jwt_secret: SecretString,
        token_ttl_secs: i64,
        shipping_fee: BigDecimal,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, DomainError> {
        let products = Arc::new(InMemoryProductRepository::new());
        seed_demo_catalog(products.as_ref())?;

        Ok(Self::new(
            CatalogService::new(products),
            OrderService::new(Arc::new(InMemoryOrderRepository::new()), mailer, shipping_fee),
            AuthService::new(admin, TokenCodec::new(jwt_secret), token_ttl_secs),
        ))
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(handlers::configure)
            .route("/health", web::get().to(health))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api_doc::ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
