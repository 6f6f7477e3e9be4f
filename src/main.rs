use std::io;
use std::sync::Arc;

use dotenvy::dotenv;
use secrecy::ExposeSecret;
use storefront_service::config::AppConfig;
use storefront_service::domain::ports::Mailer;
use storefront_service::infrastructure::mailer::{LogMailer, SmtpMailer};
use storefront_service::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let mailer: Arc<dyn Mailer> = match &config.email {
        Some(email) => Arc::new(SmtpMailer::new(email).map_err(io::Error::other)?),
        None => {
            log::warn!("SMTP not configured; order confirmations will only be logged");
            Arc::new(LogMailer)
        }
    };

    let state = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url.expose_secret()).map_err(io::Error::other)?;
            run_migrations(&pool).map_err(io::Error::other)?;
            AppState::postgres(
                pool,
                config.admin.clone(),
                config.jwt_secret.clone(),
                config.token_ttl_secs,
                config.shipping_fee.clone(),
                mailer,
            )
            .map_err(io::Error::other)?
        }
        None => {
            log::warn!("DATABASE_URL not set; using in-memory storage seeded with the demo catalog");
            AppState::in_memory(
                config.admin.clone(),
                config.jwt_secret.clone(),
                config.token_ttl_secs,
                config.shipping_fee.clone(),
                mailer,
            )
            .map_err(io::Error::other)?
        }
    };

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
