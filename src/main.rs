//! Shelter sponsorship service - entry point.
//!
//! Loads configuration, connects to PostgreSQL, and serves the sponsorship
//! API over axum.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shelter_sponsorships::adapters::auth::JwtSessionValidator;
use shelter_sponsorships::adapters::clock::SystemClock;
use shelter_sponsorships::adapters::http::{app_router, AuthState, SponsorshipAppState};
use shelter_sponsorships::adapters::postgres::{PostgresSponsorshipReader, PostgresUnitOfWork};
use shelter_sponsorships::config::AppConfig;

fn init_tracing(config: &AppConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config);

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    if config.database.run_migrations {
        info!("Running database migrations");
        sqlx::migrate!()
            .run(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let state = SponsorshipAppState {
        unit_of_work: Arc::new(PostgresUnitOfWork::new(pool.clone())),
        reader: Arc::new(PostgresSponsorshipReader::new(pool)),
        clock: Arc::new(SystemClock),
    };
    let auth: AuthState = Arc::new(JwtSessionValidator::from_config(&config.auth));

    let app = app_router(state, auth, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    info!(%addr, environment = ?config.server.environment, "Sponsorship API listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
