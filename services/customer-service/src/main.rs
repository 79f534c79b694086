use anyhow::Context;
use clap::Parser;
use customer_service::{
    build_router, config::Config, cors_layer, AppState, CustomerRepository,
    InMemoryCustomerRepository, PgCustomerRepository,
};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let customers: Arc<dyn CustomerRepository> = match config.database_url.as_deref() {
        Some(database_url) => {
            let db = PgPool::connect(database_url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            sqlx::migrate!("./migrations")
                .run(&db)
                .await
                .context("failed to apply customer migrations")?;
            info!("using Postgres customer store");
            Arc::new(PgCustomerRepository::new(db))
        }
        None => {
            warn!("DATABASE_URL not set; customers are kept in memory and lost on restart");
            Arc::new(InMemoryCustomerRepository::new())
        }
    };

    let app = build_router(AppState::new(customers)).layer(cors_layer(&config.allowed_origins));

    let addr = config.socket_addr();
    info!(%addr, "starting customer-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
