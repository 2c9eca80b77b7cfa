use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use catalog_api::app::{router, AppState};
use catalog_api::auth::TokenVerifier;
use catalog_api::catalog::ProductStore;
use catalog_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    let store = ProductStore::new(pool);
    store
        .ensure_schema()
        .await
        .context("failed to initialize schema")?;

    let state = AppState {
        store,
        verifier: TokenVerifier::new(&config.security.jwt_secret),
        catalog: config.catalog.clone(),
    };

    let mut app = router(state).layer(TraceLayer::new_for_http());
    if config.security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("catalog API listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
