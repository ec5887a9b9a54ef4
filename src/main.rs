use anyhow::Context;
use studymate::{config::AppConfig, db, routes::build_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studymate=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    // Database connection
    let pool = db::create_pool(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    // Run migrations
    db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let app_state = AppState::from_config(pool, &config).context("failed to build HTTP clients")?;
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(
        environment = %config.environment,
        production = config.is_production(),
        "Server listening on http://{}",
        config.bind_addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
