// src/main.rs

use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use dotenvy::dotenv;
use notecards::{
    config::Config,
    generation::{DisabledBackend, GenerationBackend, HuggingFaceBackend},
    routes,
    state::AppState,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("DATABASE_URL is not a valid SQLite URL")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(connect_options)
        .await
        .expect("Failed to open database");

    tracing::info!("Database connected...");

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    let backend = build_backend(&config);
    tracing::info!("Flashcard generation backend: {}", backend.name());

    let state = AppState::new(pool, config.clone(), backend);

    // Create the Axum application router
    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");

    axum::serve(listener, app).await.expect("Server error");
}

/// Picks the AI backend. Without a token, or with a broken endpoint setting,
/// the service still runs on heuristic generation alone.
fn build_backend(config: &Config) -> Arc<dyn GenerationBackend> {
    let Some(token) = config.hf_api_token.as_deref() else {
        tracing::warn!("HUGGING_FACE_API not set, flashcards will use heuristic generation only");
        return Arc::new(DisabledBackend);
    };

    match HuggingFaceBackend::from_config(config, token) {
        Ok(backend) => {
            tracing::info!("AI endpoint: {}", backend.endpoint());
            Arc::new(backend)
        }
        Err(e) => {
            tracing::error!("Failed to set up Hugging Face backend: {}", e);
            Arc::new(DisabledBackend)
        }
    }
}
