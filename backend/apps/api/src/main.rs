//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use accounts::{AccountsConfig, PgAccountsRepository, accounts_router};
use anyhow::Context;
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::notify::NotifyConfig;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);
const DEFAULT_PORT: u16 = 31113;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campus_api=info,accounts=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired registration sessions
    // Errors here should not prevent server startup
    let repo = PgAccountsRepository::new(pool.clone());
    purge_expired_sessions(&repo).await;

    let purge_repo = repo.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        // First tick completes immediately; startup already purged
        interval.tick().await;
        loop {
            interval.tick().await;
            purge_expired_sessions(&purge_repo).await;
        }
    });

    // Accounts configuration
    let mut accounts_config = if cfg!(debug_assertions) {
        match env::var("ACCOUNTS_SECRET") {
            Ok(secret_b64) => AccountsConfig {
                session_secret: decode_secret(&secret_b64)?,
                ..AccountsConfig::default()
            },
            Err(_) => AccountsConfig::development(),
        }
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("ACCOUNTS_SECRET").context("ACCOUNTS_SECRET must be set in production")?;
        AccountsConfig {
            session_secret: decode_secret(&secret_b64)?,
            ..AccountsConfig::default()
        }
    };
    if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
        accounts_config.password_pepper = Some(pepper.into_bytes());
    }
    if let Ok(client_url) = env::var("CLIENT_URL") {
        accounts_config.client_url = client_url;
    }

    // Notification transports
    let notify_config = NotifyConfig::from_env();
    let email_transport = notify_config
        .email_transport()
        .context("failed to build email transport")?;
    let sms_transport = notify_config
        .sms_transport()
        .context("failed to build SMS transport")?;

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .merge(accounts_router(
            repo,
            email_transport,
            sms_transport,
            accounts_config,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = match env::var("PORT") {
        Ok(port) => port.parse().context("PORT must be a valid port number")?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn purge_expired_sessions(repo: &PgAccountsRepository) {
    if let Err(e) = repo.purge_expired().await {
        tracing::warn!(
            error = %e,
            "Registration session cleanup failed, continuing anyway"
        );
    }
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let secret_bytes = Engine::decode(&general_purpose::STANDARD, secret_b64.trim())
        .context("ACCOUNTS_SECRET must be valid base64")?;
    secret_bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow::anyhow!("ACCOUNTS_SECRET must decode to 32 bytes, got {}", bytes.len()))
}
