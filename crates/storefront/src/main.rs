//! Vitrine Storefront - demo e-commerce API.
//!
//! This binary serves the storefront JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - Catalog embedded in the binary (or loaded from `VITRINE_CATALOG_PATH`)
//! - Cart and signed-in user kept in tower-sessions sessions
//! - Accounts in `PostgreSQL` when `VITRINE_DATABASE_URL` is set, otherwise
//!   in memory with the demo users

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::db::{self, MemoryUserStore, PgUserStore, UserStore};
use vitrine_storefront::services::auth::CredentialScheme;
use vitrine_storefront::state::AppState;
use vitrine_storefront::{catalog, routes};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Pick the row-store: `PostgreSQL` when configured, memory otherwise.
async fn create_user_store(
    config: &StorefrontConfig,
) -> Result<Arc<dyn UserStore>, Box<dyn std::error::Error>> {
    if let Some(url) = &config.database_url {
        let pool = db::create_pool(url).await?;
        tracing::info!("Database pool created");
        // Migrations are not run on startup: `vitrine migrate`
        return Ok(Arc::new(PgUserStore::new(pool)));
    }

    let store = MemoryUserStore::new().with_latency(config.simulated_latency);
    let seeded = db::seed_demo_users(&store, config.credential_scheme).await?;
    tracing::info!(
        users = seeded,
        latency_ms = config.simulated_latency.as_millis(),
        "No database configured, using in-memory accounts"
    );
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env()?;

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrine_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if config.credential_scheme == CredentialScheme::InsecurePlaintext {
        tracing::warn!(
            "VITRINE_INSECURE_DEMO_PASSWORDS is enabled: passwords are stored and compared as plaintext"
        );
    }

    let catalog = catalog::load(config.catalog_path.as_deref()).await?;
    tracing::info!(products = catalog.len(), "Catalog ready");

    let users = create_user_store(&config).await?;
    let state = AppState::new(config.clone(), catalog, users);
    let app = routes::app(state);

    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Peer addresses feed the rate limiter when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
