//! # LinkSphere Binary
//!
//! The entry point that assembles the application based on compile-time
//! features and runtime settings.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use configs::{LogFormat, LogSettings, Settings, StoreBackend};
use secrecy::ExposeSecret;
use services::ContentLimits;
use storage_adapters::MemoryDocumentStore;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "auth-jwt")]
use auth_adapters::{JwtConfig, JwtIdentityVerifier};

#[cfg(feature = "db-postgres")]
use storage_adapters::PgDocumentStore;

#[cfg(not(feature = "auth-jwt"))]
compile_error!("linksphere needs an identity verifier: enable the `auth-jwt` feature");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    // 1. Identity verifier
    let identity = Arc::new(JwtIdentityVerifier::new(JwtConfig {
        secret: settings
            .auth
            .jwt_secret
            .as_ref()
            .map(|s| s.expose_secret().as_bytes().to_vec())
            .unwrap_or_default(),
        issuer: settings.auth.issuer.clone(),
        audience: settings.auth.audience.clone(),
    })
    .with_directory_capacity(settings.auth.directory_capacity));

    // 2. Document store + services
    let limits = ContentLimits {
        max_post_chars: settings.limits.max_post_chars,
        max_comment_chars: settings.limits.max_comment_chars,
    };
    let state = build_state(&settings, identity, limits).await?;

    // 3. HTTP
    let app = router(state, settings.server.cors_allow_any_origin);
    let address = settings.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(backend = ?settings.store.backend, "LinkSphere listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("LinkSphere stopped");
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    match log.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn build_state(
    settings: &Settings,
    identity: Arc<JwtIdentityVerifier>,
    limits: ContentLimits,
) -> anyhow::Result<AppState> {
    match settings.store.backend {
        StoreBackend::Memory => {
            info!("using the in-memory document store; data is lost on restart");
            Ok(AppState::new(
                Arc::new(MemoryDocumentStore::new()),
                identity,
                limits,
            ))
        }
        #[cfg(feature = "db-postgres")]
        StoreBackend::Postgres => {
            let url = settings
                .database
                .url
                .as_ref()
                .context("database.url is not set")?;
            let store =
                PgDocumentStore::connect(url.expose_secret(), settings.database.max_connections)
                    .await?;
            Ok(AppState::new(Arc::new(store), identity, limits))
        }
        #[cfg(not(feature = "db-postgres"))]
        StoreBackend::Postgres => {
            anyhow::bail!("store.backend = \"postgres\" needs a build with the `db-postgres` feature")
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
