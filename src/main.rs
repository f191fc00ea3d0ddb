//! blog-posts server entry point.
//!
//! Bootstraps the schema, then serves the HTML endpoints and static files.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use blog_posts::api;
use blog_posts::app_state::AppState;
use blog_posts::config::AppConfig;
use blog_posts::credentials::{CredentialResolver, ProcessEnv};
use blog_posts::persistence::{Connector, PostRepository, schema};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env before the filter is built)
    let config = AppConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        addr = %config.listen_addr,
        public_dir = %config.public_dir.display(),
        binding_var = %config.resolver.binding_var,
        service_match = %config.resolver.service_matcher,
        "starting blog-posts"
    );

    // Build persistence layer
    let resolver = CredentialResolver::new(Arc::new(ProcessEnv), config.resolver.clone());
    let connector = Connector::new(resolver, config.connect_timeout);
    schema::ensure_schema(&connector).await;

    // Build application
    let app_state = AppState::new(PostRepository::new(connector));
    let app = api::build_app(app_state, &config.public_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
