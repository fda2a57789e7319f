//! Gatehouse API server.
//!
//! Wires configuration, the database pool, the invitation services, and
//! the HTTP router together, then serves until shutdown.

mod config;
mod health;
mod logging;
mod openapi;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use gatehouse_api_invitations::services::{
    DefaultRegistrationBackend, EmailSender, InvitationService, MockEmailSender, SmtpEmailSender,
};
use gatehouse_api_invitations::{invitation_router, AppState, InvitationSettings};
use gatehouse_db::DbPool;

use crate::config::AppConfig;
use crate::health::{health_handler, readiness_handler};
use crate::logging::init_logging;
use crate::openapi::openapi_handler;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: Configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.log_filter);

    tracing::info!(
        env = %config.app_env,
        invite_mode = config.invite_mode,
        "Starting gatehouse-api"
    );

    let pool = match DbPool::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = gatehouse_db::run_migrations(&pool).await {
        tracing::error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    let email_sender: Arc<dyn EmailSender> = match &config.smtp {
        Some(smtp) => match SmtpEmailSender::new(smtp) {
            Ok(sender) => {
                tracing::info!(host = %smtp.host, port = smtp.port, "SMTP email transport configured");
                Arc::new(sender)
            }
            Err(e) => {
                tracing::error!("Invalid SMTP configuration: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            if config.app_env.is_production() {
                tracing::error!("SMTP_HOST is required in production");
                std::process::exit(1);
            }
            tracing::warn!("SMTP not configured, invitation emails are only logged");
            Arc::new(MockEmailSender::new())
        }
    };

    let settings = Arc::new(InvitationSettings {
        invite_mode: config.invite_mode,
        invitations_per_user: config.invitations_per_user,
        expiry_days: config.invitation_expiry_days,
        blocklist: config.blocklist.clone(),
        frontend_url: config.frontend_url.clone(),
        from_email: config.from_email.clone(),
    });

    let invitation_service = Arc::new(InvitationService::new(
        pool.inner().clone(),
        Arc::clone(&settings),
        email_sender,
    ));
    let registration_backend = Arc::new(DefaultRegistrationBackend::new(
        pool.inner().clone(),
        config.invitations_per_user,
    ));

    let state = AppState {
        pool: pool.inner().clone(),
        settings,
        invitation_service,
        registration_backend,
    };

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(readiness_handler).with_state(pool.inner().clone()))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .merge(invitation_router(state, config.jwt_public_key.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, "Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %addr, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Resolve when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
