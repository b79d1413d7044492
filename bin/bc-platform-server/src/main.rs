//! BankCore Platform Server
//!
//! Serves the customer onboarding API:
//! - `/api/customers/*` - registration, login, profile management
//! - `/health`, `/health/live` - health probes
//! - `/swagger-ui`, `/q/openapi` - API documentation
//!
//! ## Configuration
//!
//! Read from `config.toml` (or `BANKCORE_CONFIG`) with `BANKCORE_*`
//! environment overrides. See `AppConfig::example_toml()`.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BANKCORE_HTTP_PORT` | `8080` | HTTP API port |
//! | `BANKCORE_MONGODB_URI` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `BANKCORE_MONGODB_DATABASE` | `bankcore` | MongoDB database name |
//! | `BANKCORE_STORAGE_BACKEND` | `mongodb` | `mongodb` or `memory` |
//! | `BANKCORE_SIGNING_SECRET` | - | Token signing secret (required) |
//! | `RUST_LOG` | `info` | Log level |
//! | `LOG_FORMAT` | `text` | `json` for structured output |

use std::sync::Arc;

use anyhow::Result;
use axum::{http::HeaderValue, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use bc_config::{AppConfig, StorageBackend};
use bc_platform::{
    customers_router, health_router, initialize_indexes, Argon2Config, CustomersState,
    HealthState, LoggingNotifier, PasswordService, Stores, TokenConfig, TokenService,
};

#[tokio::main]
async fn main() -> Result<()> {
    bc_common::logging::init_logging("bc-platform-server");

    info!("Starting BankCore Platform Server");

    let config = AppConfig::load()?;
    config.validate()?;

    // Select the store backend
    let (stores, db) = match config.storage.backend {
        StorageBackend::Mongodb => {
            info!("Connecting to MongoDB: {}/{}", config.mongodb.uri, config.mongodb.database);
            let client = mongodb::Client::with_uri_str(&config.mongodb.uri).await?;
            let db = client.database(&config.mongodb.database);
            initialize_indexes(&db).await?;
            (Stores::mongo(&db), Some(db))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory stores; data will not survive a restart");
            (Stores::in_memory(), None)
        }
    };
    info!(backend = ?config.storage.backend, "Stores initialized");

    let password_service = Arc::new(PasswordService::new(Argon2Config::new(
        config.password.cost,
        config.password.memory_cost_kib,
        config.password.parallelism,
    ))?);
    let token_service = Arc::new(TokenService::new(
        TokenConfig::new(config.auth.signing_secret.clone())
            .with_issuer(config.auth.issuer.clone())
            .with_expiry_secs(config.auth.token_expiry_secs),
    )?);
    info!("Auth services initialized");

    let customers_state = CustomersState::new(
        &stores,
        password_service,
        token_service,
        Arc::new(LoggingNotifier),
    );
    let health_state = HealthState::new(db, Some(env!("CARGO_PKG_VERSION").to_string()));

    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/api/customers", customers_router(customers_state))
        .merge(health_router(health_state))
        .split_for_parts();

    if let Some(components) = openapi.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
    openapi.info.title = "BankCore Platform API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description = Some("Customer onboarding: registration, login and profile management".to_string());

    let app = Router::new()
        .merge(router)
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.http.cors_origins));

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("BankCore Platform Server shutdown complete");
    Ok(())
}

/// Allow any origin when none are configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}
