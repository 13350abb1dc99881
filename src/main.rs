//! Fitadmin server binary.
//!
//! Wires configuration, Postgres, the parameter cache, and local file
//! storage into the API router, then serves it until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fitadmin::adapters::http::{
    api_router, ApiContext, MachineAppState, ParameterAppState, UploadAppState, VideoAppState,
};
use fitadmin::adapters::{
    InMemoryParameterCache, InvalidatingParameterRepository, LocalFileStorage,
    PostgresMachineRepository, PostgresParameterRepository, PostgresVideoRepository,
    RedisParameterCache,
};
use fitadmin::application::ParameterStore;
use fitadmin::config::{AppConfig, ServerConfig};
use fitadmin::ports::{FileStorage, ParameterCache};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);
    info!(environment = ?config.server.environment, "Starting fitadmin");

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;
    info!("Connected to Postgres");

    let cache: Arc<dyn ParameterCache> = match &config.redis {
        Some(redis_config) => {
            let client = redis::Client::open(redis_config.url.as_str())?;
            let connection = client.get_multiplexed_tokio_connection().await?;
            info!("Parameter cache backed by Redis");
            Arc::new(RedisParameterCache::new(connection))
        }
        None => {
            info!("Parameter cache held in process memory");
            Arc::new(InMemoryParameterCache::new())
        }
    };

    let parameters = Arc::new(InvalidatingParameterRepository::new(
        PostgresParameterRepository::new(pool.clone()),
        Arc::clone(&cache),
    ));
    let store = Arc::new(ParameterStore::new(parameters, cache, config.cache.ttl()));
    let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(&config.storage));

    let context = ApiContext {
        parameters: ParameterAppState { store },
        machines: MachineAppState {
            machines: Arc::new(PostgresMachineRepository::new(pool.clone())),
        },
        videos: VideoAppState {
            videos: Arc::new(PostgresVideoRepository::new(pool)),
            storage: Arc::clone(&storage),
        },
        uploads: UploadAppState { storage },
    };

    let app = api_router(context, &config.storage)
        .layer(cors_layer(&config.server))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Log filter comes from `RUST_LOG` when set, falling back to the
/// configured level. Production gets JSON lines for log shippers.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// CORS policy from configuration. Without configured origins the API
/// answers any origin, which suits local development.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(60 * 60));

    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring unparseable CORS origin {origin}");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Resolves once the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
