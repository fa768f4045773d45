use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Router,
    body::Body,
    http::Method,
    http::Request,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
    middleware,
    middleware::Next,
    response::Response,
    routing::get,
};
use bookrec_common::logging::{LoggingConfig, init_tracing};
use bookrec_common::{Catalog, DataProvider, DatasetConfig};
use clap::Parser;
use dotenvy::dotenv;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod error;
pub mod handlers;

use error::ApiError;
use handlers::{books, health, recommendations, stats, users};

const SHUTDOWN_DRAIN_GRACE: std::time::Duration = std::time::Duration::from_millis(200);
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, Parser)]
#[command(name = "bookrec-api", about = "HTTP API serving book recommendations")]
struct Cli {
    /// Server port (falls back to BOOKREC_PORT, then PORT, then 3001)
    #[arg(long)]
    port: Option<u16>,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "BOOKREC_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// Seed for the synthetic dataset (overrides BOOKREC_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of synthetic users (overrides BOOKREC_USER_COUNT)
    #[arg(long)]
    user_count: Option<usize>,

    /// Directory for daily-rotated log files (overrides BOOKREC_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// 先に見つかった変数を採用する。0 や数値以外は無視
fn parse_env_port(vars: &[&str]) -> Option<u16> {
    vars.iter()
        .find_map(|name| env::var(name).ok())
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|port| *port > 0)
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub dataset: DatasetConfig,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ApiError::BadRequest(
                "BOOKREC_CORS_ORIGINS must list explicit origins".into(),
            ));
        }

        let mut dataset = DatasetConfig::from_env();
        if let Some(seed) = cli.seed {
            dataset.seed = seed;
        }
        if let Some(user_count) = cli.user_count {
            dataset.user_count = user_count;
        }
        dataset.validate()?;

        let port = cli
            .port
            .or_else(|| parse_env_port(&["BOOKREC_PORT", "PORT"]))
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            port,
            cors_origins,
            dataset,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origins: vec!["http://localhost:3000".into()],
            dataset: DatasetConfig::default(),
        }
    }
}

pub struct AppState {
    pub provider: DataProvider,
    pub config: AppConfig,
    pub readiness: AtomicBool,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(provider: DataProvider, config: AppConfig) -> SharedState {
        Arc::new(Self {
            provider,
            config,
            readiness: AtomicBool::new(true),
        })
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    error::with_request_id(request_id, next.run(req)).await
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let api_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/:user_id/ratings", get(users::user_ratings))
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::recommendations_for_user),
        )
        .route("/books", get(books::list_books))
        .route("/stats", get(stats::summary));

    Router::new()
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

/// State over the default seeded dataset.
pub fn test_state() -> SharedState {
    let config = AppConfig::for_tests();
    let provider = DataProvider::generate(&config.dataset, Catalog::classics())
        .expect("default dataset config is valid");
    AppState::new(provider, config)
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    let cli = Cli::parse();
    init_tracing(
        &LoggingConfig::from_env(env!("CARGO_PKG_NAME")).with_log_dir(cli.log_dir.clone()),
    );

    let config = AppConfig::from_cli(cli)?;
    let provider = DataProvider::generate(&config.dataset, Catalog::classics())?;

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let state = AppState::new(provider, config);
    let app = create_router(state.clone());

    info!(%addr, users = state.provider.users().len(), "bookrec-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.readiness.store(false, Ordering::SeqCst);

    // Let load balancers observe /readyz as not ready before the listener closes.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}
