//! Application startup and lifecycle management.

use crate::config::A11yConfig;
use crate::handlers;
use crate::services::providers::openai::OpenAiChatProvider;
use crate::services::providers::ChatProvider;
use crate::services::scanner::pa11y::Pa11yRunner;
use crate::services::scanner::AccessibilityRunner;
use crate::services::{AnalysisService, ExplanationService, LearningService, QuizService};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors::cors_layer,
    metrics::metrics_middleware,
    rate_limit::{ip_rate_limit_middleware, spawn_limiter_cleanup, IpRateLimit},
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: A11yConfig,
    pub analysis: AnalysisService,
    pub explanations: ExplanationService,
    pub learning: LearningService,
    pub quizzes: QuizService,
    pub analyse_rate_limit: IpRateLimit,
}

impl AppState {
    pub fn new(
        config: A11yConfig,
        runner: Arc<dyn AccessibilityRunner>,
        provider: Arc<dyn ChatProvider>,
    ) -> Self {
        let analyse_rate_limit = IpRateLimit::new(
            config.rate_limit.analyse_per_minute,
            config.rate_limit.trust_proxy_headers,
        );

        Self {
            analysis: AnalysisService::new(runner),
            explanations: ExplanationService::new(provider.clone()),
            learning: LearningService::new(provider.clone()),
            quizzes: QuizService::new(provider),
            analyse_rate_limit,
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Scans launch a browser, so they get their own per-IP budget.
    let analyse_route = Router::new()
        .route("/api/v1/analyse", post(handlers::analysis::analyse))
        .layer(from_fn_with_state(
            state.analyse_rate_limit.clone(),
            ip_rate_limit_middleware,
        ));

    let allowed_origins = state.config.cors.allowed_origins.clone();

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/api/v1/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .merge(analyse_route)
        .route(
            "/api/v1/explain-issue",
            post(handlers::explanation::explain_issue),
        )
        .route(
            "/api/v1/learning",
            post(handlers::learning::generate_learning_content),
        )
        .route(
            "/api/v1/learning/:code",
            get(handlers::learning::get_learning_content),
        )
        .route("/api/v1/quiz/generate", post(handlers::quiz::generate_quiz))
        .route("/api/v1/quiz/evaluate", post(handlers::quiz::evaluate_quiz))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(allowed_origins))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Wire the production runner and provider and bind the listener.
    /// Port 0 binds a random port.
    pub async fn build(config: A11yConfig) -> Result<Self, AppError> {
        let runner: Arc<dyn AccessibilityRunner> = Arc::new(Pa11yRunner::new(&config.scanner));
        let provider = OpenAiChatProvider::new(&config.openai)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("OpenAI client: {}", e)))?;

        if provider.is_configured() {
            tracing::info!(model = %config.openai.model, "Initialized OpenAI chat provider");
        } else {
            tracing::warn!("OPENAI_API_KEY not set; AI features are disabled");
        }

        let state = AppState::new(config.clone(), runner, Arc::new(provider));
        Self::with_state(state).await
    }

    /// Bind a listener for an already-assembled state.
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Accessibility analyzer listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let cleanup = spawn_limiter_cleanup(
            self.state.analyse_rate_limit.limiter.clone(),
            RATE_LIMIT_CLEANUP_INTERVAL,
        );
        let router = build_router(self.state);

        let served = axum::serve(
            self.listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        cleanup.abort();
        served
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
