pub mod advisor;
pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod session;
pub mod state;
pub mod validate;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Public routes plus the session-guarded, rate-limited `/api/ai` and
/// `/api/pmp` trees.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        // Advisory
        .route("/api/ai/breakdown-task", post(routes::ai::breakdown_task))
        .route(
            "/api/ai/analyze-timeline",
            post(routes::ai::analyze_timeline),
        )
        .route(
            "/api/ai/analyze-scope-change",
            post(routes::ai::analyze_scope_change),
        )
        .route(
            "/api/ai/analyze-communications",
            post(routes::ai::analyze_communications),
        )
        .route(
            "/api/ai/optimize-resources",
            post(routes::ai::optimize_resources),
        )
        .route("/api/ai/query", post(routes::ai::query))
        // PMP advisory
        .route("/api/pmp/analyze-charter", post(routes::pmp::analyze_charter))
        .route("/api/pmp/optimize-wbs", post(routes::pmp::optimize_wbs))
        .route("/api/pmp/analyze-evm", post(routes::pmp::analyze_evm))
        .route(
            "/api/pmp/enhance-risk-management",
            post(routes::pmp::enhance_risk_management),
        )
        .route("/api/pmp/analyze-quality", post(routes::pmp::analyze_quality))
        .route(
            "/api/pmp/enhance-stakeholder-management",
            post(routes::pmp::enhance_stakeholder_management),
        )
        .route(
            "/api/pmp/optimize-resources",
            post(routes::pmp::optimize_resources),
        )
        .route(
            "/api/pmp/coordinate-integration",
            post(routes::pmp::coordinate_integration),
        )
        // PMP assessments
        .route(
            "/api/pmp/validate-compliance",
            post(routes::pmp::validate_compliance),
        )
        .route(
            "/api/pmp/process-group-status",
            post(routes::pmp::process_group_status),
        )
        .route(
            "/api/pmp/assess-knowledge-areas",
            post(routes::pmp::assess_knowledge_areas),
        )
        // Layers run bottom-up: the rate limit is checked before the session.
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::auth_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            rate_limit::rate_limit_middleware,
        ));

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Bind `host:port` from the config and serve until the process exits.
pub async fn serve(app_state: AppState) -> anyhow::Result<()> {
    let addr = format!(
        "{}:{}",
        app_state.config.server.host, app_state.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener).await
}

/// Serve on a pre-bound listener. Client addresses are exposed to the rate
/// limiter through `ConnectInfo`.
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual = listener.local_addr()?;

    let limiter = app_state.limiter.clone();
    let sweep = Duration::from_secs(app_state.config.rate_limit.window_seconds.max(1));
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(sweep);
        loop {
            tick.tick().await;
            limiter.prune();
        }
    });

    let app = build_router(app_state);

    tracing::info!("PMP assistant listening on http://{actual}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
