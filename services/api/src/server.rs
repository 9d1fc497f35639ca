use crate::cli::ServeArgs;
use crate::infra::{
    cache_policy_from_hours, default_scoring_config, demo_account, demo_user, AppState,
    InMemoryActivityStore, InMemoryScoreLedger,
};
use crate::routes::with_credit_routes;
use agrimarket::config::AppConfig;
use agrimarket::error::AppError;
use agrimarket::lending::credit::{CreditScoreService, SessionContext};
use agrimarket::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let activity = Arc::new(InMemoryActivityStore::default());
    let ledger = Arc::new(InMemoryScoreLedger::default());
    activity.upsert(&demo_user(), demo_account(Utc::now()));

    let credit_service = Arc::new(CreditScoreService::new(
        activity,
        ledger,
        default_scoring_config(),
        cache_policy_from_hours(config.score_cache.max_age_hours),
    ));

    // Stand-in for the session middleware: every request carries the seeded
    // demo identity until real authentication fronts this service.
    let session = SessionContext {
        user_id: demo_user(),
    };

    let app = with_credit_routes(credit_service)
        .layer(Extension(session))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credit scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
