use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::analytics::ReportingWindow;
use super::domain::{ScoreFactors, UserId};
use super::repository::{ActivityStore, ScoreLedger, ScoreLedgerEntry};
use super::service::{CreditScoreOutcome, CreditScoreService};

/// Identity established by the session middleware fronting this router.
/// Handlers take the user from here and never from the request payload.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: UserId,
}

/// Router builder exposing the credit endpoints.
pub fn credit_router<S, L>(service: Arc<CreditScoreService<S, L>>) -> Router
where
    S: ActivityStore + 'static,
    L: ScoreLedger + 'static,
{
    Router::new()
        .route("/api/v1/credit/score", get(score_handler::<S, L>))
        .route("/api/v1/credit/history", get(history_handler::<S, L>))
        .route(
            "/api/v1/credit/yield-report",
            post(yield_report_handler::<S, L>),
        )
        .with_state(service)
}

/// Caller-facing projection of a score lookup.
#[derive(Debug, Clone, Serialize)]
pub struct CreditScoreView {
    pub user_id: String,
    pub score: u16,
    pub risk_level: &'static str,
    pub repayment_capacity: u8,
    pub farm_viability: u8,
    pub factors: ScoreFactors,
    pub max_loan_eligible: u32,
    pub calculated_at: DateTime<Utc>,
    pub is_new: bool,
}

impl From<CreditScoreOutcome> for CreditScoreView {
    fn from(outcome: CreditScoreOutcome) -> Self {
        let CreditScoreOutcome { result, is_new } = outcome;
        Self {
            user_id: result.user_id.0,
            score: result.score,
            risk_level: result.risk_level.label(),
            repayment_capacity: result.repayment_capacity,
            farm_viability: result.farm_viability,
            factors: result.factors,
            max_loan_eligible: result.max_loan_eligible,
            calculated_at: result.calculated_at,
            is_new,
        }
    }
}

/// Compact audit line for the history endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreHistoryView {
    pub score: u16,
    pub risk_level: &'static str,
    pub calculated_at: DateTime<Utc>,
}

impl From<&ScoreLedgerEntry> for ScoreHistoryView {
    fn from(entry: &ScoreLedgerEntry) -> Self {
        Self {
            score: entry.score,
            risk_level: entry.risk_level.label(),
            calculated_at: entry.calculated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct YieldReportRequest {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

const HISTORY_LIMIT: usize = 12;

pub(crate) async fn score_handler<S, L>(
    State(service): State<Arc<CreditScoreService<S, L>>>,
    session: Option<Extension<SessionContext>>,
) -> Response
where
    S: ActivityStore + 'static,
    L: ScoreLedger + 'static,
{
    let Some(Extension(session)) = session else {
        return unauthenticated();
    };

    match service.get_credit_score(&session.user_id, Utc::now()) {
        Ok(outcome) => {
            (StatusCode::OK, axum::Json(CreditScoreView::from(outcome))).into_response()
        }
        Err(err) => store_failure(err),
    }
}

pub(crate) async fn history_handler<S, L>(
    State(service): State<Arc<CreditScoreService<S, L>>>,
    session: Option<Extension<SessionContext>>,
) -> Response
where
    S: ActivityStore + 'static,
    L: ScoreLedger + 'static,
{
    let Some(Extension(session)) = session else {
        return unauthenticated();
    };

    match service.score_history(&session.user_id, HISTORY_LIMIT) {
        Ok(entries) => {
            let views: Vec<ScoreHistoryView> =
                entries.iter().map(ScoreHistoryView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => store_failure(err),
    }
}

pub(crate) async fn yield_report_handler<S, L>(
    State(service): State<Arc<CreditScoreService<S, L>>>,
    session: Option<Extension<SessionContext>>,
    request: Option<axum::Json<YieldReportRequest>>,
) -> Response
where
    S: ActivityStore + 'static,
    L: ScoreLedger + 'static,
{
    let Some(Extension(session)) = session else {
        return unauthenticated();
    };

    let request = request.map(|axum::Json(body)| body).unwrap_or_default();
    let window = ReportingWindow {
        from: request.from,
        to: request.to,
    };

    match service.yield_report(&session.user_id, &window) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => store_failure(err),
    }
}

fn unauthenticated() -> Response {
    let payload = json!({ "error": "authentication required" });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn store_failure(err: super::repository::StoreError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
