use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::analytics::{self, ReportingWindow, YieldAnalytics};
use super::domain::{CreditScoreResult, ScoreFactors, ScoreInputs, UserId};
use super::freshness::{self, CachePolicy, CacheState};
use super::repository::{ActivityStore, ScoreLedger, ScoreLedgerEntry, StoreError};
use super::scoring::{rating, ScoringConfig, ScoringEngine};

/// Service composing the activity reads, the scoring engine, and the score
/// ledger with its freshness policy.
pub struct CreditScoreService<S, L> {
    activity: Arc<S>,
    ledger: Arc<L>,
    engine: ScoringEngine,
    policy: CachePolicy,
}

/// Result of a score lookup: the score itself plus whether it was computed
/// on this call or served from the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditScoreOutcome {
    pub result: CreditScoreResult,
    pub is_new: bool,
}

impl<S, L> CreditScoreService<S, L>
where
    S: ActivityStore + 'static,
    L: ScoreLedger + 'static,
{
    pub fn new(activity: Arc<S>, ledger: Arc<L>, config: ScoringConfig, policy: CachePolicy) -> Self {
        Self {
            activity,
            ledger,
            engine: ScoringEngine::new(config),
            policy,
        }
    }

    /// Serve the user's score, recomputing only when the latest ledger entry
    /// is stale. A failed append is logged and the computed score is still
    /// returned; the ledger is a cache, not a gate.
    pub fn get_credit_score(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<CreditScoreOutcome, StoreError> {
        let latest = self.ledger.latest(user)?;
        let state = freshness::classify(
            latest.as_ref().map(|entry| entry.calculated_at),
            now,
            &self.policy,
        );

        if let (CacheState::Fresh, Some(entry)) = (state, latest) {
            let result = rebuild_cached(entry, self.engine.config())?;
            return Ok(CreditScoreOutcome {
                result,
                is_new: false,
            });
        }

        let result = self.compute_score(user, now)?;
        if let Err(err) = self.ledger.append(ScoreLedgerEntry::from_result(&result)) {
            warn!(
                user_id = %user.0,
                error = %err,
                "failed to persist credit score; serving the computed result"
            );
        }

        Ok(CreditScoreOutcome {
            result,
            is_new: true,
        })
    }

    /// Compute a score directly from the collaborator stores, bypassing the
    /// ledger. Never fails for an empty account; any store read failure
    /// propagates untouched so a partial fetch cannot masquerade as a score.
    pub fn compute_score(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<CreditScoreResult, StoreError> {
        let inputs = self.gather_inputs(user)?;
        Ok(self.engine.score(user, &inputs, now))
    }

    /// Recent ledger entries for audit views, most recent first.
    pub fn score_history(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<ScoreLedgerEntry>, StoreError> {
        self.ledger.history(user, limit)
    }

    /// Yield analytics over the user's crops for an optional planting-date
    /// window.
    pub fn yield_report(
        &self,
        user: &UserId,
        window: &ReportingWindow,
    ) -> Result<YieldAnalytics, StoreError> {
        let crops = self.activity.crops(user)?;
        Ok(analytics::analyze(&crops, window))
    }

    fn gather_inputs(&self, user: &UserId) -> Result<ScoreInputs, StoreError> {
        Ok(ScoreInputs {
            farms: self.activity.farms(user)?,
            diagnostics: self.activity.diagnostics(user)?,
            loans: self.activity.loans(user)?,
            crops: self.activity.crops(user)?,
            subscription: self.activity.subscription(user)?,
        })
    }
}

/// Rebuild a result from a cached ledger entry, re-deriving anything the
/// entry does not store verbatim.
fn rebuild_cached(
    entry: ScoreLedgerEntry,
    config: &ScoringConfig,
) -> Result<CreditScoreResult, StoreError> {
    let max_loan_eligible = entry
        .factors
        .get("max_loan_eligible")
        .and_then(serde_json::Value::as_u64)
        .map(|value| value as u32)
        .unwrap_or_else(|| rating::loan_ceiling(entry.score, config));

    let factors: ScoreFactors = serde_json::from_value(entry.factors)
        .map_err(|err| StoreError::Malformed(format!("score factor blob: {err}")))?;

    Ok(CreditScoreResult {
        user_id: entry.user_id,
        score: entry.score,
        risk_level: entry.risk_level,
        repayment_capacity: entry.repayment_capacity,
        farm_viability: entry.farm_viability,
        factors,
        max_loan_eligible,
        calculated_at: entry.calculated_at,
    })
}
