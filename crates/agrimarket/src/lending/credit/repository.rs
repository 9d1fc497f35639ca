use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    CreditScoreResult, CropRecord, DiagnosticRecord, FarmProfile, LoanApplication, RiskLevel,
    SubscriptionRecord, UserId,
};

/// Read-side collaborator exposing a farmer's platform activity. Each method
/// returns only records owned by the given user; ownership resolution lives
/// in the store, not here.
pub trait ActivityStore: Send + Sync {
    fn farms(&self, user: &UserId) -> Result<Vec<FarmProfile>, StoreError>;
    fn diagnostics(&self, user: &UserId) -> Result<Vec<DiagnosticRecord>, StoreError>;
    fn loans(&self, user: &UserId) -> Result<Vec<LoanApplication>, StoreError>;
    fn crops(&self, user: &UserId) -> Result<Vec<CropRecord>, StoreError>;
    fn subscription(&self, user: &UserId) -> Result<Option<SubscriptionRecord>, StoreError>;
}

/// Append-only history of computed scores. Entries are never updated in
/// place; a recomputation appends and supersedes. Duplicate entries from
/// racing computations are acceptable, so `append` has no uniqueness
/// contract.
pub trait ScoreLedger: Send + Sync {
    /// The entry with the greatest `calculated_at` for the user, if any.
    fn latest(&self, user: &UserId) -> Result<Option<ScoreLedgerEntry>, StoreError>;
    fn append(&self, entry: ScoreLedgerEntry) -> Result<(), StoreError>;
    /// Recent entries, most recent first, at most `limit`.
    fn history(&self, user: &UserId, limit: usize) -> Result<Vec<ScoreLedgerEntry>, StoreError>;
}

/// Persisted form of a computed score. The factor breakdown is stored as a
/// JSON blob so the ledger schema survives factor additions; the blob also
/// carries `max_loan_eligible`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLedgerEntry {
    pub user_id: UserId,
    pub score: u16,
    pub risk_level: RiskLevel,
    pub repayment_capacity: u8,
    pub farm_viability: u8,
    pub factors: serde_json::Value,
    pub calculated_at: DateTime<Utc>,
}

impl ScoreLedgerEntry {
    pub fn from_result(result: &CreditScoreResult) -> Self {
        Self {
            user_id: result.user_id.clone(),
            score: result.score,
            risk_level: result.risk_level,
            repayment_capacity: result.repayment_capacity,
            farm_viability: result.farm_viability,
            factors: json!({
                "farm_completeness": result.factors.farm_completeness,
                "diagnostic_activity": result.factors.diagnostic_activity,
                "payment_history": result.factors.payment_history,
                "yield_performance": result.factors.yield_performance,
                "subscription": result.factors.subscription,
                "max_loan_eligible": result.max_loan_eligible,
            }),
            calculated_at: result.calculated_at,
        }
    }
}

/// Error enumeration for collaborator-store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("stored record malformed: {0}")]
    Malformed(String),
}
