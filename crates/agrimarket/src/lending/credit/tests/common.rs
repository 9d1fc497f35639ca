use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::lending::credit::domain::{
    CropRecord, DiagnosticRecord, FarmProfile, LoanApplication, LoanStatus, ScoreInputs,
    SubscriptionRecord, SubscriptionStatus, UserId,
};
use crate::lending::credit::repository::{
    ActivityStore, ScoreLedger, ScoreLedgerEntry, StoreError,
};
use crate::lending::credit::router::SessionContext;
use crate::lending::credit::{
    credit_router, CachePolicy, CreditScoreService, ScoringConfig, ScoringEngine,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn user(suffix: &str) -> UserId {
    UserId(format!("farmer-{suffix}"))
}

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig::standard()
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(scoring_config())
}

pub(super) fn full_farm() -> FarmProfile {
    FarmProfile {
        name: Some("Green Valley Farm".to_string()),
        location: Some("Nakuru".to_string()),
        size_hectares: Some(4.5),
        soil_type: Some("Loam".to_string()),
        water_source: Some("Borehole".to_string()),
        description: Some("Mixed maize and horticulture holding".to_string()),
    }
}

pub(super) fn partial_farm(filled: u32) -> FarmProfile {
    let mut farm = FarmProfile::default();
    if filled >= 1 {
        farm.name = Some("Green Valley Farm".to_string());
    }
    if filled >= 2 {
        farm.location = Some("Nakuru".to_string());
    }
    if filled >= 3 {
        farm.size_hectares = Some(4.5);
    }
    if filled >= 4 {
        farm.soil_type = Some("Loam".to_string());
    }
    if filled >= 5 {
        farm.water_source = Some("Borehole".to_string());
    }
    if filled >= 6 {
        farm.description = Some("Mixed maize and horticulture holding".to_string());
    }
    farm
}

pub(super) fn diagnostic_days_ago(days: i64) -> DiagnosticRecord {
    DiagnosticRecord {
        crop: Some("Maize".to_string()),
        summary: Some("Leaf blight scan".to_string()),
        created_at: now() - Duration::days(days),
    }
}

pub(super) fn loan(status: LoanStatus) -> LoanApplication {
    LoanApplication {
        amount: 50_000,
        applied_at: NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date"),
        status,
    }
}

pub(super) fn crop_with_yield(name: &str, expected: f64, actual: f64) -> CropRecord {
    CropRecord {
        name: name.to_string(),
        area_hectares: Some(1.2),
        planted_at: Some(NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")),
        expected_yield: Some(expected),
        actual_yield: Some(actual),
    }
}

pub(super) fn crop_unreported(name: &str) -> CropRecord {
    CropRecord {
        name: name.to_string(),
        area_hectares: Some(0.8),
        planted_at: Some(NaiveDate::from_ymd_opt(2026, 4, 10).expect("valid date")),
        expected_yield: Some(2.0),
        actual_yield: None,
    }
}

pub(super) fn subscription(status: SubscriptionStatus) -> SubscriptionRecord {
    SubscriptionRecord {
        plan: "pro".to_string(),
        status,
    }
}

pub(super) fn empty_inputs() -> ScoreInputs {
    ScoreInputs::default()
}

/// The fully-worked strong account: complete profile, saturated diagnostics,
/// one repaid loan, three on-target harvests, active subscription.
pub(super) fn excellent_inputs() -> ScoreInputs {
    ScoreInputs {
        farms: vec![full_farm()],
        diagnostics: (0..5).map(|days| diagnostic_days_ago(days * 7)).collect(),
        loans: vec![loan(LoanStatus::Repaid)],
        crops: vec![
            crop_with_yield("Maize", 3.0, 3.0),
            crop_with_yield("Beans", 1.5, 1.5),
            crop_with_yield("Kale", 2.2, 2.2),
        ],
        subscription: Some(subscription(SubscriptionStatus::Active)),
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct AccountSeed {
    pub(super) farms: Vec<FarmProfile>,
    pub(super) diagnostics: Vec<DiagnosticRecord>,
    pub(super) loans: Vec<LoanApplication>,
    pub(super) crops: Vec<CropRecord>,
    pub(super) subscription: Option<SubscriptionRecord>,
}

impl AccountSeed {
    pub(super) fn from_inputs(inputs: &ScoreInputs) -> Self {
        Self {
            farms: inputs.farms.clone(),
            diagnostics: inputs.diagnostics.clone(),
            loans: inputs.loans.clone(),
            crops: inputs.crops.clone(),
            subscription: inputs.subscription.clone(),
        }
    }
}

/// In-memory activity store. Unknown users read as brand-new accounts with
/// no records, matching the real stores.
#[derive(Default)]
pub(super) struct MemoryActivityStore {
    accounts: Mutex<HashMap<UserId, AccountSeed>>,
}

impl MemoryActivityStore {
    pub(super) fn seed(&self, user: &UserId, seed: AccountSeed) {
        self.accounts
            .lock()
            .expect("activity mutex poisoned")
            .insert(user.clone(), seed);
    }

    fn read<T>(&self, user: &UserId, f: impl Fn(&AccountSeed) -> T, empty: T) -> T {
        let guard = self.accounts.lock().expect("activity mutex poisoned");
        guard.get(user).map(|seed| f(seed)).unwrap_or(empty)
    }
}

impl ActivityStore for MemoryActivityStore {
    fn farms(&self, user: &UserId) -> Result<Vec<FarmProfile>, StoreError> {
        Ok(self.read(user, |seed| seed.farms.clone(), Vec::new()))
    }

    fn diagnostics(&self, user: &UserId) -> Result<Vec<DiagnosticRecord>, StoreError> {
        Ok(self.read(user, |seed| seed.diagnostics.clone(), Vec::new()))
    }

    fn loans(&self, user: &UserId) -> Result<Vec<LoanApplication>, StoreError> {
        Ok(self.read(user, |seed| seed.loans.clone(), Vec::new()))
    }

    fn crops(&self, user: &UserId) -> Result<Vec<CropRecord>, StoreError> {
        Ok(self.read(user, |seed| seed.crops.clone(), Vec::new()))
    }

    fn subscription(&self, user: &UserId) -> Result<Option<SubscriptionRecord>, StoreError> {
        Ok(self.read(user, |seed| seed.subscription.clone(), None))
    }
}

/// Append-only in-memory ledger backed by a single growing vector.
#[derive(Default)]
pub(super) struct MemoryLedger {
    entries: Mutex<Vec<ScoreLedgerEntry>>,
}

impl MemoryLedger {
    pub(super) fn entries_for(&self, user: &UserId) -> Vec<ScoreLedgerEntry> {
        self.entries
            .lock()
            .expect("ledger mutex poisoned")
            .iter()
            .filter(|entry| &entry.user_id == user)
            .cloned()
            .collect()
    }
}

impl ScoreLedger for MemoryLedger {
    fn latest(&self, user: &UserId) -> Result<Option<ScoreLedgerEntry>, StoreError> {
        let guard = self.entries.lock().expect("ledger mutex poisoned");
        Ok(guard
            .iter()
            .filter(|entry| &entry.user_id == user)
            .max_by_key(|entry| entry.calculated_at)
            .cloned())
    }

    fn append(&self, entry: ScoreLedgerEntry) -> Result<(), StoreError> {
        self.entries
            .lock()
            .expect("ledger mutex poisoned")
            .push(entry);
        Ok(())
    }

    fn history(&self, user: &UserId, limit: usize) -> Result<Vec<ScoreLedgerEntry>, StoreError> {
        let mut entries = self.entries_for(user);
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.calculated_at));
        entries.truncate(limit);
        Ok(entries)
    }
}

pub(super) struct UnavailableActivityStore;

impl ActivityStore for UnavailableActivityStore {
    fn farms(&self, _user: &UserId) -> Result<Vec<FarmProfile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn diagnostics(&self, _user: &UserId) -> Result<Vec<DiagnosticRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn loans(&self, _user: &UserId) -> Result<Vec<LoanApplication>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn crops(&self, _user: &UserId) -> Result<Vec<CropRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn subscription(&self, _user: &UserId) -> Result<Option<SubscriptionRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Ledger whose reads succeed but whose writes always fail, for the
/// persistence-is-best-effort path.
#[derive(Default)]
pub(super) struct WriteFailingLedger;

impl ScoreLedger for WriteFailingLedger {
    fn latest(&self, _user: &UserId) -> Result<Option<ScoreLedgerEntry>, StoreError> {
        Ok(None)
    }

    fn append(&self, _entry: ScoreLedgerEntry) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("ledger write rejected".to_string()))
    }

    fn history(&self, _user: &UserId, _limit: usize) -> Result<Vec<ScoreLedgerEntry>, StoreError> {
        Ok(Vec::new())
    }
}

pub(super) fn build_service() -> (
    CreditScoreService<MemoryActivityStore, MemoryLedger>,
    Arc<MemoryActivityStore>,
    Arc<MemoryLedger>,
) {
    let activity = Arc::new(MemoryActivityStore::default());
    let ledger = Arc::new(MemoryLedger::default());
    let service = CreditScoreService::new(
        activity.clone(),
        ledger.clone(),
        scoring_config(),
        CachePolicy::standard(),
    );
    (service, activity, ledger)
}

pub(super) fn credit_router_with_session(
    service: CreditScoreService<MemoryActivityStore, MemoryLedger>,
    session: Option<SessionContext>,
) -> axum::Router {
    let router = credit_router(Arc::new(service));
    match session {
        Some(context) => router.layer(axum::Extension(context)),
        None => router,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
