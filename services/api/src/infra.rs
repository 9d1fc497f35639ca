use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use agrimarket::lending::credit::{
    ActivityStore, CachePolicy, CropRecord, DiagnosticRecord, FarmProfile, LoanApplication,
    LoanStatus, ScoreLedger, ScoreLedgerEntry, ScoringConfig, StoreError, SubscriptionRecord,
    SubscriptionStatus, UserId,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Per-user activity records held in memory. Stands in for the relational
/// stores until the persistence adapters land.
#[derive(Debug, Clone, Default)]
pub(crate) struct FarmerAccount {
    pub(crate) farms: Vec<FarmProfile>,
    pub(crate) diagnostics: Vec<DiagnosticRecord>,
    pub(crate) loans: Vec<LoanApplication>,
    pub(crate) crops: Vec<CropRecord>,
    pub(crate) subscription: Option<SubscriptionRecord>,
}

#[derive(Default)]
pub(crate) struct InMemoryActivityStore {
    accounts: Mutex<HashMap<UserId, FarmerAccount>>,
}

impl InMemoryActivityStore {
    pub(crate) fn upsert(&self, user: &UserId, account: FarmerAccount) {
        let mut guard = self.accounts.lock().expect("activity mutex poisoned");
        guard.insert(user.clone(), account);
    }

    fn account(&self, user: &UserId) -> FarmerAccount {
        let guard = self.accounts.lock().expect("activity mutex poisoned");
        guard.get(user).cloned().unwrap_or_default()
    }
}

impl ActivityStore for InMemoryActivityStore {
    fn farms(&self, user: &UserId) -> Result<Vec<FarmProfile>, StoreError> {
        Ok(self.account(user).farms)
    }

    fn diagnostics(&self, user: &UserId) -> Result<Vec<DiagnosticRecord>, StoreError> {
        Ok(self.account(user).diagnostics)
    }

    fn loans(&self, user: &UserId) -> Result<Vec<LoanApplication>, StoreError> {
        Ok(self.account(user).loans)
    }

    fn crops(&self, user: &UserId) -> Result<Vec<CropRecord>, StoreError> {
        Ok(self.account(user).crops)
    }

    fn subscription(&self, user: &UserId) -> Result<Option<SubscriptionRecord>, StoreError> {
        Ok(self.account(user).subscription)
    }
}

/// Append-only in-memory score ledger.
#[derive(Default)]
pub(crate) struct InMemoryScoreLedger {
    entries: Mutex<Vec<ScoreLedgerEntry>>,
}

impl ScoreLedger for InMemoryScoreLedger {
    fn latest(&self, user: &UserId) -> Result<Option<ScoreLedgerEntry>, StoreError> {
        let guard = self.entries.lock().expect("ledger mutex poisoned");
        Ok(guard
            .iter()
            .filter(|entry| &entry.user_id == user)
            .max_by_key(|entry| entry.calculated_at)
            .cloned())
    }

    fn append(&self, entry: ScoreLedgerEntry) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().expect("ledger mutex poisoned");
        guard.push(entry);
        Ok(())
    }

    fn history(&self, user: &UserId, limit: usize) -> Result<Vec<ScoreLedgerEntry>, StoreError> {
        let guard = self.entries.lock().expect("ledger mutex poisoned");
        let mut entries: Vec<ScoreLedgerEntry> = guard
            .iter()
            .filter(|entry| &entry.user_id == user)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.calculated_at));
        entries.truncate(limit);
        Ok(entries)
    }
}

pub(crate) fn default_scoring_config() -> ScoringConfig {
    ScoringConfig::standard()
}

pub(crate) fn cache_policy_from_hours(hours: i64) -> CachePolicy {
    CachePolicy::with_max_age_hours(hours)
}

pub(crate) fn demo_user() -> UserId {
    UserId("farmer-demo".to_string())
}

/// A believable mid-season account for the demo and the dev server.
pub(crate) fn demo_account(as_of: DateTime<Utc>) -> FarmerAccount {
    let season_start = as_of.date_naive() - Duration::days(120);

    FarmerAccount {
        farms: vec![FarmProfile {
            name: Some("Kijani Ridge Farm".to_string()),
            location: Some("Eldoret".to_string()),
            size_hectares: Some(3.2),
            soil_type: Some("Clay loam".to_string()),
            water_source: Some("River intake".to_string()),
            description: None,
        }],
        diagnostics: vec![
            DiagnosticRecord {
                crop: Some("Maize".to_string()),
                summary: Some("Rust spotting on lower leaves".to_string()),
                created_at: as_of - Duration::days(6),
            },
            DiagnosticRecord {
                crop: Some("Maize".to_string()),
                summary: Some("Follow-up scan, clear".to_string()),
                created_at: as_of - Duration::days(20),
            },
            DiagnosticRecord {
                crop: Some("Beans".to_string()),
                summary: Some("Aphid pressure, low".to_string()),
                created_at: as_of - Duration::days(47),
            },
        ],
        loans: vec![LoanApplication {
            amount: 80_000,
            applied_at: season_start,
            status: LoanStatus::Repaid,
        }],
        crops: vec![
            CropRecord {
                name: "Maize".to_string(),
                area_hectares: Some(1.8),
                planted_at: Some(season_start),
                expected_yield: Some(4.0),
                actual_yield: Some(3.6),
            },
            CropRecord {
                name: "Beans".to_string(),
                area_hectares: Some(0.9),
                planted_at: Some(season_start + Duration::days(10)),
                expected_yield: Some(1.2),
                actual_yield: Some(1.3),
            },
            CropRecord {
                name: "Kale".to_string(),
                area_hectares: Some(0.5),
                planted_at: Some(season_start + Duration::days(30)),
                expected_yield: Some(2.0),
                actual_yield: None,
            },
        ],
        subscription: Some(SubscriptionRecord {
            plan: "pro".to_string(),
            status: SubscriptionStatus::Active,
        }),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
