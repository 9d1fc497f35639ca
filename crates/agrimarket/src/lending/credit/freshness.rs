//! Staleness policy for cached credit scores: a two-state machine whose only
//! transition is driven by elapsed time, independent of the scoring formula.

use chrono::{DateTime, Duration, Utc};

/// How long a ledger entry may serve reads before it must be recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age: Duration,
}

impl CachePolicy {
    /// The marketplace default: recompute once a day.
    pub fn standard() -> Self {
        Self {
            max_age: Duration::hours(24),
        }
    }

    pub fn with_max_age_hours(hours: i64) -> Self {
        Self {
            max_age: Duration::hours(hours),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Fresh,
    Stale,
}

/// Classify the latest ledger timestamp against the policy window. An entry
/// aged exactly the window is still fresh; "older than" is strict.
pub fn classify(
    last_calculated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    policy: &CachePolicy,
) -> CacheState {
    match last_calculated {
        Some(calculated_at) if now.signed_duration_since(calculated_at) <= policy.max_age => {
            CacheState::Fresh
        }
        _ => CacheState::Stale,
    }
}
