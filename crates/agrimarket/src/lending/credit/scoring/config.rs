use serde::{Deserialize, Serialize};

use crate::lending::credit::domain::ScoreFactors;

/// Weight of each factor in the composite blend. The weights are expected to
/// sum to 1.0 so the raw blend stays in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub farm_completeness: f64,
    pub diagnostic_activity: f64,
    pub payment_history: f64,
    pub yield_performance: f64,
    pub subscription: f64,
}

impl BlendWeights {
    /// Production weights for the marketplace.
    pub fn standard() -> Self {
        Self {
            farm_completeness: 0.20,
            diagnostic_activity: 0.20,
            payment_history: 0.25,
            yield_performance: 0.20,
            subscription: 0.15,
        }
    }

    pub fn total(&self) -> f64 {
        self.farm_completeness
            + self.diagnostic_activity
            + self.payment_history
            + self.yield_performance
            + self.subscription
    }

    pub(crate) fn blend(&self, factors: &ScoreFactors) -> f64 {
        self.farm_completeness * factors.farm_completeness
            + self.diagnostic_activity * factors.diagnostic_activity
            + self.payment_history * factors.payment_history
            + self.yield_performance * factors.yield_performance
            + self.subscription * factors.subscription
    }
}

/// Tunable scoring configuration describing the blend and the score scale.
/// Per-factor caps and bonuses live as named constants next to the factor
/// functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: BlendWeights,
    /// Lookback for diagnostic activity, in days.
    pub diagnostic_window_days: i64,
    /// Lower bound of the published score scale.
    pub score_floor: u16,
    /// Upper bound of the published score scale.
    pub score_ceiling: u16,
    /// Loan ceiling granted at the top of the scale, in currency units.
    pub max_loan_ceiling: u32,
}

impl ScoringConfig {
    /// The marketplace's production scale: 300-850 with a 700 000 ceiling.
    pub fn standard() -> Self {
        Self {
            weights: BlendWeights::standard(),
            diagnostic_window_days: 90,
            score_floor: 300,
            score_ceiling: 850,
            max_loan_ceiling: 700_000,
        }
    }
}
