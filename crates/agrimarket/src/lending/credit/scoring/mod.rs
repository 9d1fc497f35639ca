mod config;
pub(crate) mod factors;
pub(crate) mod rating;

pub use config::{BlendWeights, ScoringConfig};

use chrono::{DateTime, Utc};

use super::domain::{CreditScoreResult, ScoreFactors, ScoreInputs, UserId};

/// Stateless calculator mapping an activity bundle to a credit score. Given
/// identical inputs and the same computation instant it always produces the
/// same result.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, user_id: &UserId, inputs: &ScoreInputs, now: DateTime<Utc>) -> CreditScoreResult {
        let factors = ScoreFactors {
            farm_completeness: factors::farm_completeness(&inputs.farms, inputs.crops.len()),
            diagnostic_activity: factors::diagnostic_activity(
                &inputs.diagnostics,
                now,
                self.config.diagnostic_window_days,
            ),
            payment_history: factors::payment_history(&inputs.loans),
            yield_performance: factors::yield_performance(&inputs.crops),
            subscription: factors::subscription_signal(inputs.subscription.as_ref()),
        };

        let raw = self.config.weights.blend(&factors);
        let score = rating::scale_score(raw, &self.config);

        let repayment_capacity = factors.payment_history.round() as u8;
        let farm_viability =
            (0.5 * factors.farm_completeness + 0.5 * factors.yield_performance).round() as u8;

        CreditScoreResult {
            user_id: user_id.clone(),
            score,
            risk_level: rating::risk_level(score),
            repayment_capacity,
            farm_viability,
            max_loan_eligible: rating::loan_ceiling(score, &self.config),
            factors,
            calculated_at: now,
        }
    }
}
