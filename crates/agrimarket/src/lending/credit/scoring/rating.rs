use super::config::ScoringConfig;
use crate::lending::credit::domain::RiskLevel;

/// Inclusive lower bounds of the risk bands, descending.
pub(crate) const EXCELLENT_FLOOR: u16 = 750;
pub(crate) const VERY_GOOD_FLOOR: u16 = 700;
pub(crate) const GOOD_FLOOR: u16 = 650;
pub(crate) const FAIR_FLOOR: u16 = 600;
pub(crate) const POOR_FLOOR: u16 = 550;

/// Map a raw blend in [0, 100] linearly onto the published score scale.
pub(crate) fn scale_score(raw: f64, config: &ScoringConfig) -> u16 {
    let raw = raw.clamp(0.0, 100.0);
    let span = f64::from(config.score_ceiling - config.score_floor);
    let score = (f64::from(config.score_floor) + raw / 100.0 * span).round() as u16;
    score.clamp(config.score_floor, config.score_ceiling)
}

pub(crate) fn risk_level(score: u16) -> RiskLevel {
    if score >= EXCELLENT_FLOOR {
        RiskLevel::Excellent
    } else if score >= VERY_GOOD_FLOOR {
        RiskLevel::VeryGood
    } else if score >= GOOD_FLOOR {
        RiskLevel::Good
    } else if score >= FAIR_FLOOR {
        RiskLevel::Fair
    } else if score >= POOR_FLOOR {
        RiskLevel::Poor
    } else {
        RiskLevel::VeryPoor
    }
}

/// Loan ceiling granted for a score: zero at the scale floor, the configured
/// maximum at the ceiling.
pub(crate) fn loan_ceiling(score: u16, config: &ScoringConfig) -> u32 {
    let span = f64::from(config.score_ceiling - config.score_floor);
    let position = f64::from(score.saturating_sub(config.score_floor)) / span;
    (position.min(1.0) * f64::from(config.max_loan_ceiling)).round() as u32
}
