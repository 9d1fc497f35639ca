use chrono::{DateTime, Duration, Utc};

use crate::lending::credit::domain::{
    CropRecord, DiagnosticRecord, FarmProfile, LoanApplication, LoanStatus, SubscriptionRecord,
};

pub(crate) const FACTOR_CAP: f64 = 100.0;

/// Points per diagnostic scan inside the lookback window. Five recent scans
/// saturate the factor.
pub(crate) const DIAGNOSTIC_POINTS_PER_SCAN: f64 = 20.0;

/// Crop-portfolio bonus applied to profile completeness.
pub(crate) const PROFILE_CROP_THRESHOLD: usize = 3;
pub(crate) const PROFILE_CROP_BONUS: f64 = 10.0;

/// Payment history baselines. A farmer who never borrowed sits at the
/// neutral baseline, not zero.
pub(crate) const PAYMENT_BASELINE: f64 = 80.0;
pub(crate) const PAYMENT_UNRESOLVED: f64 = 75.0;
pub(crate) const PAYMENT_DEFAULT_PENALTY: f64 = 25.0;
pub(crate) const PAYMENT_DEFAULT_FLOOR: f64 = 20.0;
pub(crate) const PAYMENT_REPAID_BONUS: f64 = 5.0;

/// Yield attainment is capped so over-performance cannot inflate the score.
pub(crate) const YIELD_RATIO_CAP: f64 = 1.2;
/// Exactly meeting expectation is worth 80/100.
pub(crate) const YIELD_TARGET_POINTS: f64 = 80.0;
pub(crate) const YIELD_CONSISTENCY_THRESHOLD: usize = 3;
pub(crate) const YIELD_CONSISTENCY_BONUS: f64 = 10.0;
/// Baseline when the account has no crops at all.
pub(crate) const YIELD_BASELINE_NO_CROPS: f64 = 50.0;
/// Baseline when crops exist but none has reported a harvest yet.
pub(crate) const YIELD_BASELINE_UNREPORTED: f64 = 45.0;

pub(crate) const SUBSCRIPTION_ACTIVE_POINTS: f64 = 100.0;

/// Completeness of the best-documented farm profile, scaled to [0, 100],
/// with a bonus for a diversified crop portfolio. No farms means no signal.
pub(crate) fn farm_completeness(farms: &[FarmProfile], crop_count: usize) -> f64 {
    let filled = match farms.iter().map(FarmProfile::filled_field_count).max() {
        Some(filled) => filled,
        None => return 0.0,
    };

    let mut score = f64::from(filled) / f64::from(FarmProfile::FIELD_COUNT) * FACTOR_CAP;
    if crop_count >= PROFILE_CROP_THRESHOLD {
        score += PROFILE_CROP_BONUS;
    }
    score.min(FACTOR_CAP)
}

/// Scan count within the lookback window (inclusive), scaled by the
/// per-scan points and capped.
pub(crate) fn diagnostic_activity(
    diagnostics: &[DiagnosticRecord],
    now: DateTime<Utc>,
    window_days: i64,
) -> f64 {
    let window = Duration::days(window_days);
    let recent = diagnostics
        .iter()
        .filter(|record| now.signed_duration_since(record.created_at) <= window)
        .count();

    (recent as f64 * DIAGNOSTIC_POINTS_PER_SCAN).min(FACTOR_CAP)
}

/// Repayment track record. Defaults dominate repayments; an account with no
/// borrowing history gets the neutral baseline.
pub(crate) fn payment_history(loans: &[LoanApplication]) -> f64 {
    if loans.is_empty() {
        return PAYMENT_BASELINE;
    }

    let defaults = loans
        .iter()
        .filter(|loan| loan.status == LoanStatus::Defaulted)
        .count();
    if defaults > 0 {
        return (PAYMENT_BASELINE - PAYMENT_DEFAULT_PENALTY * defaults as f64)
            .max(PAYMENT_DEFAULT_FLOOR);
    }

    let repaid = loans
        .iter()
        .filter(|loan| loan.status == LoanStatus::Repaid)
        .count();
    if repaid > 0 {
        return (PAYMENT_BASELINE + PAYMENT_REPAID_BONUS * repaid as f64).min(FACTOR_CAP);
    }

    PAYMENT_UNRESOLVED
}

/// Mean capped attainment across crops with reported harvests, plus a
/// consistency bonus once enough harvests are on record.
pub(crate) fn yield_performance(crops: &[CropRecord]) -> f64 {
    if crops.is_empty() {
        return YIELD_BASELINE_NO_CROPS;
    }

    let ratios: Vec<f64> = crops
        .iter()
        .filter_map(CropRecord::yield_pair)
        .map(|(expected, actual)| (actual / expected).min(YIELD_RATIO_CAP))
        .collect();

    if ratios.is_empty() {
        return YIELD_BASELINE_UNREPORTED;
    }

    let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
    let mut score = mean * YIELD_TARGET_POINTS;
    if ratios.len() >= YIELD_CONSISTENCY_THRESHOLD {
        score += YIELD_CONSISTENCY_BONUS;
    }
    score.min(FACTOR_CAP)
}

/// Binary signal: an active subscription is full points, anything else is
/// zero.
pub(crate) fn subscription_signal(subscription: Option<&SubscriptionRecord>) -> f64 {
    match subscription {
        Some(record) if record.status.is_active() => SUBSCRIPTION_ACTIVE_POINTS,
        _ => 0.0,
    }
}
