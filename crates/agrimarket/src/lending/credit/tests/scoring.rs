use super::common::*;
use crate::lending::credit::domain::{LoanStatus, RiskLevel, ScoreInputs, SubscriptionStatus};
use crate::lending::credit::{BlendWeights, ScoringConfig};

#[test]
fn blend_weights_sum_to_one() {
    assert!((BlendWeights::standard().total() - 1.0).abs() < 1e-9);
}

#[test]
fn brand_new_account_gets_the_documented_floor_score() {
    let result = engine().score(&user("new"), &empty_inputs(), now());

    assert_eq!(result.factors.farm_completeness, 0.0);
    assert_eq!(result.factors.diagnostic_activity, 0.0);
    assert_eq!(result.factors.payment_history, 80.0);
    assert_eq!(result.factors.yield_performance, 50.0);
    assert_eq!(result.factors.subscription, 0.0);

    // raw = 0.25*80 + 0.20*50 = 30 on the 300-850 scale.
    assert_eq!(result.score, 465);
    assert_eq!(result.risk_level, RiskLevel::VeryPoor);
    assert_eq!(result.max_loan_eligible, 210_000);
    assert_eq!(result.repayment_capacity, 80);
    assert_eq!(result.farm_viability, 25);
}

#[test]
fn strong_account_reaches_excellent() {
    let result = engine().score(&user("strong"), &excellent_inputs(), now());

    assert_eq!(result.factors.farm_completeness, 100.0);
    assert_eq!(result.factors.diagnostic_activity, 100.0);
    assert_eq!(result.factors.payment_history, 85.0);
    assert_eq!(result.factors.yield_performance, 90.0);
    assert_eq!(result.factors.subscription, 100.0);

    // raw = 20 + 20 + 21.25 + 18 + 15 = 94.25 -> round(818.375).
    assert_eq!(result.score, 818);
    assert_eq!(result.risk_level, RiskLevel::Excellent);
    assert_eq!(result.farm_viability, 95);
}

#[test]
fn scoring_is_deterministic() {
    let inputs = excellent_inputs();
    let first = engine().score(&user("det"), &inputs, now());
    let second = engine().score(&user("det"), &inputs, now());
    assert_eq!(first, second);
}

#[test]
fn more_recent_diagnostics_never_lower_the_score() {
    let mut previous = None;
    for scans in 0..=6 {
        let inputs = ScoreInputs {
            diagnostics: (0..scans).map(|days| diagnostic_days_ago(days)).collect(),
            ..empty_inputs()
        };
        let score = engine().score(&user("mono"), &inputs, now()).score;
        if let Some(previous) = previous {
            assert!(score >= previous, "score dropped from {previous} to {score}");
        }
        previous = Some(score);
    }
}

#[test]
fn score_and_factors_stay_in_bounds_across_input_shapes() {
    let loan_shapes = [
        Vec::new(),
        vec![loan(LoanStatus::Pending)],
        vec![loan(LoanStatus::Repaid); 8],
        vec![loan(LoanStatus::Defaulted); 4],
    ];
    let crop_shapes = [
        Vec::new(),
        vec![crop_unreported("Maize")],
        vec![crop_with_yield("Maize", 2.0, 9.0); 5],
    ];

    for farms in [Vec::new(), vec![full_farm()]] {
        for loans in &loan_shapes {
            for crops in &crop_shapes {
                let inputs = ScoreInputs {
                    farms: farms.clone(),
                    diagnostics: (0..12).map(|days| diagnostic_days_ago(days)).collect(),
                    loans: loans.clone(),
                    crops: crops.clone(),
                    subscription: Some(subscription(SubscriptionStatus::Active)),
                };
                let result = engine().score(&user("bounds"), &inputs, now());

                assert!((300..=850).contains(&result.score));
                for factor in [
                    result.factors.farm_completeness,
                    result.factors.diagnostic_activity,
                    result.factors.payment_history,
                    result.factors.yield_performance,
                    result.factors.subscription,
                ] {
                    assert!((0.0..=100.0).contains(&factor), "factor {factor} out of range");
                }
                assert!(result.max_loan_eligible <= 700_000);
            }
        }
    }
}

#[test]
fn risk_bands_honor_inclusive_thresholds() {
    let cases = [
        (549, RiskLevel::VeryPoor),
        (550, RiskLevel::Poor),
        (599, RiskLevel::Poor),
        (600, RiskLevel::Fair),
        (650, RiskLevel::Good),
        (700, RiskLevel::VeryGood),
        (749, RiskLevel::VeryGood),
        (750, RiskLevel::Excellent),
        (850, RiskLevel::Excellent),
    ];
    for (score, expected) in cases {
        assert_eq!(
            crate::lending::credit::scoring::rating::risk_level(score),
            expected,
            "score {score}"
        );
    }
}

#[test]
fn loan_ceiling_spans_the_scale() {
    let config = ScoringConfig::standard();
    use crate::lending::credit::scoring::rating::loan_ceiling;
    assert_eq!(loan_ceiling(300, &config), 0);
    assert_eq!(loan_ceiling(850, &config), 700_000);
    assert_eq!(loan_ceiling(465, &config), 210_000);
}
