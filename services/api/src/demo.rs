use crate::infra::{
    cache_policy_from_hours, default_scoring_config, demo_account, demo_user,
    InMemoryActivityStore, InMemoryScoreLedger,
};
use agrimarket::error::AppError;
use agrimarket::lending::credit::{
    CreditScoreOutcome, CreditScoreService, ReportingWindow,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date for the demo (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the score ledger history at the end of the demo
    #[arg(long)]
    pub(crate) include_history: bool,
    /// Skip the yield analytics portion of the demo
    #[arg(long)]
    pub(crate) skip_yield_report: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        as_of,
        include_history,
        skip_yield_report,
    } = args;

    let as_of = match as_of {
        Some(date) => noon_utc(date),
        None => Utc::now(),
    };

    println!("Credit scoring demo (evaluated {})", as_of.date_naive());

    let activity = Arc::new(InMemoryActivityStore::default());
    let ledger = Arc::new(InMemoryScoreLedger::default());
    let farmer = demo_user();
    activity.upsert(&farmer, demo_account(as_of));

    let service = CreditScoreService::new(
        activity,
        ledger,
        default_scoring_config(),
        cache_policy_from_hours(24),
    );

    let first = match service.get_credit_score(&farmer, as_of) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Score unavailable: {}", err);
            return Ok(());
        }
    };
    render_outcome("Initial computation", &first);

    match service.get_credit_score(&farmer, as_of + Duration::hours(6)) {
        Ok(outcome) => render_outcome("Six hours later", &outcome),
        Err(err) => println!("  Cached lookup failed: {}", err),
    }

    match service.get_credit_score(&farmer, as_of + Duration::hours(30)) {
        Ok(outcome) => render_outcome("After the freshness window", &outcome),
        Err(err) => println!("  Recomputation failed: {}", err),
    }

    if !skip_yield_report {
        let season_start = as_of.date_naive() - Duration::days(180);
        let season_end = as_of.date_naive();
        let window = ReportingWindow {
            from: Some(season_start),
            to: Some(season_end),
        };
        println!("\nYield report ({season_start} -> {season_end})");
        match service.yield_report(&farmer, &window) {
            Ok(report) => {
                println!(
                    "- {} crops tracked, {} with reported harvests, {:.1} ha",
                    report.crops_tracked, report.crops_reported, report.total_area_hectares
                );
                if let Some(average) = report.average_attainment {
                    println!("- Average attainment: {:.0}% of expectation", average * 100.0);
                }
                if let Some(best) = &report.best_performer {
                    println!(
                        "- Best performer: {} ({:.2} actual vs {:.2} expected)",
                        best.name, best.actual_yield, best.expected_yield
                    );
                }
                if report.shortfalls.is_empty() {
                    println!("- Shortfalls: none");
                } else {
                    println!("- Shortfalls:");
                    for crop in &report.shortfalls {
                        println!(
                            "  - {}: {:.0}% of expected yield",
                            crop.name,
                            crop.attainment * 100.0
                        );
                    }
                }
            }
            Err(err) => println!("- Yield report unavailable: {}", err),
        }
    }

    if include_history {
        println!("\nScore ledger history");
        match service.score_history(&farmer, 12) {
            Ok(entries) => {
                for entry in entries {
                    println!(
                        "- {} | score {} ({})",
                        entry.calculated_at,
                        entry.score,
                        entry.risk_level.label()
                    );
                }
            }
            Err(err) => println!("- History unavailable: {}", err),
        }
    }

    Ok(())
}

fn render_outcome(label: &str, outcome: &CreditScoreOutcome) {
    let result = &outcome.result;
    let source = if outcome.is_new {
        "computed"
    } else {
        "served from ledger"
    };

    println!("\n{label} ({source})");
    println!(
        "- Score {} ({}) | repayment capacity {} | farm viability {}",
        result.score,
        result.risk_level.label(),
        result.repayment_capacity,
        result.farm_viability
    );
    println!("- Eligible for loans up to {}", result.max_loan_eligible);
    println!(
        "- Factors: profile {:.0}, diagnostics {:.0}, payments {:.0}, yields {:.0}, subscription {:.0}",
        result.factors.farm_completeness,
        result.factors.diagnostic_activity,
        result.factors.payment_history,
        result.factors.yield_performance,
        result.factors.subscription
    );
}

fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&date.and_time(noon))
}
