use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for farmer accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Descriptive farm profile captured during onboarding. Every field is
/// optional until the farmer fills it in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmProfile {
    pub name: Option<String>,
    pub location: Option<String>,
    pub size_hectares: Option<f64>,
    pub soil_type: Option<String>,
    pub water_source: Option<String>,
    pub description: Option<String>,
}

impl FarmProfile {
    /// Number of descriptive fields a profile can carry.
    pub const FIELD_COUNT: u32 = 6;

    /// Count of fields the farmer has actually filled in. Blank strings do
    /// not count.
    pub fn filled_field_count(&self) -> u32 {
        let filled_text = |value: &Option<String>| {
            value
                .as_deref()
                .map(|text| !text.trim().is_empty())
                .unwrap_or(false)
        };

        let mut count = 0;
        if filled_text(&self.name) {
            count += 1;
        }
        if filled_text(&self.location) {
            count += 1;
        }
        if self.size_hectares.is_some() {
            count += 1;
        }
        if filled_text(&self.soil_type) {
            count += 1;
        }
        if filled_text(&self.water_source) {
            count += 1;
        }
        if filled_text(&self.description) {
            count += 1;
        }
        count
    }
}

/// One AI crop-scan event. Only the timestamp matters for scoring; the rest
/// is kept for history views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub crop: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a loan application on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
    Disbursed,
    Repaid,
    Defaulted,
}

impl LoanStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Submitted => "submitted",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Disbursed => "disbursed",
            LoanStatus::Repaid => "repaid",
            LoanStatus::Defaulted => "defaulted",
        }
    }
}

/// Loan application snapshot as read from the loan store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub amount: u32,
    pub applied_at: NaiveDate,
    pub status: LoanStatus,
}

/// Crop record with yield figures that appear only after harvest reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecord {
    pub name: String,
    pub area_hectares: Option<f64>,
    pub planted_at: Option<NaiveDate>,
    pub expected_yield: Option<f64>,
    pub actual_yield: Option<f64>,
}

impl CropRecord {
    /// Expected/actual pair, present only when both figures are reported and
    /// the expectation is positive.
    pub fn yield_pair(&self) -> Option<(f64, f64)> {
        match (self.expected_yield, self.actual_yield) {
            (Some(expected), Some(actual)) if expected > 0.0 => Some((expected, actual)),
            _ => None,
        }
    }
}

/// Billing state of a marketplace subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Cancelled,
}

impl SubscriptionStatus {
    pub const fn is_active(self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }

    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

/// Subscription record as read from the billing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub plan: String,
    pub status: SubscriptionStatus,
}

/// Read-only bundle of account activity the calculator consumes. Assembled
/// from the collaborator stores in one pass so a score never mixes data from
/// two points in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub farms: Vec<FarmProfile>,
    pub diagnostics: Vec<DiagnosticRecord>,
    pub loans: Vec<LoanApplication>,
    pub crops: Vec<CropRecord>,
    pub subscription: Option<SubscriptionRecord>,
}

/// The five sub-scores that feed the weighted blend, each in [0, 100].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreFactors {
    pub farm_completeness: f64,
    pub diagnostic_activity: f64,
    pub payment_history: f64,
    pub yield_performance: f64,
    pub subscription: f64,
}

/// Risk band derived from fixed score thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    VeryPoor,
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::VeryPoor => "Very Poor",
            RiskLevel::Poor => "Poor",
            RiskLevel::Fair => "Fair",
            RiskLevel::Good => "Good",
            RiskLevel::VeryGood => "Very Good",
            RiskLevel::Excellent => "Excellent",
        }
    }
}

/// Computed creditworthiness artifact returned to callers and persisted to
/// the score ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScoreResult {
    pub user_id: UserId,
    pub score: u16,
    pub risk_level: RiskLevel,
    pub repayment_capacity: u8,
    pub farm_viability: u8,
    pub factors: ScoreFactors,
    pub max_loan_eligible: u32,
    pub calculated_at: DateTime<Utc>,
}
