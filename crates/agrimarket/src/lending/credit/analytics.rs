//! Yield analytics over harvested crop records, parameterized by an optional
//! reporting window on the planting date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::CropRecord;

/// Optional planting-date bounds for a yield report. Both ends inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportingWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether a crop planted on `date` falls inside the window. Crops with
    /// no planting date only show up in unbounded reports.
    fn contains(&self, planted_at: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = planted_at else {
            return false;
        };
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.to.is_some_and(|to| date > to) {
            return false;
        }
        true
    }
}

/// Per-crop attainment line in a yield report. Attainment here is the raw
/// actual/expected ratio; the scoring cap does not apply to reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropYieldView {
    pub name: String,
    pub expected_yield: f64,
    pub actual_yield: f64,
    pub attainment: f64,
}

/// Aggregated yield analytics for the crops inside a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldAnalytics {
    pub crops_tracked: usize,
    pub crops_reported: usize,
    pub total_area_hectares: f64,
    pub average_attainment: Option<f64>,
    pub best_performer: Option<CropYieldView>,
    pub shortfalls: Vec<CropYieldView>,
}

pub(crate) fn analyze(crops: &[CropRecord], window: &ReportingWindow) -> YieldAnalytics {
    let in_window: Vec<&CropRecord> = crops
        .iter()
        .filter(|crop| window.contains(crop.planted_at))
        .collect();

    let total_area_hectares = in_window
        .iter()
        .filter_map(|crop| crop.area_hectares)
        .sum::<f64>();

    let reported: Vec<CropYieldView> = in_window
        .iter()
        .filter_map(|crop| {
            crop.yield_pair().map(|(expected, actual)| CropYieldView {
                name: crop.name.clone(),
                expected_yield: expected,
                actual_yield: actual,
                attainment: actual / expected,
            })
        })
        .collect();

    let average_attainment = if reported.is_empty() {
        None
    } else {
        Some(reported.iter().map(|view| view.attainment).sum::<f64>() / reported.len() as f64)
    };

    let best_performer = reported
        .iter()
        .max_by(|a, b| a.attainment.total_cmp(&b.attainment))
        .cloned();

    let mut shortfalls: Vec<CropYieldView> = reported
        .iter()
        .filter(|view| view.attainment < 1.0)
        .cloned()
        .collect();
    shortfalls.sort_by(|a, b| a.attainment.total_cmp(&b.attainment));

    YieldAnalytics {
        crops_tracked: in_window.len(),
        crops_reported: reported.len(),
        total_area_hectares,
        average_attainment,
        best_performer,
        shortfalls,
    }
}
