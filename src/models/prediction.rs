use super::planting_window::PlantingCategory;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Total precipitation for a reference period.
///
/// `Unavailable` is distinct from `Measured(0.0)`: a dry period is a valid
/// input, a failed fetch is not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RainfallTotal {
    Measured(f64),
    Unavailable,
}

const SPECULATIVE_SCALE: f64 = 0.5;
const PARTIAL_SCALE: f64 = 0.7;

/// How much of the reference period had been observed at prediction time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataCompleteness {
    #[default]
    Complete,
    Partial,
    Future,
}

impl DataCompleteness {
    pub fn assess(period: &ReferencePeriod, now: NaiveDateTime) -> Self {
        if !period.ends_after(now) {
            DataCompleteness::Complete
        } else if period.starts_after(now) {
            DataCompleteness::Future
        } else {
            DataCompleteness::Partial
        }
    }

    pub fn confidence_scale(&self) -> f64 {
        match self {
            DataCompleteness::Complete => 1.0,
            DataCompleteness::Partial => PARTIAL_SCALE,
            DataCompleteness::Future => SPECULATIVE_SCALE,
        }
    }

    pub fn warning(&self) -> Option<&'static str> {
        match self {
            DataCompleteness::Complete => None,
            DataCompleteness::Partial => Some(
                "WARNING: Rabi harvest data period for this year is not yet complete. \
                 Prediction based on partial data.",
            ),
            DataCompleteness::Future => Some(
                "WARNING: Rabi harvest data period for this year is entirely in the future. \
                 Prediction is speculative.",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReferencePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when the period begins after `now` (nothing observed yet).
    pub fn starts_after(&self, now: NaiveDateTime) -> bool {
        self.start.and_time(NaiveTime::MIN) > now
    }

    /// True when the period has not finished by `now`.
    pub fn ends_after(&self, now: NaiveDateTime) -> bool {
        self.end.and_time(NaiveTime::MIN) > now
    }
}

impl std::fmt::Display for ReferencePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub year: i32,
    pub crop: String,
    pub category: PlantingCategory,
    pub suggested_dates: String,
    pub confidence: f64,
    pub key_factors: Vec<String>,
    pub reference_period: ReferencePeriod,
    pub rainfall_mm: f64,
    #[serde(skip)]
    pub completeness: DataCompleteness,
}

impl PredictionResult {
    pub fn confidence_percent(&self) -> String {
        format!("{:.0}%", self.confidence * 100.0)
    }

    pub fn has_data_warning(&self) -> bool {
        self.completeness != DataCompleteness::Complete
    }

    /// True for the factor line that carries the completeness warning
    pub fn is_warning_factor(&self, factor: &str) -> bool {
        self.completeness.warning() == Some(factor)
    }
}
