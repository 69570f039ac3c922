use crate::config::{Config, ReferencePeriodConfig, ThresholdConfig};
use crate::error::{Result, RicecastError};
use crate::models::{
    DataCompleteness, PlantingCategory, PredictionResult, RainfallTotal, ReferencePeriod,
};
use chrono::{NaiveDate, NaiveDateTime};

const EARLY_CONFIDENCE: f64 = 0.70;
const NORMAL_CONFIDENCE: f64 = 0.80;
const LATE_CONFIDENCE: f64 = 0.70;

/// Reference period boundaries for `year`
pub fn reference_period(year: i32, config: &ReferencePeriodConfig) -> Result<ReferencePeriod> {
    let start = NaiveDate::from_ymd_opt(year, config.start_month, config.start_day);
    let end = NaiveDate::from_ymd_opt(year, config.end_month, config.end_day);

    match (start, end) {
        (Some(start), Some(end)) => Ok(ReferencePeriod::new(start, end)),
        _ => Err(RicecastError::InvalidConfiguration(format!(
            "Invalid date configuration for Rabi harvest in year {}",
            year
        ))),
    }
}

/// Three-way partition; both thresholds are inclusive to Normal.
pub fn categorize(rainfall_mm: f64, thresholds: &ThresholdConfig) -> PlantingCategory {
    if rainfall_mm < thresholds.early_mm {
        PlantingCategory::Early
    } else if rainfall_mm <= thresholds.late_mm {
        PlantingCategory::Normal
    } else {
        PlantingCategory::Late
    }
}

pub fn base_confidence(category: PlantingCategory) -> f64 {
    match category {
        PlantingCategory::Early => EARLY_CONFIDENCE,
        PlantingCategory::Normal => NORMAL_CONFIDENCE,
        PlantingCategory::Late => LATE_CONFIDENCE,
    }
}

/// Threshold as written in factor and rule text: whole values keep one
/// decimal ("25.0"), anything finer is printed in full ("25.25").
pub fn threshold_text(mm: f64) -> String {
    if mm.fract() == 0.0 {
        format!("{:.1}", mm)
    } else {
        mm.to_string()
    }
}

fn rainfall_factor(
    category: PlantingCategory,
    rainfall_mm: f64,
    thresholds: &ThresholdConfig,
) -> String {
    match category {
        PlantingCategory::Early => format!(
            "Low Rabi harvest rainfall ({:.2} mm, below {} mm) suggests fields may be ready sooner.",
            rainfall_mm,
            threshold_text(thresholds.early_mm)
        ),
        PlantingCategory::Normal => format!(
            "Moderate Rabi harvest rainfall ({:.2} mm) indicates typical conditions for standard planting.",
            rainfall_mm
        ),
        PlantingCategory::Late => format!(
            "High Rabi harvest rainfall ({:.2} mm, above {} mm) may delay field preparation due to excessive moisture.",
            rainfall_mm,
            threshold_text(thresholds.late_mm)
        ),
    }
}

/// Map a rainfall total for `year` to a planting window prediction.
///
/// `now` decides whether the reference period was fully observed; a period
/// still running or entirely ahead scales the confidence down once.
pub fn classify(
    config: &Config,
    year: i32,
    rainfall: RainfallTotal,
    now: NaiveDateTime,
) -> Result<PredictionResult> {
    let period = reference_period(year, &config.reference_period)?;

    let rainfall_mm = match rainfall {
        RainfallTotal::Measured(mm) => mm,
        RainfallTotal::Unavailable => {
            return Err(RicecastError::DataUnavailable(format!(
                "no rainfall total for {}",
                period
            )))
        }
    };

    let thresholds = &config.thresholds;
    let category = categorize(rainfall_mm, thresholds);
    let mut key_factors = vec![rainfall_factor(category, rainfall_mm, thresholds)];

    let completeness = DataCompleteness::assess(&period, now);
    let confidence = base_confidence(category) * completeness.confidence_scale();
    if let Some(warning) = completeness.warning() {
        key_factors.push(warning.to_string());
    }

    Ok(PredictionResult {
        year,
        crop: config.crop.name.clone(),
        category,
        suggested_dates: config.windows.for_category(category).display(),
        confidence,
        key_factors,
        reference_period: period,
        rainfall_mm,
        completeness,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    /// A moment after the 2024 reference period closed
    fn after_period() -> NaiveDateTime {
        at(2024, 6, 1)
    }

    fn predict(mm: f64, now: NaiveDateTime) -> PredictionResult {
        classify(&Config::default(), 2024, RainfallTotal::Measured(mm), now).unwrap()
    }

    #[test]
    fn low_rainfall_is_early() {
        for mm in [0.0, 5.0, 24.99] {
            let result = predict(mm, after_period());
            assert_eq!(result.category, PlantingCategory::Early, "{} mm", mm);
            assert!((result.confidence - 0.70).abs() < 1e-9);
        }
    }

    #[test]
    fn moderate_rainfall_is_normal() {
        for mm in [25.0, 37.5, 50.0] {
            let result = predict(mm, after_period());
            assert_eq!(result.category, PlantingCategory::Normal, "{} mm", mm);
            assert!((result.confidence - 0.80).abs() < 1e-9);
        }
    }

    #[test]
    fn high_rainfall_is_late() {
        for mm in [50.01, 80.0, 300.0] {
            let result = predict(mm, after_period());
            assert_eq!(result.category, PlantingCategory::Late, "{} mm", mm);
            assert!((result.confidence - 0.70).abs() < 1e-9);
        }
    }

    #[test]
    fn thresholds_are_inclusive_to_normal() {
        let thresholds = ThresholdConfig::default();
        assert_eq!(categorize(25.0, &thresholds), PlantingCategory::Normal);
        assert_eq!(categorize(50.0, &thresholds), PlantingCategory::Normal);
        assert_eq!(categorize(24.999, &thresholds), PlantingCategory::Early);
        assert_eq!(categorize(50.001, &thresholds), PlantingCategory::Late);
    }

    #[test]
    fn early_example() {
        let result = predict(10.0, after_period());
        assert_eq!(result.category, PlantingCategory::Early);
        assert!((result.confidence - 0.70).abs() < 1e-9);
        assert_eq!(result.suggested_dates, "June 10th - June 30th");
        assert_eq!(result.key_factors.len(), 1);
        assert_eq!(
            result.key_factors[0],
            "Low Rabi harvest rainfall (10.00 mm, below 25.0 mm) suggests fields may be ready sooner."
        );
    }

    #[test]
    fn late_example() {
        let result = predict(60.0, after_period());
        assert_eq!(result.category, PlantingCategory::Late);
        assert!((result.confidence - 0.70).abs() < 1e-9);
        assert_eq!(result.suggested_dates, "July 5th - July 31st");
        assert!(result.key_factors[0].contains("above 50.0 mm"));
        assert!(result.key_factors[0].contains("excessive moisture"));
    }

    #[test]
    fn fractional_thresholds_are_not_rounded() {
        assert_eq!(threshold_text(25.0), "25.0");
        assert_eq!(threshold_text(25.25), "25.25");

        let mut config = Config::default();
        config.thresholds.early_mm = 25.25;
        config.thresholds.late_mm = 47.125;
        let early = classify(&config, 2024, RainfallTotal::Measured(10.0), after_period()).unwrap();
        assert!(early.key_factors[0].contains("below 25.25 mm"));
        let late = classify(&config, 2024, RainfallTotal::Measured(60.0), after_period()).unwrap();
        assert!(late.key_factors[0].contains("above 47.125 mm"));
    }

    #[test]
    fn boundary_example() {
        let result = predict(50.0, after_period());
        assert_eq!(result.category, PlantingCategory::Normal);
        assert!((result.confidence - 0.80).abs() < 1e-9);
        assert_eq!(result.suggested_dates, "June 20th - July 15th");
        assert!(result.key_factors[0].starts_with("Moderate Rabi harvest rainfall (50.00 mm)"));
    }

    #[test]
    fn complete_period_has_no_warning() {
        let result = predict(30.0, at(2024, 4, 30));
        assert!((result.confidence - 0.80).abs() < 1e-9);
        assert!(!result.has_data_warning());
    }

    #[test]
    fn future_period_is_speculative() {
        let result = predict(30.0, at(2024, 1, 10));
        assert_eq!(result.category, PlantingCategory::Normal);
        assert!((result.confidence - 0.40).abs() < 1e-9);
        assert_eq!(result.key_factors.len(), 2);
        assert!(result.key_factors[1].contains("entirely in the future"));
        assert!(result.key_factors[1].contains("speculative"));
    }

    #[test]
    fn running_period_is_partial() {
        let result = predict(10.0, at(2024, 3, 20));
        assert!((result.confidence - 0.70 * 0.7).abs() < 1e-9);
        assert_eq!(result.key_factors.len(), 2);
        assert!(result.key_factors[1].contains("partial data"));
        assert_eq!(result.completeness, DataCompleteness::Partial);
        assert!(result.is_warning_factor(&result.key_factors[1]));
    }

    #[test]
    fn adjustments_never_compound() {
        // Future wins over partial, and only one warning is attached
        let result = predict(60.0, at(2023, 12, 31));
        assert!((result.confidence - 0.35).abs() < 1e-9);
        assert_eq!(
            result
                .key_factors
                .iter()
                .filter(|f| f.starts_with("WARNING:"))
                .count(),
            1
        );
    }

    #[test]
    fn confidence_stays_in_unit_interval() {
        for mm in [0.0, 25.0, 49.0, 51.0, 1000.0] {
            for now in [at(2023, 1, 1), at(2024, 3, 1), at(2025, 1, 1)] {
                let c = predict(mm, now).confidence;
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn completeness_assessment() {
        let period = reference_period(2024, &ReferencePeriodConfig::default()).unwrap();
        assert_eq!(
            DataCompleteness::assess(&period, at(2024, 1, 1)),
            DataCompleteness::Future
        );
        assert_eq!(
            DataCompleteness::assess(&period, at(2024, 2, 15)),
            DataCompleteness::Partial
        );
        assert_eq!(
            DataCompleteness::assess(&period, at(2024, 5, 1)),
            DataCompleteness::Complete
        );
    }

    #[test]
    fn unavailable_rainfall_yields_no_prediction() {
        let result = classify(
            &Config::default(),
            2024,
            RainfallTotal::Unavailable,
            after_period(),
        );
        assert!(matches!(result, Err(RicecastError::DataUnavailable(_))));
    }

    #[test]
    fn invalid_calendar_constant_is_configuration_error() {
        let mut config = Config::default();
        config.reference_period.start_day = 29;
        // 2023 is not a leap year
        let result = classify(&config, 2023, RainfallTotal::Measured(10.0), at(2023, 6, 1));
        assert!(matches!(
            result,
            Err(RicecastError::InvalidConfiguration(_))
        ));
        assert!(classify(&config, 2024, RainfallTotal::Measured(10.0), at(2024, 6, 1)).is_ok());
    }

    #[test]
    fn result_carries_period_and_inputs() {
        let result = predict(42.0, after_period());
        assert_eq!(result.year, 2024);
        assert_eq!(result.crop, "Rice");
        assert_eq!(result.rainfall_mm, 42.0);
        assert_eq!(
            result.reference_period.to_string(),
            "2024-02-15 to 2024-04-30"
        );
    }
}
