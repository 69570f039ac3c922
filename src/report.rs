use crate::config::Config;
use crate::logic::classifier::threshold_text;
use crate::models::{month_name, PredictionResult};

pub fn title(config: &Config) -> String {
    format!(
        "{} Planting Window Predictor ({}, {})",
        config.crop.name, config.location.name, config.location.region
    )
}

pub fn intro(config: &Config) -> String {
    format!(
        "Predicts the {} planting window category (Early, Normal, or Late) and suggests \
         specific date ranges for {}, based on rainfall during the preceding Rabi crop harvest.",
        config.crop.name, config.location.name
    )
}

/// "15 Feb" style day and abbreviated month
fn short_date(month: u32, day: u32) -> String {
    let name = month_name(month);
    format!("{} {}", day, name.get(..3).unwrap_or(name))
}

/// Classification rules as shown in the About panel
pub fn rule_lines(config: &Config) -> Vec<String> {
    let rp = &config.reference_period;
    let early = threshold_text(config.thresholds.early_mm);
    let late = threshold_text(config.thresholds.late_mm);
    vec![
        format!(
            "Predicts {} planting window for {} based on Rabi harvest rainfall ({} - {}).",
            config.crop.name,
            config.location.name,
            short_date(rp.start_month, rp.start_day),
            short_date(rp.end_month, rp.end_day)
        ),
        format!("- Rain < {}mm: Early", early),
        format!("- {}mm - {}mm Rain: Normal", early, late),
        format!("- Rain > {}mm: Late", late),
        "Disclaimer: Use as guidance. Local conditions are key.".to_string(),
    ]
}

pub fn reminder(crop: &str) -> String {
    format!(
        "Remember to also consider current weather, soil moisture, and local agricultural \
         advice when making your final {} planting decisions.",
        crop
    )
}

/// Plain-text rendering of a prediction
pub fn render(result: &PredictionResult) -> String {
    let mut lines = vec![
        format!(
            "Prediction for {} Planting in {}:",
            result.crop, result.year
        ),
        format!("Predicted Window Category: {}", result.category),
        format!("Suggested Planting Dates: {}", result.suggested_dates),
        format!(
            "Confidence in this prediction: {}",
            result.confidence_percent()
        ),
        String::new(),
        "Key Factors Considered:".to_string(),
    ];

    lines.extend(result.key_factors.iter().map(|f| format!("- {}", f)));
    lines.push(String::new());
    lines.push(format!(
        "Data Period Analysed: {} (Rabi harvest)",
        result.reference_period
    ));
    lines.push(format!(
        "Total Rainfall in this Period: {:.2} mm",
        result.rainfall_mm
    ));
    lines.push(String::new());
    lines.push(reminder(&result.crop));

    lines.join("\n")
}
