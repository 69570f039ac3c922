use super::classifier;
use crate::config::Config;
use crate::datasources::PrecipitationSource;
use crate::error::{Result, RicecastError};
use crate::models::{PredictionResult, RainfallTotal, ReferencePeriod};
use chrono::NaiveDateTime;

/// Years offered for selection: five back, the current one, two ahead
pub fn selectable_years(current_year: i32) -> Vec<i32> {
    (current_year - 5..=current_year + 2).collect()
}

pub struct PredictionService<S> {
    config: Config,
    source: S,
}

impl<S: PrecipitationSource> PredictionService<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reference_period(&self, year: i32) -> Result<ReferencePeriod> {
        classifier::reference_period(year, &self.config.reference_period)
    }

    /// Fetch the reference-period rainfall for `year` once and classify it.
    /// Any fetch failure aborts the prediction.
    pub async fn predict(&self, year: i32, now: NaiveDateTime) -> Result<PredictionResult> {
        let period = self.reference_period(year)?;
        let location = &self.config.location;

        tracing::info!(
            "Fetching rainfall data for {} ({})...",
            location.name,
            period
        );

        let rainfall = match self
            .source
            .fetch_total_precipitation(location, period.start, period.end)
            .await
        {
            Ok(mm) => RainfallTotal::Measured(mm),
            Err(e) => {
                tracing::warn!("Rainfall fetch for {} failed: {}", year, e);
                return Err(RicecastError::DataUnavailable(e.to_string()));
            }
        };

        let result = classifier::classify(&self.config, year, rainfall, now)?;
        tracing::debug!(
            "{} {}: {} ({:.2} mm, confidence {:.2})",
            result.crop,
            year,
            result.category,
            result.rainfall_mm,
            result.confidence
        );
        Ok(result)
    }
}
