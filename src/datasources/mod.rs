pub mod openmeteo;

pub use openmeteo::OpenMeteoArchiveClient;

use crate::config::LocationConfig;
use crate::error::Result;
use chrono::NaiveDate;
use std::future::Future;

/// Source of aggregated precipitation for a closed date interval
pub trait PrecipitationSource {
    /// Total precipitation in mm over `[start, end]` at `location`
    fn fetch_total_precipitation(
        &self,
        location: &LocationConfig,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<f64>> + Send;
}
