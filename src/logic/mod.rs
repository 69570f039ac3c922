pub mod classifier;
pub mod predictor;

pub use predictor::{selectable_years, PredictionService};
