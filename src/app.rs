use crate::config::Config;
use crate::error::Result;
use crate::logic::selectable_years;
use crate::models::PredictionResult;

pub struct App {
    pub config: Config,
    pub years: Vec<i32>,
    pub selected_index: usize,
    pub prediction: Option<PredictionResult>,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
    pub needs_prediction: bool,
    pub predicting: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, current_year: i32) -> Self {
        let years = selectable_years(current_year);
        let selected_index = years.iter().position(|y| *y == current_year).unwrap_or(0);

        Self {
            config,
            years,
            selected_index,
            prediction: None,
            error_message: None,
            status_message: None,
            needs_prediction: false,
            predicting: false,
            should_quit: false,
        }
    }

    pub fn selected_year(&self) -> i32 {
        self.years[self.selected_index]
    }

    pub fn prev_year(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn next_year(&mut self) {
        if self.selected_index + 1 < self.years.len() {
            self.selected_index += 1;
        }
    }

    pub fn request_prediction(&mut self) {
        if !self.predicting {
            self.needs_prediction = true;
        }
    }

    pub fn begin_prediction(&mut self, status: &str) {
        self.needs_prediction = false;
        self.predicting = true;
        self.error_message = None;
        self.set_status(status);
    }

    /// Store the outcome of a prediction; a failure clears any earlier result.
    pub fn finish_prediction(&mut self, outcome: Result<PredictionResult>) {
        self.predicting = false;
        match outcome {
            Ok(result) => {
                self.status_message = Some(format!(
                    "Total rainfall during preceding Rabi harvest: {:.2} mm",
                    result.rainfall_mm
                ));
                self.prediction = Some(result);
            }
            Err(e) => {
                self.prediction = None;
                self.status_message = None;
                self.error_message = Some(e.to_string());
            }
        }
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RicecastError;
    use crate::logic::classifier::classify;
    use crate::models::{PlantingCategory, RainfallTotal};
    use chrono::NaiveDate;

    fn prediction() -> PredictionResult {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        classify(&Config::default(), 2024, RainfallTotal::Measured(10.0), now).unwrap()
    }

    #[test]
    fn starts_on_current_year() {
        let app = App::new(Config::default(), 2024);
        assert_eq!(app.selected_year(), 2024);
        assert_eq!(app.years.len(), 8);
    }

    #[test]
    fn year_selection_is_bounded() {
        let mut app = App::new(Config::default(), 2024);
        for _ in 0..10 {
            app.prev_year();
        }
        assert_eq!(app.selected_year(), 2019);
        for _ in 0..10 {
            app.next_year();
        }
        assert_eq!(app.selected_year(), 2026);
    }

    #[test]
    fn no_new_request_while_predicting() {
        let mut app = App::new(Config::default(), 2024);
        app.request_prediction();
        assert!(app.needs_prediction);
        app.begin_prediction("Fetching");
        assert!(!app.needs_prediction);
        app.request_prediction();
        assert!(!app.needs_prediction);
    }

    #[test]
    fn success_stores_prediction() {
        let mut app = App::new(Config::default(), 2024);
        app.begin_prediction("Fetching");
        app.finish_prediction(Ok(prediction()));

        assert!(!app.predicting);
        assert!(app.error_message.is_none());
        let result = app.prediction.as_ref().unwrap();
        assert_eq!(result.category, PlantingCategory::Early);
        assert!(app.status_message.as_deref().unwrap().contains("10.00 mm"));
    }

    #[test]
    fn failure_clears_previous_prediction() {
        let mut app = App::new(Config::default(), 2024);
        app.finish_prediction(Ok(prediction()));
        app.finish_prediction(Err(RicecastError::DataUnavailable("timed out".into())));

        assert!(app.prediction.is_none());
        let msg = app.error_message.as_deref().unwrap();
        assert!(msg.contains("Prediction is not possible"));
        assert!(msg.contains("timed out"));
    }
}
