use thiserror::Error;

#[derive(Error, Debug)]
pub enum RicecastError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Error fetching data from API: {0}")]
    Transport(String),

    #[error("Precipitation data format incorrect in API response: {0}")]
    MalformedResponse(String),

    #[error("Could not retrieve rainfall data. Prediction is not possible. ({0})")]
    DataUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RicecastError>;
