//! Error types for the anthro_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for anthro_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller text could not be read as the expected value
    #[error("Parse error: {field} = {value:?} is not a valid value")]
    Parse { field: String, value: String },

    /// A body measurement is missing, non-positive, or drives a formula out of its domain
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// A non-measurement input is out of its accepted range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Protein and fat alone already exceed the calorie target
    #[error(
        "Macro budget exceeded: protein and fat need {committed_calories:.0} kcal \
         but the target is {target_calories:.0} kcal"
    )]
    MacroBudgetExceeded {
        target_calories: f64,
        committed_calories: f64,
    },

    /// Not enough history points for a trend or load advice
    #[error("Insufficient history: need {required} entries, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn parse(field: &str, value: &str) -> Self {
        Error::Parse {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
