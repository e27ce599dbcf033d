#![forbid(unsafe_code)]

//! Anthropometric and training-load estimation.
//!
//! This crate provides:
//! - Body composition from circumference or skinfold measurements
//! - Energy expenditure and macronutrient targets
//! - A composite readiness score with trend detection
//! - RPE-based load autoregulation and one-rep max estimates
//!
//! Every coefficient lives in [`tables`] and can be replaced through [`Config`].

pub mod types;
pub mod error;
pub mod tables;
pub mod config;
pub mod logging;
pub mod parse;
pub mod history;
pub mod body_composition;
pub mod energy;
pub mod readiness;
pub mod autoregulation;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use body_composition::{siri_body_fat, BodyCompositionEstimator};
pub use energy::{calorie_ladder, split_by_preset, EnergyExpenditureEstimator};
pub use readiness::{average_score, CompositeScoreEngine};
pub use autoregulation::{
    average_rpe, estimate_one_rep_max, training_loads, LoadAutoregulationAdvisor,
};
pub use history::{load_readiness_history, load_rpe_history};
