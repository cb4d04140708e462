pub mod analysis;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod scoring;
pub mod telemetry;

pub use error::{PredictionError, ProviderError};
pub use fetch::{load_weekend, predict_from, predict_weekend, Prediction, WeekendData};
