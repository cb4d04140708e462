pub mod config;
pub mod engine;
pub mod validation;

pub use config::*;
pub use engine::{
    build_profiles, practice_score, rank_drivers, score_profiles, DriverPracticeProfile,
    FinalPrediction,
};
pub use validation::validate_scoring;
