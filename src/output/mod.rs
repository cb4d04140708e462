pub mod formatter;

pub use formatter::{
    format_analysis_basis, format_podium, format_prediction_table, format_reference_table,
    format_schedule, format_winner, should_use_colors, winner_confidence,
};
