pub mod qualifying;
pub mod summary;

pub use qualifying::{extract_qualifying, QualifyingRow};
pub use summary::{summarize_laps, SessionSummary};
