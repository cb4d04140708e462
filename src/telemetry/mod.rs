pub mod cache;
pub mod openf1;
pub mod source;
pub mod types;

pub use cache::{clear_cache, get_cache_path, CacheConfig, ResponseCache};
pub use openf1::{create_client, OpenF1Client, DEFAULT_BASE_URL};
pub use source::TelemetrySource;
pub use types::{EventInfo, LapRecord, QualifyingResult};
