// Library interface for TrailSync modules
// The CLI binary and the integration tests both go through this crate root

pub mod config;
pub mod effort;
pub mod error;
pub mod gap;
pub mod grip;
pub mod import;
pub mod intervals;
pub mod logging;
pub mod planner;
pub mod risk;
pub mod track;
pub mod training_paces;
pub mod treadmill;
pub mod units;
pub mod weather;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::{CalculationError, ImportError, Result, TrackError, TrailSyncError};
pub use import::gpx::{parse_gpx, summarize_gpx};
pub use import::{ImportManager, TrackImporter};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use track::{haversine_km, summarize, summarize_with, ElevationPolicy, TrackSummary, Trackpoint};
pub use units::UnitSystem;
