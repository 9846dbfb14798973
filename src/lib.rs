// Public modules
pub mod cancel;
pub mod capture;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;
pub mod scheduler;
pub mod sender;

// Re-export commonly used types
pub use capture::{MotionCapture, Sample};
#[cfg(feature = "simulated")]
pub use capture::SimulatedCapture;
pub use config::{load_sensor_config, SensorConfig};
pub use errors::{CaptureError, ConfigError, SensorError, SensorResult};
pub use manager::{clamp_delay, SensorManager, MIN_DELAY};
pub use messages::{Reading, SensorType};
pub use sender::{BroadcastSender, ChannelSender, ReadingStream, Sender};

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, or `info` when it is unset or invalid
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    // One test so the RUST_LOG changes never race each other
    #[test]
    fn test_env_filter_levels() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(env_filter().max_level_hint(), Some(LevelFilter::INFO));

        std::env::set_var("RUST_LOG", "debug");
        assert_eq!(env_filter().max_level_hint(), Some(LevelFilter::DEBUG));

        std::env::set_var("RUST_LOG", "motion_sensors=trace");
        assert_eq!(env_filter().max_level_hint(), Some(LevelFilter::TRACE));

        std::env::remove_var("RUST_LOG");
    }
}
