use crate::errors::{ConfigError, ConfigResult};
use crate::messages::SensorType;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::time::Duration;

const DEFAULT_IDLE_SLEEP_MS: u64 = 1;

/// Root configuration struct expecting `[[sensor]]` TOML array format
#[derive(Debug, Deserialize)]
pub struct SensorConfig {
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(rename = "sensor", default)]
    pub sensors: Vec<SensorEntry>,
}

/// Polling task tuning, the `[polling]` table
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PollingConfig {
    /// Sleep when the native buffer has no new sample
    #[serde(default = "default_idle_sleep_ms")]
    pub idle_sleep_ms: u64,
}

/// One sensor entry, matching each `[[sensor]]` section
#[derive(Debug, Deserialize)]
pub struct SensorEntry {
    #[serde(rename = "type")]
    pub r#type: String,
    /// Requested delay; the manager clamps it to the platform minimum
    pub delay_ms: u64,
}

fn default_idle_sleep_ms() -> u64 {
    DEFAULT_IDLE_SLEEP_MS
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { idle_sleep_ms: DEFAULT_IDLE_SLEEP_MS }
    }
}

impl PollingConfig {
    pub fn idle_sleep(&self) -> Duration {
        Duration::from_millis(self.idle_sleep_ms)
    }
}

impl SensorEntry {
    pub fn sensor_type(&self) -> ConfigResult<SensorType> {
        self.r#type.parse().map_err(|e: crate::errors::SensorError| ConfigError::InvalidValue {
            field: "sensor.type".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl SensorConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let parsed: SensorConfig = toml::from_str(content)?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.polling.idle_sleep_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.idle_sleep_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for entry in &self.sensors {
            let sensor = entry.sensor_type()?;
            if !seen.insert(sensor) {
                return Err(ConfigError::InvalidValue {
                    field: "sensor.type".to_string(),
                    reason: format!("{} configured more than once", sensor),
                });
            }
        }
        Ok(())
    }
}

/// Loads config from TOML file
pub fn load_sensor_config(path: &str) -> ConfigResult<SensorConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
        path: path.to_string(),
        source,
    })?;
    SensorConfig::from_toml(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sensors() {
        let config = SensorConfig::from_toml(
            r#"
            [polling]
            idle_sleep_ms = 2

            [[sensor]]
            type = "accelerometer"
            delay_ms = 5

            [[sensor]]
            type = "gyroscope"
            delay_ms = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.polling.idle_sleep(), Duration::from_millis(2));
        assert_eq!(config.sensors.len(), 2);
        assert_eq!(config.sensors[0].sensor_type().unwrap(), SensorType::Accelerometer);
        assert_eq!(config.sensors[1].delay(), Duration::from_millis(20));
    }

    #[test]
    fn test_polling_defaults() {
        let config = SensorConfig::from_toml("").unwrap();
        assert_eq!(config.polling.idle_sleep_ms, 1);
        assert!(config.sensors.is_empty());
    }

    #[test]
    fn test_rejects_unknown_and_duplicate_sensors() {
        let unknown = SensorConfig::from_toml("[[sensor]]\ntype = \"barometer\"\ndelay_ms = 10\n");
        assert!(matches!(unknown, Err(ConfigError::InvalidValue { .. })));

        let duplicate = SensorConfig::from_toml(
            "[[sensor]]\ntype = \"accelerometer\"\ndelay_ms = 10\n\n[[sensor]]\ntype = \"accelerometer\"\ndelay_ms = 20\n",
        );
        assert!(matches!(duplicate, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_rejects_zero_idle_sleep() {
        let result = SensorConfig::from_toml("[polling]\nidle_sleep_ms = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { ref field, .. }) if field == "polling.idle_sleep_ms"));
    }

    #[test]
    fn test_missing_file() {
        let result = load_sensor_config("/nonexistent/sensors.toml");
        assert!(matches!(result, Err(ConfigError::LoadError { .. })));
    }
}
