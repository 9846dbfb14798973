use crate::errors::SensorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical motion sensor class
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Accelerometer,
    Gyroscope,
    Magnetometer,
}

impl SensorType {
    pub const ALL: [SensorType; 3] = [
        SensorType::Accelerometer,
        SensorType::Gyroscope,
        SensorType::Magnetometer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorType::Accelerometer => "accelerometer",
            SensorType::Gyroscope => "gyroscope",
            SensorType::Magnetometer => "magnetometer",
        }
    }

    /// Whether a native capture backs this sensor. The others are accepted
    /// by the manager but never produce readings.
    pub fn is_captured(&self) -> bool {
        matches!(self, SensorType::Accelerometer)
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = SensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accelerometer" => Ok(SensorType::Accelerometer),
            "gyroscope" => Ok(SensorType::Gyroscope),
            "magnetometer" => Ok(SensorType::Magnetometer),
            _ => Err(SensorError::UnknownSensor { name: s.to_string() }),
        }
    }
}

impl TryFrom<u8> for SensorType {
    type Error = SensorError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SensorType::Accelerometer),
            1 => Ok(SensorType::Gyroscope),
            2 => Ok(SensorType::Magnetometer),
            _ => Err(SensorError::UnknownSensor { name: code.to_string() }),
        }
    }
}

/// One timestamped sample of a sensor's axis values
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Reading {
    pub sensor: SensorType,
    /// Native clock units, strictly increasing per sensor
    pub timestamp: i64,
    /// Axis values (x, y, z)
    pub data: [f64; 3],
}

impl Reading {
    pub fn new(sensor: SensorType, timestamp: i64, vector: [f32; 3]) -> Self {
        Self {
            sensor,
            timestamp,
            data: vector.map(f64::from),
        }
    }

    /// Serialize to JSON for debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_type_parsing() {
        assert_eq!("accelerometer".parse::<SensorType>().unwrap(), SensorType::Accelerometer);
        assert_eq!("Gyroscope".parse::<SensorType>().unwrap(), SensorType::Gyroscope);
        assert_eq!(SensorType::try_from(2).unwrap(), SensorType::Magnetometer);

        let err = "barometer".parse::<SensorType>().unwrap_err();
        assert!(matches!(err, SensorError::UnknownSensor { ref name } if name == "barometer"));
        assert!(matches!(SensorType::try_from(7), Err(SensorError::UnknownSensor { .. })));
    }

    #[test]
    fn test_only_accelerometer_is_captured() {
        assert!(SensorType::Accelerometer.is_captured());
        assert!(!SensorType::Gyroscope.is_captured());
        assert!(!SensorType::Magnetometer.is_captured());
    }

    #[test]
    fn test_reading_serialization() {
        let reading = Reading::new(SensorType::Accelerometer, 150, [0.5, -0.25, 1.0]);
        assert_eq!(reading.data, [0.5, -0.25, 1.0]);

        let json = reading.to_json().unwrap();
        assert!(json.contains("\"accelerometer\""));
        assert!(json.contains("150"));

        let decoded: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, reading);
    }
}
