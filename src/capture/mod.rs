use crate::errors::CaptureResult;
use crate::messages::SensorType;

#[cfg(feature = "simulated")]
pub mod simulated;

#[cfg(feature = "simulated")]
pub use self::simulated::SimulatedCapture;

/// Raw sample as returned by a native read
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Native clock units
    pub timestamp: i64,
    pub vector: [f32; 3],
}

/// Platform motion service backing the sensor manager.
///
/// Calls are synchronous. `read_latest` must not block: it returns the most
/// recent sample the platform has buffered, which may be the same sample as
/// the previous call.
pub trait MotionCapture: Send + Sync {
    fn create_handle(&self) -> CaptureResult<()>;
    fn start_capture(&self, sensor: SensorType, interval_secs: f64);
    fn read_latest(&self, sensor: SensorType) -> Option<Sample>;
    fn stop_capture(&self, sensor: SensorType);
    fn destroy_handle(&self);
}
