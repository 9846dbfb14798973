use super::{MotionCapture, Sample};
use crate::errors::{CaptureError, CaptureResult};
use crate::messages::SensorType;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Wobble amplitude around the gravity vector, in g
const WOBBLE_G: f32 = 0.02;

struct ActiveCapture {
    interval: Duration,
    since: Instant,
}

#[derive(Default)]
struct CaptureState {
    handle_open: bool,
    active: HashMap<SensorType, ActiveCapture>,
}

/// In-process motion service for hosts without motion hardware.
///
/// Behaves like a device buffer refreshed once per capture interval: the
/// timestamp (nanoseconds since `start_capture`) only moves forward when a
/// new interval has elapsed, so reading faster than the interval returns
/// the same sample again.
pub struct SimulatedCapture {
    state: Mutex<CaptureState>,
    fail_create: bool,
}

impl SimulatedCapture {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CaptureState::default()),
            fail_create: false,
        }
    }

    /// A capture whose handle creation always fails
    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::new()
        }
    }

    pub fn is_capturing(&self, sensor: SensorType) -> bool {
        self.lock().active.contains_key(&sensor)
    }

    pub fn handle_open(&self) -> bool {
        self.lock().handle_open
    }

    fn lock(&self) -> MutexGuard<'_, CaptureState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SimulatedCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionCapture for SimulatedCapture {
    fn create_handle(&self) -> CaptureResult<()> {
        if self.fail_create {
            return Err(CaptureError::HandleCreation {
                reason: "simulated device unavailable".to_string(),
            });
        }
        self.lock().handle_open = true;
        info!("[capture] simulated handle created");
        Ok(())
    }

    fn start_capture(&self, sensor: SensorType, interval_secs: f64) {
        let mut state = self.lock();
        if !state.handle_open {
            return;
        }
        let interval = Duration::from_secs_f64(interval_secs);
        debug!("[capture] {} started at {:?}", sensor, interval);
        state.active.insert(sensor, ActiveCapture { interval, since: Instant::now() });
    }

    fn read_latest(&self, sensor: SensorType) -> Option<Sample> {
        let state = self.lock();
        if !state.handle_open {
            return None;
        }
        let capture = state.active.get(&sensor)?;

        let interval_ns = capture.interval.as_nanos().max(1);
        let ticks = capture.since.elapsed().as_nanos() / interval_ns + 1;
        let timestamp = i64::try_from(ticks * interval_ns).ok()?;

        let phase = (ticks as f32) * 0.1;
        Some(Sample {
            timestamp,
            vector: [WOBBLE_G * phase.sin(), WOBBLE_G * phase.cos(), -1.0],
        })
    }

    fn stop_capture(&self, sensor: SensorType) {
        if self.lock().active.remove(&sensor).is_some() {
            debug!("[capture] {} stopped", sensor);
        }
    }

    fn destroy_handle(&self) {
        let mut state = self.lock();
        state.active.clear();
        state.handle_open = false;
        info!("[capture] simulated handle destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timestamp_advances_once_per_interval() {
        let capture = SimulatedCapture::new();
        capture.create_handle().unwrap();
        capture.start_capture(SensorType::Accelerometer, 0.01);

        let first = capture.read_latest(SensorType::Accelerometer).unwrap();
        let again = capture.read_latest(SensorType::Accelerometer).unwrap();
        assert_eq!(first.timestamp, again.timestamp);
        assert!(first.timestamp > 0);

        tokio::time::advance(Duration::from_millis(10)).await;
        let next = capture.read_latest(SensorType::Accelerometer).unwrap();
        assert_eq!(next.timestamp, first.timestamp + 10_000_000);
    }

    #[test]
    fn test_reads_require_open_handle_and_started_capture() {
        let capture = SimulatedCapture::new();
        capture.start_capture(SensorType::Accelerometer, 0.01);
        assert!(capture.read_latest(SensorType::Accelerometer).is_none());

        capture.create_handle().unwrap();
        assert!(capture.read_latest(SensorType::Accelerometer).is_none());

        capture.start_capture(SensorType::Accelerometer, 0.01);
        assert!(capture.read_latest(SensorType::Accelerometer).is_some());
        assert!(capture.read_latest(SensorType::Gyroscope).is_none());

        capture.destroy_handle();
        assert!(capture.read_latest(SensorType::Accelerometer).is_none());
        assert!(!capture.is_capturing(SensorType::Accelerometer));
    }

    #[test]
    fn test_failing_handle() {
        let capture = SimulatedCapture::failing();
        assert!(capture.create_handle().is_err());
        assert!(!capture.handle_open());
    }
}
