use crate::cancel::{cancel_pair, CancelHandle};
use crate::capture::MotionCapture;
use crate::config::PollingConfig;
use crate::errors::{SensorError, SensorResult};
use crate::messages::SensorType;
use crate::scheduler::{spawn_polling_task, PollingTask};
use crate::sender::Sender;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shortest supported reporting interval (100 Hz). Motion hardware cannot
/// sample faster, so requested delays below this are raised to it.
pub const MIN_DELAY: Duration = Duration::from_millis(10);

/// Raise `delay` to [`MIN_DELAY`] if it is shorter
pub fn clamp_delay(delay: Duration) -> Duration {
    delay.max(MIN_DELAY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Ready,
    Closed,
}

struct ManagerState {
    lifecycle: Lifecycle,
    /// One entry per enabled sensor; present iff enabled
    enabled: HashMap<SensorType, CancelHandle>,
}

/// Owns the native capture handle and the set of enabled sensors.
///
/// Every enable/disable decision happens under one lock, which is never
/// held while a polling task runs. Each enabled accelerometer gets exactly
/// one polling task; gyroscope and magnetometer are accepted and tracked
/// but produce no readings.
pub struct SensorManager<C: MotionCapture> {
    capture: Arc<C>,
    polling: PollingConfig,
    state: Mutex<ManagerState>,
}

impl<C: MotionCapture + 'static> SensorManager<C> {
    pub fn new(capture: C) -> Self {
        Self::with_polling(capture, PollingConfig::default())
    }

    pub fn with_polling(capture: C, polling: PollingConfig) -> Self {
        Self {
            capture: Arc::new(capture),
            polling,
            state: Mutex::new(ManagerState {
                lifecycle: Lifecycle::Uninitialized,
                enabled: HashMap::new(),
            }),
        }
    }

    pub fn capture(&self) -> &Arc<C> {
        &self.capture
    }

    /// Create the native capture handle. Must succeed before `enable`.
    pub async fn initialize(&self) -> SensorResult<()> {
        let mut state = self.state.lock().await;
        match state.lifecycle {
            Lifecycle::Ready => Ok(()),
            Lifecycle::Closed => Err(SensorError::Closed),
            Lifecycle::Uninitialized => {
                self.capture.create_handle()?;
                state.lifecycle = Lifecycle::Ready;
                info!("[manager] capture handle ready");
                Ok(())
            }
        }
    }

    /// Start delivering `sensor` readings to `sender`, sampling every
    /// `delay` (clamped to [`MIN_DELAY`]).
    pub async fn enable(
        &self,
        sender: Arc<dyn Sender>,
        sensor: SensorType,
        delay: Duration,
    ) -> SensorResult<()> {
        let mut state = self.state.lock().await;
        match state.lifecycle {
            Lifecycle::Ready => {}
            Lifecycle::Uninitialized => return Err(SensorError::NotInitialized),
            Lifecycle::Closed => return Err(SensorError::Closed),
        }

        let delay = clamp_delay(delay);

        if state.enabled.contains_key(&sensor) {
            warn!("[manager] {} is already enabled", sensor);
            return Err(SensorError::AlreadyEnabled { sensor });
        }

        let (handle, signal) = cancel_pair();
        if sensor.is_captured() {
            self.capture.start_capture(sensor, delay.as_secs_f64());
            spawn_polling_task(PollingTask {
                sensor,
                capture: self.capture.clone(),
                sender,
                delay,
                idle_sleep: self.polling.idle_sleep(),
                signal,
            });
            info!("[manager] {} enabled at {:?}", sensor, delay);
        } else {
            info!("[manager] {} enabled (no capture available)", sensor);
        }
        state.enabled.insert(sensor, handle);

        Ok(())
    }

    /// Stop `sensor`. Its polling task exits on its next loop check.
    pub async fn disable(&self, sensor: SensorType) -> SensorResult<()> {
        let mut state = self.state.lock().await;
        let handle = state.enabled.remove(&sensor).ok_or_else(|| {
            warn!("[manager] {} is not enabled", sensor);
            SensorError::NotEnabled { sensor }
        })?;

        self.stop(sensor, handle);
        Ok(())
    }

    /// Disable every enabled sensor, then destroy the native handle.
    /// Closing twice is a no-op.
    pub async fn close(&self) -> SensorResult<()> {
        let mut state = self.state.lock().await;
        if state.lifecycle == Lifecycle::Closed {
            return Ok(());
        }

        let enabled: Vec<(SensorType, CancelHandle)> = state.enabled.drain().collect();
        for (sensor, handle) in enabled {
            self.stop(sensor, handle);
        }

        if state.lifecycle == Lifecycle::Ready {
            self.capture.destroy_handle();
        }
        state.lifecycle = Lifecycle::Closed;
        info!("[manager] closed");
        Ok(())
    }

    pub async fn is_enabled(&self, sensor: SensorType) -> bool {
        self.state.lock().await.enabled.contains_key(&sensor)
    }

    /// Currently enabled sensors, in declaration order
    pub async fn enabled_sensors(&self) -> Vec<SensorType> {
        let state = self.state.lock().await;
        let mut sensors: Vec<SensorType> = state.enabled.keys().copied().collect();
        sensors.sort();
        sensors
    }

    fn stop(&self, sensor: SensorType, handle: CancelHandle) {
        handle.cancel();
        if sensor.is_captured() {
            self.capture.stop_capture(sensor);
        }
        info!("[manager] {} disabled", sensor);
    }
}
