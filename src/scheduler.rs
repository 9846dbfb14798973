use crate::cancel::CancelSignal;
use crate::capture::MotionCapture;
use crate::messages::{Reading, SensorType};
use crate::sender::Sender;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, trace};

/// Everything one polling task needs for its lifetime
pub struct PollingTask<C: MotionCapture> {
    pub sensor: SensorType,
    pub capture: Arc<C>,
    pub sender: Arc<dyn Sender>,
    /// Effective (already clamped) sampling delay
    pub delay: Duration,
    /// Sleep when the native buffer has not been refreshed
    pub idle_sleep: Duration,
    pub signal: CancelSignal,
}

/// Spawn the polling loop for one enabled sensor.
///
/// The task forwards every sample whose timestamp is strictly newer than
/// the last one it sent, then sleeps half the sampling delay. It exits once
/// its cancel signal fires; nobody is required to join it.
pub fn spawn_polling_task<C>(task: PollingTask<C>) -> JoinHandle<()>
where
    C: MotionCapture + 'static,
{
    tokio::spawn(task.run())
}

impl<C: MotionCapture> PollingTask<C> {
    async fn run(self) {
        let PollingTask { sensor, capture, sender, delay, idle_sleep, mut signal } = self;
        let emit_sleep = delay / 2;
        // The first sample seen is whatever the buffer held before this
        // task started; it only sets the baseline.
        let mut last_timestamp: Option<i64> = None;
        let mut sent: u64 = 0;

        info!("[{}] Starting polling task every {:?}", sensor, delay);

        loop {
            if signal.is_cancelled() {
                break;
            }

            let pause = match (capture.read_latest(sensor), last_timestamp) {
                (Some(sample), None) => {
                    trace!("[{}] baseline t={}", sensor, sample.timestamp);
                    last_timestamp = Some(sample.timestamp);
                    idle_sleep
                }
                (Some(sample), Some(last)) if sample.timestamp > last => {
                    trace!("[{}] t={} {:?}", sensor, sample.timestamp, sample.vector);
                    let reading = Reading::new(sensor, sample.timestamp, sample.vector);
                    // A full consumer must not keep a disabled task alive
                    tokio::select! {
                        _ = signal.cancelled() => break,
                        _ = sender.send(reading) => {}
                    }
                    last_timestamp = Some(sample.timestamp);
                    sent += 1;
                    emit_sleep
                }
                // Stale or missing sample
                _ => idle_sleep,
            };

            tokio::select! {
                _ = signal.cancelled() => break,
                _ = sleep(pause) => {}
            }
        }

        debug!("[{}] Polling task stopped after {} reading(s)", sensor, sent);
    }
}
