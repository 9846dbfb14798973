use crate::messages::Reading;
use async_trait::async_trait;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tracing::trace;

/// Consumer of readings produced by a polling task.
///
/// Sending is fire-and-forget: the polling task never observes whether the
/// reading was accepted.
#[async_trait]
pub trait Sender: Send + Sync {
    async fn send(&self, reading: Reading);
}

/// Forwards readings into a bounded mpsc channel
#[derive(Clone, Debug)]
pub struct ChannelSender {
    tx: mpsc::Sender<Reading>,
}

impl ChannelSender {
    pub fn new(tx: mpsc::Sender<Reading>) -> Self {
        Self { tx }
    }

    /// Create a sender together with the stream it feeds
    pub fn with_stream(capacity: usize) -> (Self, ReadingStream) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), ReadingStream::new(rx))
    }
}

#[async_trait]
impl Sender for ChannelSender {
    async fn send(&self, reading: Reading) {
        if let Err(e) = self.tx.send(reading).await {
            // Receiver dropped - nobody is listening
            trace!("[sender] dropping {} reading: {}", e.0.sensor, e);
        }
    }
}

/// Fans readings out to every broadcast subscriber
#[derive(Clone, Debug)]
pub struct BroadcastSender {
    tx: broadcast::Sender<Reading>,
}

impl BroadcastSender {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Reading> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl Sender for BroadcastSender {
    async fn send(&self, reading: Reading) {
        if self.tx.send(reading).is_err() {
            // No active subscribers - this is fine
            trace!("[sender] no subscribers");
        }
    }
}

/// Readings from a [`ChannelSender`] as a `Stream`
pub struct ReadingStream {
    inner: ReceiverStream<Reading>,
}

impl ReadingStream {
    pub fn new(rx: mpsc::Receiver<Reading>) -> Self {
        Self { inner: ReceiverStream::new(rx) }
    }
}

impl Stream for ReadingStream {
    type Item = Reading;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::SensorType;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_channel_sender_feeds_stream() {
        let (sender, stream) = ChannelSender::with_stream(4);
        sender.send(Reading::new(SensorType::Accelerometer, 1, [0.0, 0.0, 1.0])).await;
        sender.send(Reading::new(SensorType::Accelerometer, 2, [0.0, 0.0, 1.0])).await;
        drop(sender);

        let timestamps: Vec<i64> = stream.map(|r| r.timestamp).collect().await;
        assert_eq!(timestamps, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_send_without_receiver_is_silent() {
        let (sender, stream) = ChannelSender::with_stream(1);
        drop(stream);
        sender.send(Reading::new(SensorType::Accelerometer, 1, [0.0; 3])).await;

        let broadcast = BroadcastSender::new(8);
        broadcast.send(Reading::new(SensorType::Accelerometer, 1, [0.0; 3])).await;
    }

    #[tokio::test]
    async fn test_broadcast_sender_reaches_subscribers() {
        let sender = BroadcastSender::new(8);
        let mut a = sender.subscribe();
        let mut b = sender.subscribe();

        sender.send(Reading::new(SensorType::Accelerometer, 7, [1.0, 2.0, 3.0])).await;
        assert_eq!(a.recv().await.unwrap().timestamp, 7);
        assert_eq!(b.recv().await.unwrap().data, [1.0, 2.0, 3.0]);
    }
}
