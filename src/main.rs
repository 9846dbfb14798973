use motion_sensors::{
    init_tracing, load_sensor_config, ChannelSender, SensorManager, SimulatedCapture,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug for verbose, RUST_LOG=info for normal
    init_tracing();

    info!("[motion-sensors] starting up...");

    // Load configuration from CONFIG_PATH or default
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());
    let sensor_config_path = format!("{}/sensors.toml", config_path);
    let sensor_config = load_sensor_config(&sensor_config_path)?;
    info!("[config] loaded {} sensor(s)", sensor_config.sensors.len());

    let manager = SensorManager::with_polling(SimulatedCapture::new(), sensor_config.polling);
    manager.initialize().await?;

    let (sender, mut readings) = ChannelSender::with_stream(256);
    let sender = Arc::new(sender);
    for entry in sensor_config.sensors.iter() {
        manager.enable(sender.clone(), entry.sensor_type()?, entry.delay()).await?;
    }
    // Only polling tasks hold the sender from here on
    drop(sender);
    info!("[main] enabled {:?}", manager.enabled_sensors().await);

    let consumer = tokio::spawn(async move {
        let mut count = 0u64;
        while let Some(reading) = readings.next().await {
            count += 1;
            debug!(
                "[{}] t={} data={:?}",
                reading.sensor, reading.timestamp, reading.data
            );
        }
        count
    });

    let run_for = std::env::var("RUN_SECONDS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs);
    match run_for {
        Some(duration) => tokio::time::sleep(duration).await,
        None => tokio::signal::ctrl_c().await?,
    }

    info!("[main] shutting down");
    manager.close().await?;

    let count = consumer.await?;
    info!("[main] received {} reading(s)", count);
    Ok(())
}
