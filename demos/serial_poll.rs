use std::time::Duration;

use radonlink::{RadonSensor, Reading, ReadingSink, SensorConfig, SerialByteSource, TickOutcome};

/// Prints every decoded reading and link status change to stdout
struct StdoutSink {
    last_online: Option<bool>,
}

impl ReadingSink for StdoutSink {
    fn publish_reading(&mut self, reading: &Reading) {
        println!(
            "running {}s | cumulative {} Bq/m³ | 10min {} | 1h {} | 12h {} | 24h {} | 48h {} | 96h {}",
            reading.running_time,
            reading.cumulative_radon,
            reading.last_10_min,
            reading.last_1_hour,
            reading.last_12_hour,
            reading.last_24_hour,
            reading.last_48_hour,
            reading.last_96_hour,
        );
    }

    fn publish_link_status(&mut self, online: bool) {
        if self.last_online != Some(online) {
            println!("sensor is now {}", if online { "online" } else { "offline" });
            self.last_online = Some(online);
        }
    }
}

#[tokio::main]
async fn main() -> radonlink::Result<()> {
    tracing_subscriber::fmt::init();

    let device = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let baud_rate = 9600;
    // The sensor pushes one frame roughly every 10 seconds
    let poll_interval = Duration::from_secs(10);

    println!("Polling radon sensor on {} at {} baud", device, baud_rate);
    println!("Poll interval: {:?}", poll_interval);

    let source = SerialByteSource::open(&device, baud_rate)?;
    let mut sensor = RadonSensor::new(Box::new(source), SensorConfig::default())
        .with_sink(Box::new(StdoutSink { last_online: None }))
        .with_corrective_action(Box::new(|| {
            eprintln!("too many consecutive CRC failures, consider resetting the link");
        }));

    let mut ticks = tokio::time::interval(poll_interval);
    loop {
        ticks.tick().await;
        match sensor.poll()? {
            TickOutcome::AwaitingHandshake => println!("waiting for handshake token..."),
            TickOutcome::HandshakeComplete => println!("handshake complete"),
            TickOutcome::Decoded(_) => {}
            other => println!("tick: {:?}", other),
        }
    }
}
