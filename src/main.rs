use std::{sync::Arc, time::Duration};

use log::info;
use rand::Rng;

use runpulse::{EngineSettings, GeoPoint, MemoryMetrics, RunController};

/// Drives the engine through a short simulated run: countdown, a jittered
/// GPS walk heading north, one pause for a breather, then the final flush.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("runpulse demo starting up...");

    let settings = EngineSettings::default();
    let sink = Arc::new(MemoryMetrics::new());
    let controller = RunController::new(sink.clone(), &settings);

    controller.begin_run().await?;
    for remaining in (0..=3).rev() {
        info!("countdown: {remaining}");
        controller.countdown(remaining).await?;
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    let origin = GeoPoint::new(37.5, 127.0);
    controller.update_position(origin).await?;

    let mut rng = rand::thread_rng();
    let mut latitude = origin.latitude;

    for second in 1..=30u32 {
        tokio::time::sleep(Duration::from_secs(1)).await;

        // Roughly 3 m/s northwards with a little GPS noise.
        latitude += 0.000_027 + rng.gen_range(-0.000_005..0.000_005);
        controller
            .update_position(GeoPoint::new(latitude, origin.longitude))
            .await?;

        if second == 12 {
            controller.pause().await?;
            info!("taking a breather");
            tokio::time::sleep(Duration::from_secs(3)).await;
            controller.resume().await?;
        }

        if second % 10 == 0 {
            let snapshot = controller.snapshot().await;
            info!(
                "time {} | {} km | pace {}",
                snapshot.time_text, snapshot.km_text, snapshot.pace_text
            );
        }
    }

    let finals = controller.stop().await?;
    info!(
        "final reading: time {} | {} km | pace {}",
        finals.time_text, finals.km_text, finals.pace_text
    );
    info!("store now holds {:?}", sink.snapshot());

    Ok(())
}
