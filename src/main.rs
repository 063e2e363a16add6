use goriva_price_monitor::{setup_platform, Config, FuelPriceCache, GorivaApi, StateEntity};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

/// How often the update loop ticks each sensor. Actual upstream fetches are
/// bounded separately by the cache's throttle window.
const UPDATE_TICK: Duration = Duration::from_secs(60);

/// Wait before retrying setup when no fuel prices are available yet
const SETUP_RETRY_DELAY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("Starting goriva.si fuel price monitor");
    let config = Config::from_env()?;
    println!("Watching station filter `{}`", config.station_filter);

    let cache = Arc::new(FuelPriceCache::new(
        GorivaApi::new(),
        config.station_filter.clone(),
    ));

    // Play the host's role: retry setup until the station reports prices
    let mut sensors = loop {
        match setup_platform(cache.clone()).await {
            Ok(sensors) => break sensors,
            Err(e) => {
                println!("{e}, retrying in {}s", SETUP_RETRY_DELAY.as_secs());
                time::sleep(SETUP_RETRY_DELAY).await;
            }
        }
    };
    println!("Discovered {} fuel price sensors", sensors.len());

    let mut tick = time::interval(UPDATE_TICK);
    loop {
        tick.tick().await;
        for sensor in &mut sensors {
            sensor.update().await;
            match sensor.state() {
                Some(price) => println!(
                    "{}: {price} {} ({})",
                    sensor.name(),
                    sensor.unit_of_measurement(),
                    sensor.attributes().address
                ),
                None => println!("{}: unknown", sensor.name()),
            }
        }
    }
}
