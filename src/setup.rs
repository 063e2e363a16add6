use crate::fuel_price_cache::FuelPriceCache;
use crate::sensor::FuelPriceSensor;
use std::sync::Arc;
use thiserror::Error;

/// Setup could not discover any fuel type with a price; the host should
/// retry setup later. The only error this component lets escape.
#[derive(Debug, Error)]
#[error("no fuel prices available yet for filter `{name_filter}`, platform not ready")]
pub struct PlatformNotReady {
    pub name_filter: String,
}

/// Performs the initial blocking fetch and builds one sensor per fuel type
/// that has a non-null price in the first result.
///
/// The discovered fuel-type set is fixed for the life of the sensors: types
/// appearing later are never added, types disappearing later just read as
/// unavailable. A station with no priced fuel types (including the
/// all-prices-null case) is treated the same as no station at all.
pub async fn setup_platform(
    cache: Arc<FuelPriceCache>,
) -> Result<Vec<FuelPriceSensor>, PlatformNotReady> {
    match discover_sensors(&cache).await {
        Some(sensors) => Ok(sensors),
        None => {
            // The next setup attempt must fetch again; a throttle window
            // started by a failed discovery would starve the host's retries
            cache.reset_throttle().await;
            Err(PlatformNotReady {
                name_filter: cache.name_filter().to_string(),
            })
        }
    }
}

async fn discover_sensors(cache: &Arc<FuelPriceCache>) -> Option<Vec<FuelPriceSensor>> {
    let snapshot = cache.refresh().await.ok()?;

    let record = match (snapshot.record, snapshot.available) {
        (Some(record), true) => record,
        _ => return None,
    };

    let mut fuel_types: Vec<&String> = record
        .prices
        .iter()
        .filter_map(|(fuel_type, price)| price.map(|_| fuel_type))
        .collect();
    if fuel_types.is_empty() {
        return None;
    }
    // Deterministic sensor order regardless of map iteration order
    fuel_types.sort();

    let sensors = fuel_types
        .into_iter()
        .map(|fuel_type| FuelPriceSensor::new(fuel_type, &record, cache.clone()))
        .collect();

    Some(sensors)
}
