use crate::fuel_price_cache::{CacheSnapshot, FuelPriceCache};
use crate::goriva_api::StationRecord;
use std::sync::Arc;

pub const ATTRIBUTION: &str = "https://goriva.si";
const UNIT_OF_MEASUREMENT: &str = "€";
const ICON: &str = "mdi:gas-station";

/// Descriptive attributes exposed alongside the price
#[derive(Debug, Clone, PartialEq)]
pub struct SensorAttributes {
    pub attribution: &'static str,
    pub fuel_type: String,
    pub address: String,
}

/// The read-only surface a host platform consumes from a sensor
pub trait StateEntity {
    fn name(&self) -> &str;
    fn unique_id(&self) -> &str;
    fn state(&self) -> Option<f64>;
    fn unit_of_measurement(&self) -> &str;
    fn icon(&self) -> &str;
    fn attributes(&self) -> &SensorAttributes;
}

/// One fuel-price sensor for a single fuel type at the configured station.
///
/// Sensors share one `FuelPriceCache`; each update asks the cache to refresh
/// (throttled) and copies this fuel type's price into its own state. A failed
/// or stale-unavailable refresh degrades the state to `None`, it never
/// removes the sensor.
pub struct FuelPriceSensor {
    name: String,
    unique_id: String,
    fuel_type: String,
    state: Option<f64>,
    attributes: SensorAttributes,
    cache: Arc<FuelPriceCache>,
}

impl FuelPriceSensor {
    pub fn new(fuel_type: &str, record: &StationRecord, cache: Arc<FuelPriceCache>) -> Self {
        let name = format!("{} - {}", title_case(&record.name), fuel_type);
        let unique_id = format!("{name}_{fuel_type}");
        Self {
            name,
            unique_id,
            fuel_type: fuel_type.to_string(),
            state: record.prices.get(fuel_type).copied().flatten(),
            attributes: SensorAttributes {
                attribution: ATTRIBUTION,
                fuel_type: fuel_type.to_string(),
                address: capitalize(&record.address),
            },
            cache,
        }
    }

    /// Host-driven update tick. Refreshes the shared cache (throttled) and
    /// recomputes state and attributes from whatever record it now holds.
    pub async fn update(&mut self) {
        match self.cache.refresh().await {
            Ok(snapshot) => self.apply_snapshot(&snapshot),
            Err(e) => {
                println!("Error retrieving data from goriva.si: {e}");
                self.state = None;
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: &CacheSnapshot) {
        let record = match (&snapshot.record, snapshot.available) {
            (Some(record), true) => record,
            _ => {
                println!(
                    "Error retrieving data from goriva.si: no fresh data for `{}`",
                    self.name
                );
                self.state = None;
                return;
            }
        };

        self.state = record.prices.get(&self.fuel_type).copied().flatten();
        if self.state.is_none() {
            println!(
                "No `{}` price in the latest data for `{}`",
                self.fuel_type, self.name
            );
        }
        self.attributes.address = capitalize(&record.address);
    }
}

impl StateEntity for FuelPriceSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn state(&self) -> Option<f64> {
        self.state
    }

    fn unit_of_measurement(&self) -> &str {
        UNIT_OF_MEASUREMENT
    }

    fn icon(&self) -> &str {
        ICON
    }

    fn attributes(&self) -> &SensorAttributes {
        &self.attributes
    }
}

/// Uppercases the first letter of every word, lowercases the rest
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Uppercases the first character, lowercases everything after it
fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel_price_cache::FuelPriceCache;
    use crate::goriva_api::GorivaApi;
    use std::collections::HashMap;
    use std::time::Duration;

    fn test_record() -> StationRecord {
        let mut prices = HashMap::new();
        prices.insert("diesel".to_string(), Some(1.45));
        prices.insert("petrol_95".to_string(), None);
        StationRecord {
            name: "shell".to_string(),
            address: "dunajska 1".to_string(),
            prices,
        }
    }

    fn offline_cache() -> Arc<FuelPriceCache> {
        // Points nowhere; fine for tests that never call update()
        Arc::new(FuelPriceCache::new(
            GorivaApi::with_endpoint("http://127.0.0.1:9"),
            "shell",
        ))
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("shell"), "Shell");
        assert_eq!(title_case("petrol dunajska cesta"), "Petrol Dunajska Cesta");
        assert_eq!(title_case("OMV 1-2"), "Omv 1-2");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("dunajska 1"), "Dunajska 1");
        assert_eq!(capitalize("DUNAJSKA CESTA"), "Dunajska cesta");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_sensor_naming_and_initial_state() {
        let sensor = FuelPriceSensor::new("diesel", &test_record(), offline_cache());

        assert_eq!(sensor.name(), "Shell - diesel");
        assert_eq!(sensor.unique_id(), "Shell - diesel_diesel");
        assert_eq!(sensor.state(), Some(1.45));
        assert_eq!(sensor.unit_of_measurement(), "€");
        assert_eq!(sensor.icon(), "mdi:gas-station");
        assert_eq!(sensor.attributes().attribution, ATTRIBUTION);
        assert_eq!(sensor.attributes().fuel_type, "diesel");
        assert_eq!(sensor.attributes().address, "Dunajska 1");
    }

    #[test]
    fn test_sensor_null_price_starts_unknown() {
        let sensor = FuelPriceSensor::new("petrol_95", &test_record(), offline_cache());
        assert_eq!(sensor.state(), None);
    }

    #[tokio::test]
    async fn test_update_degrades_and_recovers() {
        let mut server = mockito::Server::new_async().await;
        let good_body =
            r#"{"results": [{"name": "shell", "address": "dunajska 1", "prices": {"diesel": 1.45}}]}"#;

        let _good = server
            .mock("GET", "/api/v1/search/?position=Ljubljana&name=shell")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(good_body)
            .create_async()
            .await;

        let cache = Arc::new(FuelPriceCache::with_interval(
            GorivaApi::with_endpoint(server.url()),
            "shell",
            Duration::ZERO,
        ));

        let snapshot = cache.refresh().await.unwrap();
        let record = snapshot.record.unwrap();
        let mut sensor = FuelPriceSensor::new("diesel", &record, cache.clone());
        assert_eq!(sensor.state(), Some(1.45));

        // Upstream fails: state degrades to unknown, sensor stays usable
        let _failing = server
            .mock("GET", "/api/v1/search/?position=Ljubljana&name=shell")
            .with_status(500)
            .create_async()
            .await;

        sensor.update().await;
        assert_eq!(sensor.state(), None);

        // Upstream recovers with a new price; the newest mock wins
        let _updated = server
            .mock("GET", "/api/v1/search/?position=Ljubljana&name=shell")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results": [{"name": "shell", "address": "dunajska 1", "prices": {"diesel": 1.52}}]}"#,
            )
            .create_async()
            .await;

        sensor.update().await;
        assert_eq!(sensor.state(), Some(1.52));
    }
}
