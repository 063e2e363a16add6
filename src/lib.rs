//! Goriva.si Fuel Price Monitor Library
//!
//! This library polls the public goriva.si search API for a single named
//! filling station and exposes one sensor per fuel type the station quotes,
//! backed by a shared cache that throttles fetches to the upstream API.

pub mod config;
pub mod fuel_price_cache;
pub mod goriva_api;
pub mod sensor;
pub mod setup;

// Re-export commonly used types for easier access
pub use config::Config;
pub use fuel_price_cache::{CacheSnapshot, FetchError, FuelPriceCache, MIN_TIME_BETWEEN_UPDATES};
pub use goriva_api::{GorivaApi, SearchResponse, StationRecord};
pub use sensor::{FuelPriceSensor, SensorAttributes, StateEntity};
pub use setup::{setup_platform, PlatformNotReady};
