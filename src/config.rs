use std::env;

/// Environment variable carrying the required station name filter
pub const STATION_ENV_VAR: &str = "GORIVA_STATION";

/// Runtime configuration: the single required station name filter.
/// Free text used as a search query, not a unique station key.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub station_filter: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(env::var(STATION_ENV_VAR).unwrap_or_default())
    }

    pub fn new(station_filter: impl Into<String>) -> anyhow::Result<Self> {
        let station_filter = station_filter.into().trim().to_string();
        if station_filter.is_empty() {
            anyhow::bail!("Required to set the station name filter ({STATION_ENV_VAR} env var)");
        }
        Ok(Self { station_filter })
    }
}
