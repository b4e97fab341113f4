//! Runtime configuration from environment variables

use std::path::PathBuf;

pub const DEFAULT_PLANTS_FILE: &str = "plants.json";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_GEOCODER_DELAY_MS: u64 = 1_000;
pub const DEFAULT_GEOCODER_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON snapshot of the registry
    pub plants_file: PathBuf,
    pub port: u16,
    /// Nominatim base URL (no trailing path)
    pub geocoder_url: String,
    /// Fixed wait before each outbound geocoding request
    pub geocoder_delay_ms: u64,
    pub geocoder_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plants_file: PathBuf::from(DEFAULT_PLANTS_FILE),
            port: DEFAULT_PORT,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_delay_ms: DEFAULT_GEOCODER_DELAY_MS,
            geocoder_timeout_ms: DEFAULT_GEOCODER_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Read `PLANTS_FILE`, `PORT`, `GEOCODER_URL`, `GEOCODER_DELAY_MS` and
    /// `GEOCODER_TIMEOUT_MS`; unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            plants_file: lookup("PLANTS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.plants_file),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            geocoder_url: lookup("GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            geocoder_delay_ms: lookup("GEOCODER_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.geocoder_delay_ms),
            geocoder_timeout_ms: lookup("GEOCODER_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.geocoder_timeout_ms),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  PLANTS_FILE: {}", self.plants_file.display());
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  GEOCODER_URL: {}", self.geocoder_url);
        tracing::info!("  GEOCODER_DELAY_MS: {}", self.geocoder_delay_ms);
        tracing::info!("  GEOCODER_TIMEOUT_MS: {}", self.geocoder_timeout_ms);
    }
}
