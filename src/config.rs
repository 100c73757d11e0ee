// Hotel configuration: building shape, room prices and the messaging contact

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// Room identifiers are `{floor}0{sequence}`; both parts must stay single digits
pub const MAX_FLOORS: u8 = 9;
pub const MAX_ROOMS_PER_FLOOR: u8 = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelConfig {
    pub floors: u8,
    pub rooms_per_floor: u8,
    // Probability that a room is drawn as available when a catalog is built
    pub availability_probability: f64,
    pub prices: RoomPrices,
    pub contact: ContactConfig,
    pub date_style: DateStyle,
    // None keeps a session's catalog for the whole session
    pub catalog_ttl_seconds: Option<u64>,
    // A session untouched this long releases its catalog; None disables it
    pub session_idle_seconds: Option<u64>,
    // Sessions holding a catalog at once, least recently used evicted first
    pub max_sessions: usize,
}

impl Default for HotelConfig {
    fn default() -> Self {
        Self {
            floors: 6,
            rooms_per_floor: 5,
            availability_probability: 0.7,
            prices: RoomPrices::default(),
            contact: ContactConfig::default(),
            date_style: DateStyle::Long,
            catalog_ttl_seconds: None,
            session_idle_seconds: Some(30 * 60),
            max_sessions: 10_000,
        }
    }
}

// Flat per-room prices, no currency minor units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomPrices {
    pub single: u64,
    pub double: u64,
    pub family: u64,
}

impl Default for RoomPrices {
    fn default() -> Self {
        Self {
            single: 80_000,
            double: 120_000,
            family: 180_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub messaging_host: String,
    pub contact_id: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            messaging_host: "wa.me".to_string(),
            contact_id: "573138165536".to_string(),
        }
    }
}

// How dates are written into the reservation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    // "1 de junio de 2025"
    #[default]
    Long,
    // "01/06/2025"
    Numeric,
}

impl HotelConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: HotelConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn catalog_ttl(&self) -> Option<Duration> {
        self.catalog_ttl_seconds.map(Duration::from_secs)
    }

    pub fn session_idle_timeout(&self) -> Option<Duration> {
        self.session_idle_seconds.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.floors == 0 || self.floors > MAX_FLOORS {
            return Err(ConfigError::Invalid(format!(
                "floors must be between 1 and {}, got {}",
                MAX_FLOORS, self.floors
            )));
        }
        if self.rooms_per_floor == 0 || self.rooms_per_floor > MAX_ROOMS_PER_FLOOR {
            return Err(ConfigError::Invalid(format!(
                "rooms_per_floor must be between 1 and {}, got {}",
                MAX_ROOMS_PER_FLOOR, self.rooms_per_floor
            )));
        }
        if !(0.0..=1.0).contains(&self.availability_probability) {
            return Err(ConfigError::Invalid(format!(
                "availability_probability must be within [0, 1], got {}",
                self.availability_probability
            )));
        }

        let RoomPrices {
            single,
            double,
            family,
        } = self.prices;
        if single == 0 {
            return Err(ConfigError::Invalid("room prices must be positive".to_string()));
        }
        if !(single < double && double < family) {
            return Err(ConfigError::Invalid(format!(
                "room prices must increase single < double < family, got {} / {} / {}",
                single, double, family
            )));
        }

        if self.max_sessions == 0 {
            return Err(ConfigError::Invalid("max_sessions must be positive".to_string()));
        }

        if self.contact.messaging_host.trim().is_empty() {
            return Err(ConfigError::Invalid("messaging_host is empty".to_string()));
        }
        if self.contact.contact_id.trim().is_empty() {
            return Err(ConfigError::Invalid("contact_id is empty".to_string()));
        }

        Ok(())
    }
}
