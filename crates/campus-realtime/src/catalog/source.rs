//! Zone sources backed by configuration.

use async_trait::async_trait;

use campus_core::config::AppConfig;
use campus_core::config::zones::ZoneConfig;
use campus_core::result::AppResult;
use campus_core::traits::ZoneSource;

use super::defaults::campus_zones;

/// Serves a fixed list of zone records.
#[derive(Debug, Clone)]
pub struct StaticZoneSource {
    name: &'static str,
    zones: Vec<ZoneConfig>,
}

impl StaticZoneSource {
    /// Serves exactly the given records.
    pub fn new(zones: Vec<ZoneConfig>) -> Self {
        Self {
            name: "static",
            zones,
        }
    }

    /// The built-in campus map.
    pub fn campus() -> Self {
        Self {
            name: "built-in campus",
            zones: campus_zones(),
        }
    }

    /// The `[[zones]]` tables of the configuration, or the built-in campus
    /// map when there are none.
    pub fn from_config(config: &AppConfig) -> Self {
        if config.zones.is_empty() {
            Self::campus()
        } else {
            Self {
                name: "configuration",
                zones: config.zones.clone(),
            }
        }
    }
}

#[async_trait]
impl ZoneSource for StaticZoneSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn load(&self) -> AppResult<Vec<ZoneConfig>> {
        Ok(self.zones.clone())
    }
}
