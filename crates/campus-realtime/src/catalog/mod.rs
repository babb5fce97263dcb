//! Zone catalog: the immutable set of zones and rooms users can occupy.
//!
//! Built once at startup from a [`ZoneSource`] and shared read-only, so
//! lookups take no locks.

pub mod defaults;
pub mod source;

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use campus_core::AppError;
use campus_core::config::zones::ZoneConfig;
use campus_core::result::AppResult;
use campus_core::traits::ZoneSource;
use campus_core::types::{RoomId, ZoneId};
use campus_entity::zone::Zone;

pub use source::StaticZoneSource;

/// A resolved, joinable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomTarget {
    /// Room id.
    pub room_id: RoomId,
    /// Zone that owns the room.
    pub zone_id: ZoneId,
    /// Display name.
    pub name: String,
    /// Maximum concurrent sessions.
    pub capacity: u32,
}

/// Read-only registry of zones and their rooms.
#[derive(Debug, Clone)]
pub struct ZoneCatalog {
    /// Zones ordered by display name.
    zones: Vec<Zone>,
    /// Zone id → index into `zones`.
    by_id: HashMap<ZoneId, usize>,
    /// Room id → resolved room, across all zones.
    rooms: HashMap<RoomId, RoomTarget>,
}

impl ZoneCatalog {
    /// Builds a catalog, rejecting blank or duplicate zone and room ids.
    pub fn from_zones(zones: Vec<Zone>) -> AppResult<Self> {
        let mut zones = zones;
        zones.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut by_id = HashMap::with_capacity(zones.len());
        let mut rooms = HashMap::new();

        for (idx, zone) in zones.iter().enumerate() {
            if zone.id.is_blank() {
                return Err(AppError::configuration("Zone id must not be empty"));
            }
            if by_id.insert(zone.id.clone(), idx).is_some() {
                return Err(AppError::configuration(format!(
                    "Duplicate zone id '{}'",
                    zone.id
                )));
            }

            for room in &zone.rooms {
                if room.id.is_blank() {
                    return Err(AppError::configuration(format!(
                        "Zone '{}' has a room with an empty id",
                        zone.id
                    )));
                }
                let target = RoomTarget {
                    room_id: room.id.clone(),
                    zone_id: zone.id.clone(),
                    name: room.name.clone(),
                    capacity: room.capacity,
                };
                if rooms.insert(room.id.clone(), target).is_some() {
                    return Err(AppError::configuration(format!(
                        "Duplicate room id '{}'",
                        room.id
                    )));
                }
            }
        }

        Ok(Self {
            zones,
            by_id,
            rooms,
        })
    }

    /// Builds a catalog from configuration records.
    pub fn from_configs(configs: Vec<ZoneConfig>) -> AppResult<Self> {
        Self::from_zones(configs.into_iter().map(Zone::from).collect())
    }

    /// The built-in campus map.
    pub fn campus() -> AppResult<Self> {
        Self::from_configs(defaults::campus_zones())
    }

    /// Loads every record from a source and builds the catalog.
    pub async fn load(source: &dyn ZoneSource) -> AppResult<Self> {
        let configs = source.load().await?;
        let catalog = Self::from_configs(configs)?;
        info!(
            source = source.name(),
            zones = catalog.zones.len(),
            rooms = catalog.rooms.len(),
            "Zone catalog loaded"
        );
        Ok(catalog)
    }

    /// All zones ordered by display name.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Looks up a zone, active or not.
    pub fn get(&self, zone_id: &ZoneId) -> Option<&Zone> {
        self.by_id.get(zone_id).map(|&idx| &self.zones[idx])
    }

    /// Whether the zone exists (active or not).
    pub fn contains(&self, zone_id: &ZoneId) -> bool {
        self.by_id.contains_key(zone_id)
    }

    /// Looks up a zone that users may currently enter.
    pub fn require_active(&self, zone_id: &ZoneId) -> AppResult<&Zone> {
        match self.get(zone_id) {
            Some(zone) if zone.is_active => Ok(zone),
            Some(_) => Err(AppError::invalid_zone(format!("{zone_id} (inactive)"))),
            None => Err(AppError::invalid_zone(zone_id)),
        }
    }

    /// Resolves a room id to a joinable room in an active zone.
    pub fn resolve_room(&self, room_id: &RoomId) -> AppResult<&RoomTarget> {
        let target = self
            .rooms
            .get(room_id)
            .ok_or_else(|| AppError::invalid_zone(room_id))?;
        self.require_active(&target.zone_id)?;
        Ok(target)
    }

    /// Resolves a room id whether or not its zone is active.
    pub fn room(&self, room_id: &RoomId) -> Option<&RoomTarget> {
        self.rooms.get(room_id)
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the catalog has no zones.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
