// Room catalog for the hotel building
// Rooms are generated once per catalog and never change afterwards; availability
// is drawn at build time so every view of the same catalog agrees with the selection.

use crate::config::{HotelConfig, RoomPrices};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate room identifier: {0}")]
    DuplicateRoom(RoomId),

    #[error("Room {room} is listed on floor {floor} but its identifier encodes another floor")]
    FloorMismatch { room: RoomId, floor: u8 },

    #[error("Malformed room identifier: {0}")]
    MalformedId(RoomId),
}

/// Room number, encoded as `{floor}0{sequence}` (e.g. floor 1, room 3 is "103").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(floor: u8, sequence: u8) -> Self {
        Self(format!("{}0{}", floor, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(floor, sequence)` when the identifier is exactly `{1-9}0{1-9}`.
    pub fn parts(&self) -> Option<(u8, u8)> {
        let &[floor, separator, sequence] = self.0.as_bytes() else {
            return None;
        };
        let in_range = |digit: u8| (b'1'..=b'9').contains(&digit);
        if separator != b'0' || !in_range(floor) || !in_range(sequence) {
            return None;
        }
        Some((floor - b'0', sequence - b'0'))
    }

    pub fn floor(&self) -> Option<u8> {
        self.parts().map(|(floor, _)| floor)
    }

    pub fn sequence(&self) -> Option<u8> {
        self.parts().map(|(_, sequence)| sequence)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RoomId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Family,
}

impl RoomType {
    // Every third room on a floor is a family room, the rest alternate
    // single/double starting from single
    pub fn for_sequence(sequence: u8) -> Self {
        if sequence % 3 == 0 {
            RoomType::Family
        } else if sequence % 2 == 0 {
            RoomType::Double
        } else {
            RoomType::Single
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Single => "Individual",
            RoomType::Double => "Doble",
            RoomType::Family => "Familiar",
        }
    }

    pub fn price(&self, prices: &RoomPrices) -> u64 {
        match self {
            RoomType::Single => prices.single,
            RoomType::Double => prices.double,
            RoomType::Family => prices.family,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub floor: u8,
    pub room_type: RoomType,
    pub price: u64,
    pub available: bool,
}

/// Generates `floors * rooms_per_floor` rooms, floor by floor, drawing each
/// room's availability once with `availability_probability`.
pub fn generate_rooms<R: Rng + ?Sized>(
    floors: u8,
    rooms_per_floor: u8,
    prices: &RoomPrices,
    availability_probability: f64,
    rng: &mut R,
) -> Vec<Room> {
    let probability = if availability_probability.is_nan() {
        0.0
    } else {
        availability_probability.clamp(0.0, 1.0)
    };
    let mut rooms = Vec::with_capacity(usize::from(floors) * usize::from(rooms_per_floor));

    for floor in 1..=floors {
        for sequence in 1..=rooms_per_floor {
            let room_type = RoomType::for_sequence(sequence);
            rooms.push(Room {
                id: RoomId::new(floor, sequence),
                floor,
                room_type,
                price: room_type.price(prices),
                available: rng.gen_bool(probability),
            });
        }
    }

    rooms
}

#[derive(Debug, Clone)]
pub struct RoomCatalog {
    rooms: Vec<Room>,
    floors: u8,
}

impl RoomCatalog {
    pub fn generate<R: Rng + ?Sized>(config: &HotelConfig, rng: &mut R) -> Self {
        let rooms = generate_rooms(
            config.floors,
            config.rooms_per_floor,
            &config.prices,
            config.availability_probability,
            rng,
        );
        tracing::debug!(
            rooms = rooms.len(),
            available = rooms.iter().filter(|r| r.available).count(),
            "generated room catalog"
        );
        Self {
            rooms,
            floors: config.floors,
        }
    }

    // Builds a catalog from rooms supplied by an external inventory source
    pub fn from_rooms(rooms: Vec<Room>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(rooms.len());
        for room in &rooms {
            let Some((floor, _)) = room.id.parts() else {
                return Err(CatalogError::MalformedId(room.id.clone()));
            };
            if floor != room.floor {
                return Err(CatalogError::FloorMismatch {
                    room: room.id.clone(),
                    floor: room.floor,
                });
            }
            if !seen.insert(room.id.as_str()) {
                return Err(CatalogError::DuplicateRoom(room.id.clone()));
            }
        }

        let floors = rooms.iter().map(|r| r.floor).max().unwrap_or(0);
        Ok(Self { rooms, floors })
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn get(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id.as_str() == room_id)
    }

    pub fn floor_count(&self) -> u8 {
        self.floors
    }

    pub fn on_floor(&self, floor: u8) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(move |room| room.floor == floor)
    }

    pub fn available_count(&self) -> usize {
        self.rooms.iter().filter(|room| room.available).count()
    }
}
