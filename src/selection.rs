// Floor browsing and room selection state

use crate::catalog::{Room, RoomCatalog, RoomId};
use serde::Serialize;
use thiserror::Error;

// Rejected selection transitions. The UI disables the controls that lead here,
// so these are reported to the caller but never shown to the guest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionRejected {
    #[error("Room {0} is not available")]
    Unavailable(RoomId),

    #[error("Room {0} is already selected")]
    AlreadySelected(RoomId),

    #[error("Room {0} is not in the catalog")]
    UnknownRoom(String),

    #[error("Floor {0} does not exist")]
    UnknownFloor(u8),
}

// How a room button is rendered on the floor view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    Available,
    Selected,
    Unavailable,
}

impl RoomState {
    pub fn is_selectable(&self) -> bool {
        matches!(self, RoomState::Available)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomView<'a> {
    pub room: &'a Room,
    pub state: RoomState,
}

/// Rooms chosen by the guest, in the order they were picked.
///
/// Never holds an unavailable room or the same room twice.
#[derive(Debug, Clone, Default)]
pub struct RoomSelection {
    active_floor: Option<u8>,
    rooms: Vec<Room>,
}

impl RoomSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_floor(&mut self, floor: u8) {
        self.active_floor = Some(floor);
    }

    pub fn active_floor(&self) -> Option<u8> {
        self.active_floor
    }

    pub fn select(&mut self, room: &Room) -> Result<(), SelectionRejected> {
        if !room.available {
            return Err(SelectionRejected::Unavailable(room.id.clone()));
        }
        if self.is_selected(room.id.as_str()) {
            return Err(SelectionRejected::AlreadySelected(room.id.clone()));
        }

        self.rooms.push(room.clone());
        Ok(())
    }

    // Returns the removed room; removing a room that is not selected is a no-op
    pub fn deselect(&mut self, room_id: &str) -> Option<Room> {
        let index = self
            .rooms
            .iter()
            .position(|room| room.id.as_str() == room_id)?;
        Some(self.rooms.remove(index))
    }

    pub fn is_selected(&self, room_id: &str) -> bool {
        self.rooms.iter().any(|room| room.id.as_str() == room_id)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.rooms.iter().map(|room| room.price).sum()
    }

    pub fn clear(&mut self) {
        self.rooms.clear();
    }

    pub fn state_of(&self, room: &Room) -> RoomState {
        if !room.available {
            RoomState::Unavailable
        } else if self.is_selected(room.id.as_str()) {
            RoomState::Selected
        } else {
            RoomState::Available
        }
    }

    // Rooms of the active floor with their render state; empty until a floor is picked
    pub fn floor_view<'a>(&self, catalog: &'a RoomCatalog) -> Vec<RoomView<'a>> {
        let Some(floor) = self.active_floor else {
            return Vec::new();
        };

        catalog
            .on_floor(floor)
            .map(|room| RoomView {
                room,
                state: self.state_of(room),
            })
            .collect()
    }
}
