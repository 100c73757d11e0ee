// Guest details attached to selected rooms, one entry per room

use crate::catalog::RoomId;
use crate::validation::{validate_guest, FieldErrors};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub name: String,
    pub identification: String,
}

#[derive(Debug, Clone, Default)]
pub struct GuestRegister {
    guests: HashMap<RoomId, GuestInfo>,
}

impl GuestRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the guest for `room_id`.
    ///
    /// Nothing is stored when the name or identification is too short; the
    /// returned errors carry one message per failing field.
    pub fn upsert(
        &mut self,
        room_id: RoomId,
        name: &str,
        identification: &str,
    ) -> Result<(), FieldErrors> {
        validate_guest(name, identification).into_result()?;

        let guest = GuestInfo {
            name: name.trim().to_string(),
            identification: identification.trim().to_string(),
        };
        if self.guests.insert(room_id.clone(), guest).is_some() {
            tracing::debug!(room = %room_id, "replaced guest info");
        }
        Ok(())
    }

    pub fn remove(&mut self, room_id: &str) -> Option<GuestInfo> {
        self.guests.remove(room_id)
    }

    pub fn has_guest(&self, room_id: &str) -> bool {
        self.guests.contains_key(room_id)
    }

    pub fn get(&self, room_id: &str) -> Option<&GuestInfo> {
        self.guests.get(room_id)
    }

    pub fn len(&self) -> usize {
        self.guests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }

    pub fn clear(&mut self) {
        self.guests.clear();
    }
}
