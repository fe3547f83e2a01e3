//! Room directory, membership and occupancy.

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomsState {
    /// Every room the server knows about.
    pub available: Vec<String>,
    /// Rooms this user has joined, as last reported.
    pub joined: Vec<String>,
    /// Last-known participant count per room.
    pub occupancy: BTreeMap<String, u32>,
}

impl RoomsState {
    pub fn set_available(&mut self, rooms: Vec<String>) {
        self.available = rooms;
    }

    pub fn set_joined(&mut self, rooms: Vec<String>) {
        self.joined = rooms;
    }

    /// Only `room` changes; every other count is left alone.
    pub fn set_count(&mut self, room: String, count: u32) {
        self.occupancy.insert(room, count);
    }

    pub fn count(&self, room: &str) -> Option<u32> {
        self.occupancy.get(room).copied()
    }

    pub fn has_joined(&self, room: &str) -> bool {
        self.joined.iter().any(|r| r == room)
    }
}
