//! Exam room model.

use serde::{Deserialize, Serialize};

/// Supervisors a room requires when none is specified.
pub const DEFAULT_REQUIRED_SUPERVISORS: usize = 2;

/// A room that hosts at most one exam session per date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name (also the tie-break key within a date).
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Supervisors needed per session. Zero means the room is unstaffed.
    pub required_supervisors: usize,
}

impl Room {
    /// Creates a room requiring the default two supervisors.
    ///
    /// The name defaults to the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            capacity: 0,
            required_supervisors: DEFAULT_REQUIRED_SUPERVISORS,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the seating capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the number of supervisors per session.
    pub fn with_required_supervisors(mut self, count: usize) -> Self {
        self.required_supervisors = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_defaults() {
        let r = Room::new("R1");
        assert_eq!(r.name, "R1");
        assert_eq!(r.required_supervisors, 2);
        assert_eq!(r.capacity, 0);
    }

    #[test]
    fn test_room_builder() {
        let r = Room::new("R2")
            .with_name("Hall B")
            .with_capacity(120)
            .with_required_supervisors(4);
        assert_eq!(r.name, "Hall B");
        assert_eq!(r.capacity, 120);
        assert_eq!(r.required_supervisors, 4);
    }
}
