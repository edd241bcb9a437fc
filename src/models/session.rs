//! Exam session model.
//!
//! A session is one (date, room) pairing. Its identity is the pair itself;
//! a room hosts at most one session per date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an exam session.
///
/// Orders by date first, then room id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    /// Exam date.
    pub date: NaiveDate,
    /// Hosting room id.
    pub room_id: String,
}

impl SessionKey {
    /// Creates a session key.
    pub fn new(date: NaiveDate, room_id: impl Into<String>) -> Self {
        Self {
            date,
            room_id: room_id.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.date, self.room_id)
    }
}

/// An exam session with its assigned supervisor slots.
///
/// Once committed, `slots` holds exactly the room's required number of
/// distinct supervisor ids. Partially filled lists exist only inside a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSession {
    /// Session identity.
    pub key: SessionKey,
    /// Assigned supervisor ids, in commit order.
    pub slots: Vec<String>,
}

impl ExamSession {
    /// Creates an unassigned session placeholder.
    pub fn new(date: NaiveDate, room_id: impl Into<String>) -> Self {
        Self {
            key: SessionKey::new(date, room_id),
            slots: Vec::new(),
        }
    }

    /// Session date.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.key.date
    }

    /// Hosting room id.
    #[inline]
    pub fn room_id(&self) -> &str {
        &self.key.room_id
    }

    /// Whether a supervisor holds a slot here.
    pub fn has_supervisor(&self, supervisor_id: &str) -> bool {
        self.slots.iter().any(|s| s == supervisor_id)
    }

    /// Returns a copy of this session carrying a different slot list.
    pub fn with_slots(&self, slots: Vec<String>) -> Self {
        Self {
            key: self.key.clone(),
            slots,
        }
    }
}
