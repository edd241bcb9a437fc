//! Conflict guard.
//!
//! Checked before every slot commit. A candidate is rejected if they
//! already hold a slot in the session, already work another room on the
//! same date, or if the session is already full.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::Conflict;
use crate::models::{ExamSession, SessionKey};

/// Tracks who works where on each date during a run.
#[derive(Debug, Clone, Default)]
pub struct ConflictGuard {
    bookings: HashMap<NaiveDate, HashMap<String, SessionKey>>,
}

impl ConflictGuard {
    /// Creates an empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `candidate` may take the next slot of `session`.
    pub fn check(
        &self,
        session: &ExamSession,
        required: usize,
        candidate: &str,
    ) -> Result<(), Conflict> {
        if session.has_supervisor(candidate) {
            return Err(Conflict::AlreadyInSession {
                supervisor: candidate.to_string(),
            });
        }
        if let Some(other) = self.booking(candidate, session.date()) {
            if other != &session.key {
                return Err(Conflict::DoubleBooked {
                    supervisor: candidate.to_string(),
                    other: other.clone(),
                });
            }
        }
        if session.slots.len() >= required {
            return Err(Conflict::SessionFull { required });
        }
        Ok(())
    }

    /// Records that `supervisor` works `session`.
    pub fn book(&mut self, session: &SessionKey, supervisor: &str) {
        self.bookings
            .entry(session.date)
            .or_default()
            .insert(supervisor.to_string(), session.clone());
    }

    /// The session a supervisor works on `date`, if any.
    pub fn booking(&self, supervisor: &str, date: NaiveDate) -> Option<&SessionKey> {
        self.bookings.get(&date).and_then(|day| day.get(supervisor))
    }

    /// Supervisors already booked on `date`.
    pub fn booked_on(&self, date: NaiveDate) -> impl Iterator<Item = &str> {
        self.bookings
            .get(&date)
            .into_iter()
            .flat_map(|day| day.keys().map(String::as_str))
    }
}
