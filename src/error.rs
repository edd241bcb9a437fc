//! Failure taxonomy for assignment runs.
//!
//! `ScheduleError` is what callers see. `PoolError` and `Conflict` are
//! intermediate signals raised inside slot filling; the engine is the
//! single place that translates them into `ScheduleError`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::SessionKey;

/// Public failure of an assignment run or of date handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Malformed or out-of-range date input.
    #[error("invalid date: {input:?}")]
    InvalidDate { input: String },

    /// A leave interval whose start lies after its end.
    #[error("leave {leave} has an invalid range: {start} > {end}")]
    InvalidLeaveInterval {
        leave: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Fewer supervisors on the roster than the largest room requires.
    #[error("roster has {available} supervisors, at least {minimum} required")]
    InsufficientRoster { available: usize, minimum: usize },

    /// A session refers to a room that is not in the room list.
    #[error("session {session} refers to an unknown room")]
    UnknownRoom { session: SessionKey },

    /// The exam calendar lists the same (date, room) pair twice.
    #[error("session {session} is listed more than once")]
    DuplicateSession { session: SessionKey },

    /// A session cannot be staffed with the supervisors still available.
    #[error("session {session} is under-staffed: {available} available, {required} required")]
    InsufficientSupervisors {
        session: SessionKey,
        available: usize,
        required: usize,
    },

    /// The conflict guard rejected a commit the engine cannot repair.
    #[error("internal invariant violated in session {session}: {conflict}")]
    InvariantViolation {
        session: SessionKey,
        conflict: Conflict,
    },

    /// The caller abandoned the run before it finished.
    #[error("assignment run cancelled")]
    Cancelled,
}

/// Result alias for assignment operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Raised by the eligible-pool selector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Nobody is available and unassigned for the session.
    #[error("no eligible supervisor for session {0}")]
    NoEligibleSupervisor(SessionKey),
}

/// Rejection reason from the conflict guard.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// Candidate already holds a slot in this session.
    #[error("supervisor {supervisor} already assigned to this session")]
    AlreadyInSession { supervisor: String },

    /// Candidate already works another room on the same date.
    #[error("supervisor {supervisor} already assigned to {other} on the same date")]
    DoubleBooked {
        supervisor: String,
        other: SessionKey,
    },

    /// Every slot of the session is taken.
    #[error("session already has {required} supervisors")]
    SessionFull { required: usize },
}

impl Conflict {
    /// Whether excluding the candidate and selecting again can resolve it.
    pub fn is_repairable(&self) -> bool {
        !matches!(self, Conflict::SessionFull { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SessionKey {
        SessionKey::new(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), "R1")
    }

    #[test]
    fn test_messages_name_the_session() {
        let err = ScheduleError::InsufficientSupervisors {
            session: key(),
            available: 0,
            required: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-06-03"));
        assert!(msg.contains("R1"));
        assert!(msg.contains("0 available"));
    }

    #[test]
    fn test_conflict_repairable() {
        assert!(Conflict::AlreadyInSession {
            supervisor: "S1".into()
        }
        .is_repairable());
        assert!(Conflict::DoubleBooked {
            supervisor: "S1".into(),
            other: key(),
        }
        .is_repairable());
        assert!(!Conflict::SessionFull { required: 2 }.is_repairable());
    }
}
