//! Input validation for assignment requests.
//!
//! Checks structural integrity of the roster, rooms, exam calendar and
//! leave records before a run. Detects:
//! - Duplicate IDs
//! - Sessions pointing at unknown rooms
//! - Leaves pointing at unknown supervisors
//! - Leave ranges whose start lies after their end
//! - Overlapping approved leaves of the same supervisor
//!
//! The engine fails fast on the first problem it meets; this module
//! collects every problem at once so callers can report them together.

use crate::models::{ExamSession, LeaveInterval, Room, Supervisor};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two supervisors, rooms or leaves share the same ID.
    DuplicateId,
    /// The calendar lists the same (date, room) pair twice.
    DuplicateSession,
    /// A session references a room that doesn't exist.
    InvalidRoomReference,
    /// A leave references a supervisor that doesn't exist.
    InvalidSupervisorReference,
    /// A leave starts after it ends.
    InvalidLeaveRange,
    /// Two approved leaves of one supervisor share a day.
    OverlappingLeave,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input of an assignment run.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    supervisors: &[Supervisor],
    rooms: &[Room],
    sessions: &[ExamSession],
    leaves: &[LeaveInterval],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut supervisor_ids = HashSet::new();
    for s in supervisors {
        if !supervisor_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate supervisor ID: {}", s.id),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for r in rooms {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
    }

    let mut session_keys = HashSet::new();
    for session in sessions {
        if !session_keys.insert(&session.key) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSession,
                format!("Session {} is listed more than once", session.key),
            ));
        }
        if !room_ids.contains(session.room_id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRoomReference,
                format!(
                    "Session {} references unknown room '{}'",
                    session.key,
                    session.room_id()
                ),
            ));
        }
    }

    let mut leave_ids = HashSet::new();
    let mut approved: HashMap<&str, Vec<&LeaveInterval>> = HashMap::new();
    for leave in leaves {
        if !leave_ids.insert(leave.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate leave ID: {}", leave.id),
            ));
        }
        if !supervisor_ids.contains(leave.supervisor_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSupervisorReference,
                format!(
                    "Leave '{}' references unknown supervisor '{}'",
                    leave.id, leave.supervisor_id
                ),
            ));
        }
        if leave.range.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidLeaveRange,
                format!(
                    "Leave '{}' starts {} after it ends {}",
                    leave.id, leave.range.start, leave.range.end
                ),
            ));
        } else if leave.is_approved() {
            approved
                .entry(leave.supervisor_id.as_str())
                .or_default()
                .push(leave);
        }
    }

    let mut by_supervisor: Vec<_> = approved.into_iter().collect();
    by_supervisor.sort_by_key(|(supervisor, _)| *supervisor);
    for (supervisor, mut list) in by_supervisor {
        list.sort_by_key(|l| (l.range.start, l.range.end));
        for (i, first) in list.iter().enumerate() {
            // Sorted by start: stop at the first leave starting after `first` ends.
            for second in list[i + 1..]
                .iter()
                .take_while(|l| l.range.start <= first.range.end)
            {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OverlappingLeave,
                    format!(
                        "Approved leaves '{}' and '{}' of '{}' overlap",
                        first.id, second.id, supervisor
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
