//! Leave-aware availability.
//!
//! A supervisor is unavailable on a date iff an approved leave of theirs
//! covers it (inclusive on both ends). Pending, rejected and cancelled
//! leaves are ignored.
//!
//! The resolver is built once per run from a snapshot of the leave store;
//! approvals granted while a run is in flight do not affect it.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::{Result, ScheduleError};
use crate::models::{parse_date, DateRange, LeaveInterval};

/// Answers "is this supervisor free on this date?" from approved leaves.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityResolver {
    /// Approved leave ranges per supervisor id.
    blocked: HashMap<String, Vec<DateRange>>,
}

impl AvailabilityResolver {
    /// Builds a resolver from leave records of any status.
    ///
    /// # Errors
    /// `InvalidLeaveInterval` if an approved leave starts after it ends.
    pub fn new(leaves: &[LeaveInterval]) -> Result<Self> {
        let mut blocked: HashMap<String, Vec<DateRange>> = HashMap::new();
        for leave in leaves.iter().filter(|l| l.is_approved()) {
            if leave.range.is_empty() {
                return Err(ScheduleError::InvalidLeaveInterval {
                    leave: leave.id.clone(),
                    start: leave.range.start,
                    end: leave.range.end,
                });
            }
            blocked
                .entry(leave.supervisor_id.clone())
                .or_default()
                .push(leave.range);
        }
        Ok(Self { blocked })
    }

    /// Whether `supervisor_id` may be assigned on `date`.
    pub fn is_available(&self, supervisor_id: &str, date: NaiveDate) -> bool {
        match self.blocked.get(supervisor_id) {
            None => true,
            Some(ranges) => !ranges.iter().any(|r| r.contains(date)),
        }
    }

    /// Same as [`is_available`](Self::is_available) for a textual date.
    ///
    /// # Errors
    /// `InvalidDate` if `date` is not an ISO calendar date.
    pub fn is_available_on(&self, supervisor_id: &str, date: &str) -> Result<bool> {
        let date = parse_date(date)?;
        Ok(self.is_available(supervisor_id, date))
    }

    /// Number of supervisors with at least one approved leave.
    pub fn supervisors_on_leave(&self) -> usize {
        self.blocked.len()
    }
}
