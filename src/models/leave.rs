//! Leave model and leave register.
//!
//! A leave is an inclusive date interval during which a supervisor may be
//! excluded from every session. Only `Approved` leaves affect availability.
//!
//! The register enforces the one invariant the scheduler relies on but
//! never checks itself: a supervisor's live leaves (pending or approved)
//! never overlap.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DateRange;

/// Approval state of a leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
    /// Awaiting review.
    Pending,
    /// Granted; blocks assignment.
    Approved,
    /// Refused by a reviewer.
    Rejected,
    /// Withdrawn after the request.
    Cancelled,
}

impl LeaveStatus {
    /// Whether the leave still claims its dates.
    pub fn is_live(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }
}

/// A supervisor's leave interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveInterval {
    /// Leave identifier.
    pub id: String,
    /// Supervisor taking leave.
    pub supervisor_id: String,
    /// Covered days (inclusive).
    pub range: DateRange,
    /// Approval state.
    pub status: LeaveStatus,
    /// Free-form reason given by the requester.
    pub reason: String,
    /// Reviewer's reason when rejected.
    pub rejection_reason: Option<String>,
}

impl LeaveInterval {
    /// Creates a pending leave.
    pub fn new(
        id: impl Into<String>,
        supervisor_id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            supervisor_id: supervisor_id.into(),
            range: DateRange::new(start, end),
            status: LeaveStatus::Pending,
            reason: String::new(),
            rejection_reason: None,
        }
    }

    /// Creates an approved leave.
    pub fn approved(
        id: impl Into<String>,
        supervisor_id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self::new(id, supervisor_id, start, end).with_status(LeaveStatus::Approved)
    }

    /// Sets the status.
    pub fn with_status(mut self, status: LeaveStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Whether this leave is approved.
    #[inline]
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    /// Whether this is an approved leave covering `date`.
    pub fn blocks(&self, date: NaiveDate) -> bool {
        self.is_approved() && self.range.contains(date)
    }
}

/// Leave register failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaveError {
    /// No leave with this id is registered.
    #[error("leave {0} not found")]
    NotFound(String),

    /// Start date after end date.
    #[error("leave range {start} > {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Shares a day with another live leave of the same supervisor.
    #[error("leave overlaps existing leave {existing}")]
    Overlap { existing: String },

    /// The status change is not allowed from the current status.
    #[error("leave {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: String,
        from: LeaveStatus,
        to: LeaveStatus,
    },
}

/// Per-status leave counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveStats {
    /// All leaves counted.
    pub total: usize,
    /// Awaiting a decision.
    pub pending: usize,
    /// Approved and blocking availability.
    pub approved: usize,
    /// Refused.
    pub rejected: usize,
    /// Withdrawn.
    pub cancelled: usize,
}

/// Store of leave requests with lifecycle transitions.
///
/// # Transitions
/// - `Pending → Approved | Rejected`
/// - `Pending | Approved → Cancelled`
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_proctor::models::{LeaveError, LeaveRegister};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
/// let mut register = LeaveRegister::new();
///
/// let sick = register.request("S1", day(1), day(5), "sick").unwrap();
/// register.approve(&sick).unwrap();
/// assert_eq!(
///     register.request("S1", day(4), day(6), "trip"),
///     Err(LeaveError::Overlap { existing: sick.clone() })
/// );
///
/// let trip = register.request("S1", day(10), day(11), "trip").unwrap();
/// register.reject(&trip, "exam week").unwrap();
///
/// let stats = register.stats(Some("S1"));
/// assert_eq!((stats.total, stats.approved, stats.rejected), (2, 1, 1));
/// assert_eq!(register.approved_days("S1"), 5);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveRegister {
    leaves: Vec<LeaveInterval>,
    next_id: u64,
}

impl LeaveRegister {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a pending leave request and returns its id.
    ///
    /// # Errors
    /// `InvalidRange` when `start > end`; `Overlap` when the supervisor
    /// already has a pending or approved leave sharing a day.
    pub fn request(
        &mut self,
        supervisor_id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        reason: impl Into<String>,
    ) -> Result<String, LeaveError> {
        let supervisor_id = supervisor_id.into();
        let range = DateRange::new(start, end);
        if range.is_empty() {
            return Err(LeaveError::InvalidRange { start, end });
        }
        if let Some(existing) = self.find_overlap(&supervisor_id, &range, None, LeaveStatus::is_live)
        {
            return Err(LeaveError::Overlap {
                existing: existing.id.clone(),
            });
        }

        self.next_id += 1;
        let id = format!("L{}", self.next_id);
        self.leaves.push(
            LeaveInterval::new(id.clone(), supervisor_id, start, end).with_reason(reason),
        );
        Ok(id)
    }

    /// Approves a pending leave.
    ///
    /// Re-checks overlap against approved leaves so that records inserted
    /// through [`LeaveRegister::insert`] cannot produce overlapping approvals.
    pub fn approve(&mut self, id: &str) -> Result<(), LeaveError> {
        let idx = self.index_of(id)?;
        self.check_transition(idx, LeaveStatus::Approved)?;
        let leave = &self.leaves[idx];
        if let Some(existing) = self.find_overlap(
            &leave.supervisor_id,
            &leave.range,
            Some(id),
            |s| s == LeaveStatus::Approved,
        ) {
            return Err(LeaveError::Overlap {
                existing: existing.id.clone(),
            });
        }
        self.leaves[idx].status = LeaveStatus::Approved;
        Ok(())
    }

    /// Rejects a pending leave with a reason.
    pub fn reject(&mut self, id: &str, reason: impl Into<String>) -> Result<(), LeaveError> {
        let idx = self.index_of(id)?;
        self.check_transition(idx, LeaveStatus::Rejected)?;
        let leave = &mut self.leaves[idx];
        leave.status = LeaveStatus::Rejected;
        leave.rejection_reason = Some(reason.into());
        Ok(())
    }

    /// Cancels a pending or approved leave.
    pub fn cancel(&mut self, id: &str) -> Result<(), LeaveError> {
        let idx = self.index_of(id)?;
        self.check_transition(idx, LeaveStatus::Cancelled)?;
        self.leaves[idx].status = LeaveStatus::Cancelled;
        Ok(())
    }

    /// Inserts an existing record verbatim (e.g. loaded from storage).
    pub fn insert(&mut self, leave: LeaveInterval) {
        self.leaves.push(leave);
    }

    /// Looks up a leave by id.
    pub fn get(&self, id: &str) -> Option<&LeaveInterval> {
        self.leaves.iter().find(|l| l.id == id)
    }

    /// All leaves of one supervisor.
    pub fn leaves_for(&self, supervisor_id: &str) -> Vec<&LeaveInterval> {
        self.leaves
            .iter()
            .filter(|l| l.supervisor_id == supervisor_id)
            .collect()
    }

    /// Immutable copy of every approved leave, for one scheduling run.
    pub fn approved_snapshot(&self) -> Vec<LeaveInterval> {
        self.leaves
            .iter()
            .filter(|l| l.is_approved())
            .cloned()
            .collect()
    }

    /// Total approved days for a supervisor.
    pub fn approved_days(&self, supervisor_id: &str) -> i64 {
        self.leaves
            .iter()
            .filter(|l| l.supervisor_id == supervisor_id && l.is_approved())
            .map(|l| l.range.days())
            .sum()
    }

    /// Counts by status, optionally for one supervisor.
    pub fn stats(&self, supervisor_id: Option<&str>) -> LeaveStats {
        let mut stats = LeaveStats::default();
        for leave in self
            .leaves
            .iter()
            .filter(|l| supervisor_id.map_or(true, |id| l.supervisor_id == id))
        {
            stats.total += 1;
            match leave.status {
                LeaveStatus::Pending => stats.pending += 1,
                LeaveStatus::Approved => stats.approved += 1,
                LeaveStatus::Rejected => stats.rejected += 1,
                LeaveStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the register is empty.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    fn index_of(&self, id: &str) -> Result<usize, LeaveError> {
        self.leaves
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| LeaveError::NotFound(id.to_string()))
    }

    fn check_transition(&self, idx: usize, to: LeaveStatus) -> Result<(), LeaveError> {
        let leave = &self.leaves[idx];
        let allowed = matches!(
            (leave.status, to),
            (LeaveStatus::Pending, LeaveStatus::Approved)
                | (LeaveStatus::Pending, LeaveStatus::Rejected)
                | (LeaveStatus::Pending, LeaveStatus::Cancelled)
                | (LeaveStatus::Approved, LeaveStatus::Cancelled)
        );
        if allowed {
            Ok(())
        } else {
            Err(LeaveError::InvalidTransition {
                id: leave.id.clone(),
                from: leave.status,
                to,
            })
        }
    }

    fn find_overlap(
        &self,
        supervisor_id: &str,
        range: &DateRange,
        skip_id: Option<&str>,
        status_filter: impl Fn(LeaveStatus) -> bool,
    ) -> Option<&LeaveInterval> {
        self.leaves.iter().find(|l| {
            l.supervisor_id == supervisor_id
                && Some(l.id.as_str()) != skip_id
                && status_filter(l.status)
                && l.range.overlaps(range)
        })
    }
}
