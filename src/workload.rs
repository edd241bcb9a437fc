//! Workload ledger.
//!
//! Tracks, per supervisor, how many sessions they have supervised and
//! when they last did. Seeded from historical counts so repeated runs do
//! not favor newly added supervisors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Supervisor;

/// Workload of a single supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    /// Sessions assigned so far (history plus this run).
    pub count: u32,
    /// Date of the most recent assignment.
    pub last_assigned: Option<NaiveDate>,
}

impl WorkloadRecord {
    /// Days between the last assignment and `date`.
    ///
    /// `None` means never assigned, which ranks as idle the longest.
    pub fn days_since(&self, date: NaiveDate) -> Option<i64> {
        self.last_assigned.map(|last| (date - last).num_days())
    }
}

/// Per-supervisor workload for one scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkloadLedger {
    records: HashMap<String, WorkloadRecord>,
}

impl WorkloadLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a ledger from the roster's historical counts and dates.
    pub fn seeded(roster: &[Supervisor]) -> Self {
        let records = roster
            .iter()
            .map(|s| {
                (
                    s.id.clone(),
                    WorkloadRecord {
                        count: s.historical_count,
                        last_assigned: s.last_assigned,
                    },
                )
            })
            .collect();
        Self { records }
    }

    /// Sessions assigned to a supervisor (0 if unknown).
    pub fn count(&self, supervisor_id: &str) -> u32 {
        self.records.get(supervisor_id).map_or(0, |r| r.count)
    }

    /// Date of a supervisor's most recent assignment.
    pub fn last_assigned(&self, supervisor_id: &str) -> Option<NaiveDate> {
        self.records.get(supervisor_id).and_then(|r| r.last_assigned)
    }

    /// Full record for a supervisor.
    pub fn record_of(&self, supervisor_id: &str) -> WorkloadRecord {
        self.records.get(supervisor_id).copied().unwrap_or_default()
    }

    /// Records an assignment on `date`.
    pub fn record(&mut self, supervisor_id: &str, date: NaiveDate) {
        let rec = self.records.entry(supervisor_id.to_string()).or_default();
        rec.count += 1;
        rec.last_assigned = Some(date);
    }

    /// Iterates over all records.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WorkloadRecord)> {
        self.records.iter().map(|(id, r)| (id.as_str(), r))
    }

    /// Number of tracked supervisors.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_seeded_from_history() {
        let roster = vec![
            Supervisor::new("S1").with_history(4).with_last_assigned(d(1)),
            Supervisor::new("S2"),
        ];
        let ledger = WorkloadLedger::seeded(&roster);
        assert_eq!(ledger.count("S1"), 4);
        assert_eq!(ledger.last_assigned("S1"), Some(d(1)));
        assert_eq!(ledger.count("S2"), 0);
        assert_eq!(ledger.last_assigned("S2"), None);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_record_increments() {
        let mut ledger = WorkloadLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.count("S1"), 0);

        ledger.record("S1", d(3));
        ledger.record("S1", d(5));
        assert_eq!(ledger.count("S1"), 2);
        assert_eq!(ledger.last_assigned("S1"), Some(d(5)));
    }

    #[test]
    fn test_days_since() {
        let mut ledger = WorkloadLedger::new();
        assert_eq!(ledger.record_of("S1").days_since(d(10)), None);
        ledger.record("S1", d(3));
        assert_eq!(ledger.record_of("S1").days_since(d(10)), Some(7));
    }
}
