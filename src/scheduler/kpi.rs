//! Workload and spread metrics.
//!
//! Computes fairness indicators from a committed result and the run's
//! workload ledger.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Spread | max(count) - min(count) over the considered supervisors |
//! | Mean / Variance | Population statistics of total counts |
//! | Consecutive days | Pairs of a supervisor's assignments one day apart |
//! | Per-date load | Sessions and distinct supervisors on each date |
//! | Per-room coverage | Distinct supervisors who worked each room |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::AssignmentResult;
use crate::workload::WorkloadLedger;

/// Fairness indicators for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadKpi {
    /// Total count (history plus run) per considered supervisor.
    pub counts: BTreeMap<String, u32>,
    /// Assignments made in this run per considered supervisor.
    pub run_counts: BTreeMap<String, usize>,
    /// Smallest total count.
    pub min_count: u32,
    /// Largest total count.
    pub max_count: u32,
    /// Mean total count.
    pub mean_count: f64,
    /// Population variance of total counts.
    pub variance: f64,
    /// Assignments one calendar day after another by the same supervisor.
    pub consecutive_days: usize,
    /// Exam sessions per date.
    pub sessions_per_date: BTreeMap<NaiveDate, usize>,
    /// Distinct supervisors per date.
    pub supervisors_per_date: BTreeMap<NaiveDate, usize>,
    /// Distinct supervisors per room.
    pub supervisors_per_room: BTreeMap<String, usize>,
}

impl WorkloadKpi {
    /// Computes KPIs over the given supervisors.
    ///
    /// Pass the run's eligible set to check the fairness bound only for
    /// supervisors who could actually be drawn.
    pub fn calculate<'a>(
        result: &AssignmentResult,
        ledger: &WorkloadLedger,
        supervisors: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let run_totals = result.supervisor_counts();
        let mut counts = BTreeMap::new();
        let mut run_counts = BTreeMap::new();
        for id in supervisors {
            counts.insert(id.to_string(), ledger.count(id));
            run_counts.insert(id.to_string(), run_totals.get(id).copied().unwrap_or(0));
        }

        let min_count = counts.values().copied().min().unwrap_or(0);
        let max_count = counts.values().copied().max().unwrap_or(0);
        let (mean_count, variance) = if counts.is_empty() {
            (0.0, 0.0)
        } else {
            let n = counts.len() as f64;
            let mean = counts.values().map(|&c| f64::from(c)).sum::<f64>() / n;
            let var = counts
                .values()
                .map(|&c| (f64::from(c) - mean).powi(2))
                .sum::<f64>()
                / n;
            (mean, var)
        };

        let consecutive_days = result
            .dates_by_supervisor()
            .values()
            .map(|dates| {
                dates
                    .windows(2)
                    .filter(|w| (w[1] - w[0]).num_days() == 1)
                    .count()
            })
            .sum();

        let mut sessions_per_date = BTreeMap::new();
        let mut per_date: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();
        let mut per_room: HashMap<&str, HashSet<&str>> = HashMap::new();
        for session in result.sessions() {
            *sessions_per_date.entry(session.date()).or_insert(0) += 1;
            for slot in &session.slots {
                per_date.entry(session.date()).or_default().insert(slot);
                per_room.entry(session.room_id()).or_default().insert(slot);
            }
        }

        Self {
            counts,
            run_counts,
            min_count,
            max_count,
            mean_count,
            variance,
            consecutive_days,
            sessions_per_date,
            supervisors_per_date: per_date.into_iter().map(|(d, s)| (d, s.len())).collect(),
            supervisors_per_room: per_room
                .into_iter()
                .map(|(r, s)| (r.to_string(), s.len()))
                .collect(),
        }
    }

    /// max(count) - min(count).
    pub fn spread(&self) -> u32 {
        self.max_count - self.min_count
    }

    /// Whether the spread stays within `bound`.
    pub fn within_bound(&self, bound: u32) -> bool {
        self.spread() <= bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExamSession, Supervisor};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn session(day: u32, room: &str, slots: &[&str]) -> ExamSession {
        ExamSession::new(d(day), room).with_slots(slots.iter().map(|s| s.to_string()).collect())
    }

    fn sample() -> (AssignmentResult, WorkloadLedger) {
        let result = AssignmentResult::from_sessions(vec![
            session(1, "R1", &["S1", "S2"]),
            session(2, "R1", &["S1", "S3"]),
            session(2, "R2", &["S2", "S4"]),
        ]);
        let roster: Vec<Supervisor> = ["S1", "S2", "S3", "S4"]
            .iter()
            .map(|id| Supervisor::new(*id))
            .collect();
        let mut ledger = WorkloadLedger::seeded(&roster);
        for s in result.sessions() {
            for slot in &s.slots {
                ledger.record(slot, s.date());
            }
        }
        (result, ledger)
    }

    #[test]
    fn test_kpi_basic() {
        let (result, ledger) = sample();
        let kpi = WorkloadKpi::calculate(&result, &ledger, ["S1", "S2", "S3", "S4"]);

        assert_eq!(kpi.counts["S1"], 2);
        assert_eq!(kpi.counts["S4"], 1);
        assert_eq!(kpi.min_count, 1);
        assert_eq!(kpi.max_count, 2);
        assert_eq!(kpi.spread(), 1);
        assert!(kpi.within_bound(1));
        assert!(!kpi.within_bound(0));
        assert!((kpi.mean_count - 1.5).abs() < 1e-10);
        assert!((kpi.variance - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_coverage() {
        let (result, ledger) = sample();
        let kpi = WorkloadKpi::calculate(&result, &ledger, ["S1"]);

        // S1 and S2 both work day 1 and day 2.
        assert_eq!(kpi.consecutive_days, 2);
        assert_eq!(kpi.sessions_per_date[&d(1)], 1);
        assert_eq!(kpi.sessions_per_date[&d(2)], 2);
        assert_eq!(kpi.supervisors_per_date[&d(1)], 2);
        assert_eq!(kpi.supervisors_per_date[&d(2)], 4);
        assert_eq!(kpi.supervisors_per_room["R1"], 3);
        assert_eq!(kpi.supervisors_per_room["R2"], 2);
    }

    #[test]
    fn test_kpi_includes_idle_supervisors() {
        let (result, ledger) = sample();
        let kpi = WorkloadKpi::calculate(&result, &ledger, ["S1", "S9"]);
        assert_eq!(kpi.counts["S9"], 0);
        assert_eq!(kpi.run_counts["S9"], 0);
        assert_eq!(kpi.spread(), 2);
    }

    #[test]
    fn test_kpi_history_counts() {
        let (result, _) = sample();
        let roster = vec![Supervisor::new("S1").with_history(5), Supervisor::new("S4")];
        let mut ledger = WorkloadLedger::seeded(&roster);
        ledger.record("S1", d(1));
        ledger.record("S4", d(2));

        let kpi = WorkloadKpi::calculate(&result, &ledger, ["S1", "S4"]);
        assert_eq!(kpi.counts["S1"], 6);
        assert_eq!(kpi.run_counts["S1"], 2);
        assert_eq!(kpi.spread(), 5);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = WorkloadKpi::calculate(&AssignmentResult::default(), &WorkloadLedger::new(), []);
        assert_eq!(kpi.spread(), 0);
        assert!((kpi.mean_count - 0.0).abs() < 1e-10);
        assert_eq!(kpi.consecutive_days, 0);
        assert!(kpi.supervisors_per_date.is_empty());
    }
}
