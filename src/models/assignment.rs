//! Assignment result model.
//!
//! The output of a successful run: every exam session with its filled
//! slot list. Sessions are kept sorted by key so lookups are binary
//! searches and iteration is chronological.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{ExamSession, SessionKey};

/// Committed assignment of supervisors to exam sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    sessions: Vec<ExamSession>,
}

impl AssignmentResult {
    /// Builds a result from sessions in any order.
    pub fn from_sessions(mut sessions: Vec<ExamSession>) -> Self {
        sessions.sort_by(|a, b| a.key.cmp(&b.key));
        Self { sessions }
    }

    /// All sessions, sorted by (date, room id).
    pub fn sessions(&self) -> &[ExamSession] {
        &self.sessions
    }

    /// Looks up a session.
    pub fn session(&self, key: &SessionKey) -> Option<&ExamSession> {
        self.position(key).map(|i| &self.sessions[i])
    }

    /// Slot list of a session.
    pub fn slots(&self, key: &SessionKey) -> Option<&[String]> {
        self.session(key).map(|s| s.slots.as_slice())
    }

    /// Replaces a session's slot list with a new value.
    ///
    /// Returns `false` if the session is unknown.
    pub fn replace_slots(&mut self, key: &SessionKey, slots: Vec<String>) -> bool {
        match self.position(key) {
            Some(i) => {
                self.sessions[i] = self.sessions[i].with_slots(slots);
                true
            }
            None => false,
        }
    }

    /// Sessions held on a date.
    pub fn sessions_on(&self, date: NaiveDate) -> impl Iterator<Item = &ExamSession> {
        self.sessions.iter().filter(move |s| s.date() == date)
    }

    /// Sessions a supervisor works, chronologically.
    pub fn sessions_for(&self, supervisor_id: &str) -> Vec<&ExamSession> {
        self.sessions
            .iter()
            .filter(|s| s.has_supervisor(supervisor_id))
            .collect()
    }

    /// The session a supervisor works on `date`, if any, ignoring `except`.
    pub fn booking_on(
        &self,
        supervisor_id: &str,
        date: NaiveDate,
        except: Option<&SessionKey>,
    ) -> Option<&SessionKey> {
        self.sessions_on(date)
            .filter(|s| Some(&s.key) != except)
            .find(|s| s.has_supervisor(supervisor_id))
            .map(|s| &s.key)
    }

    /// Assignments per supervisor in this result.
    pub fn supervisor_counts(&self) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for slot in self.sessions.iter().flat_map(|s| &s.slots) {
            *counts.entry(slot.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Dates each supervisor works, sorted.
    pub fn dates_by_supervisor(&self) -> BTreeMap<String, Vec<NaiveDate>> {
        let mut dates: BTreeMap<String, Vec<NaiveDate>> = BTreeMap::new();
        // Sessions are sorted, so each list is already chronological.
        for session in &self.sessions {
            for slot in &session.slots {
                dates.entry(slot.clone()).or_default().push(session.date());
            }
        }
        dates
    }

    /// Total filled slots.
    pub fn assignment_count(&self) -> usize {
        self.sessions.iter().map(|s| s.slots.len()).sum()
    }

    /// Number of sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn position(&self, key: &SessionKey) -> Option<usize> {
        self.sessions.binary_search_by(|s| s.key.cmp(key)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn session(day: u32, room: &str, slots: &[&str]) -> ExamSession {
        ExamSession::new(d(day), room).with_slots(slots.iter().map(|s| s.to_string()).collect())
    }

    fn sample() -> AssignmentResult {
        AssignmentResult::from_sessions(vec![
            session(4, "R1", &["S1", "S3"]),
            session(3, "R2", &["S3", "S4"]),
            session(3, "R1", &["S1", "S2"]),
        ])
    }

    #[test]
    fn test_sorted_by_key() {
        let r = sample();
        let keys: Vec<String> = r.sessions().iter().map(|s| s.key.to_string()).collect();
        assert_eq!(keys, ["2024-06-03/R1", "2024-06-03/R2", "2024-06-04/R1"]);
    }

    #[test]
    fn test_lookup_and_replace() {
        let mut r = sample();
        let key = SessionKey::new(d(4), "R1");
        assert_eq!(r.slots(&key).unwrap(), ["S1", "S3"]);

        assert!(r.replace_slots(&key, vec!["S2".into(), "S4".into()]));
        assert_eq!(r.slots(&key).unwrap(), ["S2", "S4"]);
        assert!(!r.replace_slots(&SessionKey::new(d(9), "R1"), vec![]));
    }

    #[test]
    fn test_booking_on() {
        let r = sample();
        let r1 = SessionKey::new(d(3), "R1");
        let r2 = SessionKey::new(d(3), "R2");
        assert_eq!(r.booking_on("S3", d(3), None), Some(&r2));
        assert_eq!(r.booking_on("S3", d(3), Some(&r2)), None);
        assert_eq!(r.booking_on("S1", d(3), Some(&r2)), Some(&r1));
        assert_eq!(r.booking_on("S4", d(4), None), None);
    }

    #[test]
    fn test_counts_and_dates() {
        let r = sample();
        let counts = r.supervisor_counts();
        assert_eq!(counts["S1"], 2);
        assert_eq!(counts["S3"], 2);
        assert_eq!(counts["S4"], 1);
        assert_eq!(r.assignment_count(), 6);
        assert_eq!(r.session_count(), 3);

        let dates = r.dates_by_supervisor();
        assert_eq!(dates["S1"], [d(3), d(4)]);
        assert_eq!(r.sessions_for("S3").len(), 2);
    }
}
