//! Supervisor (proctor) model.
//!
//! Supervisors are the people drawn into exam sessions. Each carries an
//! experience tier, a specialization tag, and the historical workload
//! that seeds the fairness ledger at the start of a run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A person eligible to proctor exam sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supervisor {
    /// Unique supervisor identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Experience classification (ordered).
    pub tier: ExperienceTier,
    /// Subject specialization (free-form tag).
    pub specialization: String,
    /// Sessions supervised in earlier runs.
    pub historical_count: u32,
    /// Date of the most recent earlier assignment, if known.
    pub last_assigned: Option<NaiveDate>,
    /// Domain-specific metadata.
    pub attributes: HashMap<String, String>,
}

/// Experience tier, ordered from least to most experienced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ExperienceTier {
    /// New to supervising.
    Novice,
    /// Some prior supervision.
    #[default]
    Intermediate,
    /// Long-standing supervisor.
    Expert,
}

impl Supervisor {
    /// Creates a supervisor with no history.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            tier: ExperienceTier::default(),
            specialization: String::new(),
            historical_count: 0,
            last_assigned: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the experience tier.
    pub fn with_tier(mut self, tier: ExperienceTier) -> Self {
        self.tier = tier;
        self
    }

    /// Sets the specialization tag.
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = specialization.into();
        self
    }

    /// Sets the historical assignment count.
    pub fn with_history(mut self, count: u32) -> Self {
        self.historical_count = count;
        self
    }

    /// Sets the date of the last earlier assignment.
    pub fn with_last_assigned(mut self, date: NaiveDate) -> Self {
        self.last_assigned = Some(date);
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Display label: the name, or the id when no name is set.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supervisor_builder() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let s = Supervisor::new("S1")
            .with_name("Amal")
            .with_tier(ExperienceTier::Expert)
            .with_specialization("physics")
            .with_history(7)
            .with_last_assigned(d)
            .with_attribute("phone", "555-0100");

        assert_eq!(s.id, "S1");
        assert_eq!(s.label(), "Amal");
        assert_eq!(s.tier, ExperienceTier::Expert);
        assert_eq!(s.specialization, "physics");
        assert_eq!(s.historical_count, 7);
        assert_eq!(s.last_assigned, Some(d));
        assert_eq!(s.attributes.get("phone"), Some(&"555-0100".to_string()));
    }

    #[test]
    fn test_label_falls_back_to_id() {
        assert_eq!(Supervisor::new("S9").label(), "S9");
    }

    #[test]
    fn test_tier_ordering() {
        assert!(ExperienceTier::Novice < ExperienceTier::Intermediate);
        assert!(ExperienceTier::Intermediate < ExperienceTier::Expert);
        assert_eq!(ExperienceTier::default(), ExperienceTier::Intermediate);
    }
}
