//! Eligible-pool selection.
//!
//! # Algorithm
//!
//! 1. Keep supervisors available on the session date and not excluded.
//! 2. Rank by `(count, -days_since_last)`: least loaded first, then the
//!    one idle longest. Never-assigned counts as idle forever. Remaining
//!    ties go to the more experienced supervisor, then to supervisor id.
//! 3. Fairness band: keep candidates with `count <= min_count + slack`.
//! 4. Window: the first `max(min_window, band / divisor)` of the band.
//! 5. Pick uniformly at random from the window.
//!
//! The random pick keeps equally loaded supervisors from being favored in
//! a fixed order across repeated runs; a seeded RNG makes it replayable.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::availability::AvailabilityResolver;
use crate::error::PoolError;
use crate::models::{SessionKey, Supervisor};
use crate::workload::{WorkloadLedger, WorkloadRecord};

/// Fairness band and randomization window parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Band width above the minimum count (default 1).
    pub fairness_slack: u32,
    /// Smallest randomization window (default 3).
    pub min_window: usize,
    /// Window is `band / divisor` when that exceeds `min_window` (default 3).
    pub window_divisor: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            fairness_slack: 1,
            min_window: 3,
            window_divisor: 3,
        }
    }
}

impl SelectionPolicy {
    /// Window size for a band of `band_len` candidates.
    pub fn window_len(&self, band_len: usize) -> usize {
        let scaled = band_len / self.window_divisor.max(1);
        self.min_window.max(scaled).min(band_len)
    }
}

/// A ranked candidate.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The roster entry.
    pub supervisor: &'a Supervisor,
    /// Workload at ranking time.
    pub record: WorkloadRecord,
    /// Days since last assignment; `None` = never assigned.
    pub idle_days: Option<i64>,
}

impl Candidate<'_> {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        let idle = |c: &Self| c.idle_days.unwrap_or(i64::MAX);
        self.record
            .count
            .cmp(&other.record.count)
            .then_with(|| idle(other).cmp(&idle(self)))
            .then_with(|| other.supervisor.tier.cmp(&self.supervisor.tier))
            .then_with(|| self.supervisor.id.cmp(&other.supervisor.id))
    }
}

/// Produces ranked candidate lists for exam sessions.
#[derive(Debug, Clone)]
pub struct EligiblePoolSelector<'a> {
    roster: &'a [Supervisor],
    availability: &'a AvailabilityResolver,
    policy: SelectionPolicy,
}

impl<'a> EligiblePoolSelector<'a> {
    /// Creates a selector over a roster snapshot.
    pub fn new(roster: &'a [Supervisor], availability: &'a AvailabilityResolver) -> Self {
        Self {
            roster,
            availability,
            policy: SelectionPolicy::default(),
        }
    }

    /// Sets the band/window policy.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Supervisors available on the session date and not in `exclude`.
    pub fn eligible(&self, session: &SessionKey, exclude: &HashSet<String>) -> Vec<&'a Supervisor> {
        self.roster
            .iter()
            .filter(|s| !exclude.contains(&s.id))
            .filter(|s| self.availability.is_available(&s.id, session.date))
            .collect()
    }

    /// Eligible supervisors in rank order (steps 1-2).
    pub fn ranked(
        &self,
        session: &SessionKey,
        exclude: &HashSet<String>,
        ledger: &WorkloadLedger,
    ) -> Vec<Candidate<'a>> {
        let mut candidates: Vec<Candidate<'a>> = self
            .eligible(session, exclude)
            .into_iter()
            .map(|supervisor| {
                let record = ledger.record_of(&supervisor.id);
                Candidate {
                    supervisor,
                    record,
                    idle_days: record.days_since(session.date),
                }
            })
            .collect();
        candidates.sort_by(Candidate::rank_cmp);
        candidates
    }

    /// The randomization window for a session (steps 1-4).
    ///
    /// # Errors
    /// `NoEligibleSupervisor` if nobody passes step 1.
    pub fn pool(
        &self,
        session: &SessionKey,
        exclude: &HashSet<String>,
        ledger: &WorkloadLedger,
    ) -> Result<Vec<Candidate<'a>>, PoolError> {
        let mut ranked = self.ranked(session, exclude, ledger);
        let Some(first) = ranked.first() else {
            return Err(PoolError::NoEligibleSupervisor(session.clone()));
        };

        let ceiling = first.record.count.saturating_add(self.policy.fairness_slack);
        let band_len = ranked
            .iter()
            .take_while(|c| c.record.count <= ceiling)
            .count();
        ranked.truncate(self.policy.window_len(band_len));
        Ok(ranked)
    }

    /// Picks one supervisor for a session (steps 1-5).
    pub fn select<R: Rng + ?Sized>(
        &self,
        session: &SessionKey,
        exclude: &HashSet<String>,
        ledger: &WorkloadLedger,
        rng: &mut R,
    ) -> Result<&'a Supervisor, PoolError> {
        let window = self.pool(session, exclude, ledger)?;
        window
            .choose(rng)
            .map(|c| c.supervisor)
            .ok_or_else(|| PoolError::NoEligibleSupervisor(session.clone()))
    }
}
