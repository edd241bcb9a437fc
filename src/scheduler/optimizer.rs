//! Balance optimizer: pairwise slot-list swaps across dates.
//!
//! # Algorithm
//!
//! For every pair of sessions (A, B) on different dates, tentatively swap
//! their entire slot lists. Keep the swap iff
//! `score(A') + score(B') < score(A) + score(B)`; otherwise discard it.
//! Passes repeat until one makes no swap or `max_passes` is reached.
//!
//! A swap is only attempted when both lists have the same length and
//! every moved supervisor is free on the new date (no approved leave, no
//! other session that day), so committed invariants survive.
//!
//! Swapping whole lists never changes a supervisor's total count, so the
//! scores here measure how assignments are spread over dates and rooms.
//!
//! # Score Convention
//! **Lower score = better.** Scores are non-negative.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::Span;

use crate::availability::AvailabilityResolver;
use crate::models::{AssignmentResult, ExamSession, SessionKey};

const EPSILON: f64 = 1e-9;

/// Where each supervisor works, derived from a result.
#[derive(Debug, Clone, Default)]
pub struct ScheduleView {
    by_supervisor: HashMap<String, Vec<(NaiveDate, String)>>,
}

impl ScheduleView {
    /// Indexes a result by supervisor.
    pub fn new(result: &AssignmentResult) -> Self {
        let mut by_supervisor: HashMap<String, Vec<(NaiveDate, String)>> = HashMap::new();
        for session in result.sessions() {
            for slot in &session.slots {
                by_supervisor
                    .entry(slot.clone())
                    .or_default()
                    .push((session.date(), session.room_id().to_string()));
            }
        }
        Self { by_supervisor }
    }

    /// (date, room id) pairs a supervisor works, chronologically.
    pub fn assignments(&self, supervisor_id: &str) -> &[(NaiveDate, String)] {
        self.by_supervisor
            .get(supervisor_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Quality score of one session within a schedule.
pub trait SessionScore: Send + Sync + Debug {
    /// Score name.
    fn name(&self) -> &'static str;

    /// Non-negative score; lower is better.
    fn score(&self, session: &ExamSession, view: &ScheduleView) -> f64;
}

/// Penalizes supervisors who also work the previous or next day.
#[derive(Debug, Clone, Copy)]
pub struct ConsecutiveDays;

impl SessionScore for ConsecutiveDays {
    fn name(&self) -> &'static str {
        "consecutive-days"
    }

    fn score(&self, session: &ExamSession, view: &ScheduleView) -> f64 {
        session
            .slots
            .iter()
            .map(|s| {
                view.assignments(s)
                    .iter()
                    .filter(|(date, _)| (*date - session.date()).num_days().abs() == 1)
                    .count()
            })
            .sum::<usize>() as f64
    }
}

/// Penalizes supervisors who work the same room on other dates.
#[derive(Debug, Clone, Copy)]
pub struct RoomRepetition;

impl SessionScore for RoomRepetition {
    fn name(&self) -> &'static str {
        "room-repetition"
    }

    fn score(&self, session: &ExamSession, view: &ScheduleView) -> f64 {
        session
            .slots
            .iter()
            .map(|s| {
                view.assignments(s)
                    .iter()
                    .filter(|(date, room)| *date != session.date() && room == session.room_id())
                    .count()
            })
            .sum::<usize>() as f64
    }
}

/// Optimizer limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Upper bound on full passes over all pairs (default 50).
    pub max_passes: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { max_passes: 50 }
    }
}

/// Outcome of an optimization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// Passes performed.
    pub passes: usize,
    /// Swaps kept.
    pub swaps: usize,
    /// Whole-schedule score before.
    pub score_before: f64,
    /// Whole-schedule score after.
    pub score_after: f64,
}

#[derive(Clone)]
struct WeightedScore {
    score: Arc<dyn SessionScore>,
    weight: f64,
}

/// Local-search refinement of a committed result.
///
/// # Example
/// ```
/// use u_proctor::scheduler::{BalanceOptimizer, RoomRepetition};
///
/// let optimizer = BalanceOptimizer::new()
///     .with_weighted_score(RoomRepetition, 0.5)
///     .with_max_passes(20);
/// ```
#[derive(Clone)]
pub struct BalanceOptimizer {
    scores: Vec<WeightedScore>,
    config: OptimizerConfig,
    span: Span,
}

impl BalanceOptimizer {
    /// Creates an optimizer scoring consecutive-day assignments.
    pub fn new() -> Self {
        Self::empty().with_score(ConsecutiveDays)
    }

    /// Creates an optimizer with no scores (every swap is declined).
    pub fn empty() -> Self {
        Self {
            scores: Vec::new(),
            config: OptimizerConfig::default(),
            span: Span::none(),
        }
    }

    /// Adds a score with weight 1.0.
    pub fn with_score<S: SessionScore + 'static>(self, score: S) -> Self {
        self.with_weighted_score(score, 1.0)
    }

    /// Adds a weighted score.
    pub fn with_weighted_score<S: SessionScore + 'static>(mut self, score: S, weight: f64) -> Self {
        self.scores.push(WeightedScore {
            score: Arc::new(score),
            weight,
        });
        self
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the pass bound.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.config.max_passes = max_passes;
        self
    }

    /// Sets the span events are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Weighted score of one session.
    pub fn session_score(&self, session: &ExamSession, view: &ScheduleView) -> f64 {
        self.scores
            .iter()
            .map(|ws| ws.score.score(session, view) * ws.weight)
            .sum()
    }

    /// Sum of session scores over a whole result.
    pub fn total_score(&self, result: &AssignmentResult) -> f64 {
        let view = ScheduleView::new(result);
        result
            .sessions()
            .iter()
            .map(|s| self.session_score(s, &view))
            .sum()
    }

    /// Improves `result` by pairwise swaps. Never fails.
    pub fn optimize(
        &self,
        result: AssignmentResult,
        availability: &AvailabilityResolver,
    ) -> (AssignmentResult, OptimizationReport) {
        let score_before = self.total_score(&result);
        let keys: Vec<SessionKey> = result.sessions().iter().map(|s| s.key.clone()).collect();
        let mut current = result;
        let mut report = OptimizationReport {
            score_before,
            ..Default::default()
        };

        while report.passes < self.config.max_passes {
            report.passes += 1;
            let mut swapped = 0;
            for (i, a) in keys.iter().enumerate() {
                for b in &keys[i + 1..] {
                    if a.date == b.date {
                        continue;
                    }
                    if let Some(next) = self.try_swap(&current, a, b, availability) {
                        tracing::debug!(parent: &self.span, a = %a, b = %b, "slot lists swapped");
                        current = next;
                        swapped += 1;
                    }
                }
            }
            report.swaps += swapped;
            if swapped == 0 {
                break;
            }
        }

        report.score_after = self.total_score(&current);
        tracing::info!(
            parent: &self.span,
            passes = report.passes,
            swaps = report.swaps,
            before = report.score_before,
            after = report.score_after,
            "balance optimization finished"
        );
        (current, report)
    }

    /// Returns the swapped result if the swap is feasible and improving.
    fn try_swap(
        &self,
        current: &AssignmentResult,
        a_key: &SessionKey,
        b_key: &SessionKey,
        availability: &AvailabilityResolver,
    ) -> Option<AssignmentResult> {
        let a = current.session(a_key)?;
        let b = current.session(b_key)?;
        if a.slots.is_empty() || a.slots.len() != b.slots.len() || a.slots == b.slots {
            return None;
        }
        if !can_move(current, &a.slots, b_key, availability)
            || !can_move(current, &b.slots, a_key, availability)
        {
            return None;
        }

        let view = ScheduleView::new(current);
        let before = self.session_score(a, &view) + self.session_score(b, &view);

        let mut next = current.clone();
        next.replace_slots(a_key, b.slots.clone());
        next.replace_slots(b_key, a.slots.clone());
        let view = ScheduleView::new(&next);
        let after = self.session_score(next.session(a_key)?, &view)
            + self.session_score(next.session(b_key)?, &view);

        (after + EPSILON < before).then_some(next)
    }
}

/// Whether every supervisor in `movers` may work `target` instead.
fn can_move(
    current: &AssignmentResult,
    movers: &[String],
    target: &SessionKey,
    availability: &AvailabilityResolver,
) -> bool {
    movers.iter().all(|s| {
        availability.is_available(s, target.date)
            && current.booking_on(s, target.date, Some(target)).is_none()
    })
}

impl Default for BalanceOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for BalanceOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceOptimizer")
            .field(
                "scores",
                &self
                    .scores
                    .iter()
                    .map(|ws| format!("{}(w={})", ws.score.name(), ws.weight))
                    .collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}
