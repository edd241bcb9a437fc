//! Assignment engine.
//!
//! # Algorithm
//!
//! 1. Check the roster is at least as large as the biggest room requires.
//! 2. Order sessions by date, then room name.
//! 3. Per date, fail fast if fewer supervisors are free than the date's
//!    sessions need in total.
//! 4. Per session, fill slots one by one: draw from the eligible pool,
//!    run the conflict guard, commit, and record the workload.
//! 5. Optionally run the balance optimizer on the committed result.
//!
//! # State Machine
//! `Idle → Running → Committed | Failed`. Any error aborts the whole run;
//! nothing partial is ever returned.
//!
//! # Complexity
//! O(s * r * log r) where s = total slots, r = roster size.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio_util::sync::CancellationToken;
use tracing::Span;

use super::optimizer::{BalanceOptimizer, OptimizationReport};
use crate::availability::AvailabilityResolver;
use crate::error::{PoolError, Result, ScheduleError};
use crate::guard::ConflictGuard;
use crate::models::{AssignmentResult, ExamSession, LeaveInterval, Room, Supervisor};
use crate::pool::{EligiblePoolSelector, SelectionPolicy};
use crate::validation::{validate_input, ValidationResult};
use crate::workload::WorkloadLedger;

/// Default lower bound on the roster when any room needs supervisors.
pub const MIN_ROSTER: usize = 2;

/// Input snapshot for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Roster with historical workload.
    pub supervisors: Vec<Supervisor>,
    /// Rooms with their required supervisor counts.
    pub rooms: Vec<Room>,
    /// Exam calendar placeholders (slots are ignored).
    pub sessions: Vec<ExamSession>,
    /// Leave records; only approved ones matter.
    pub leaves: Vec<LeaveInterval>,
}

impl ScheduleRequest {
    /// Creates a request with no leaves.
    pub fn new(supervisors: Vec<Supervisor>, rooms: Vec<Room>, sessions: Vec<ExamSession>) -> Self {
        Self {
            supervisors,
            rooms,
            sessions,
            leaves: Vec::new(),
        }
    }

    /// Sets the leave records.
    pub fn with_leaves(mut self, leaves: Vec<LeaveInterval>) -> Self {
        self.leaves = leaves;
        self
    }

    /// Adds a session for every room on `date`.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        let sessions: Vec<ExamSession> = self
            .rooms
            .iter()
            .map(|r| ExamSession::new(date, r.id.clone()))
            .collect();
        self.sessions.extend(sessions);
        self
    }

    /// Runs every structural check and reports all problems at once.
    pub fn validate(&self) -> ValidationResult {
        validate_input(&self.supervisors, &self.rooms, &self.sessions, &self.leaves)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// RNG seed. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Minimum roster size. `None` = the largest room requirement, at
    /// least [`MIN_ROSTER`] when any room needs supervisors.
    pub minimum_roster: Option<usize>,
    /// Fairness band and window policy.
    pub selection: SelectionPolicy,
    /// Skip the per-date capacity check and fail at the first unfillable slot.
    pub skip_capacity_check: bool,
}

impl EngineConfig {
    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the minimum roster size.
    pub fn with_minimum_roster(mut self, minimum: usize) -> Self {
        self.minimum_roster = Some(minimum);
        self
    }

    /// Sets the selection policy.
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Disables the per-date capacity check.
    pub fn without_capacity_check(mut self) -> Self {
        self.skip_capacity_check = true;
        self
    }
}

/// Lifecycle of the engine's latest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No run started yet.
    #[default]
    Idle,
    /// A run is in progress.
    Running,
    /// The latest run produced a complete result.
    Committed,
    /// The latest run aborted.
    Failed,
}

/// Output of a committed run.
#[derive(Debug, Clone)]
pub struct AssignmentRun {
    /// Every session with its full slot list.
    pub result: AssignmentResult,
    /// Workload after the run (history plus new assignments).
    pub workload: WorkloadLedger,
    /// Supervisors available on at least one session date.
    pub eligible: BTreeSet<String>,
    /// Present when an optimizer was attached.
    pub optimization: Option<OptimizationReport>,
}

/// Scheduling driver.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_proctor::models::{Room, Supervisor};
/// use u_proctor::scheduler::{AssignmentEngine, EngineConfig, ScheduleRequest};
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let request = ScheduleRequest::new(
///     vec![Supervisor::new("S1"), Supervisor::new("S2")],
///     vec![Room::new("R1")],
///     vec![],
/// )
/// .with_date(date);
///
/// let mut engine = AssignmentEngine::new().with_config(EngineConfig::default().with_seed(1));
/// let run = engine.run(&request).unwrap();
/// assert_eq!(run.result.assignment_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    config: EngineConfig,
    optimizer: Option<BalanceOptimizer>,
    span: Span,
    state: EngineState,
}

impl AssignmentEngine {
    /// Creates an engine with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            optimizer: None,
            span: Span::none(),
            state: EngineState::Idle,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs `optimizer` on every committed result.
    pub fn with_optimizer(mut self, optimizer: BalanceOptimizer) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Sets the span events are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// State after the latest run.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assigns supervisors to every session of `request`.
    ///
    /// # Errors
    /// Any `ScheduleError` except `Cancelled`; the run is then `Failed`.
    pub fn run(&mut self, request: &ScheduleRequest) -> Result<AssignmentRun> {
        self.run_with_cancel(request, &CancellationToken::new())
    }

    /// Like [`run`](Self::run), checking `cancel` before every session.
    pub fn run_with_cancel(
        &mut self,
        request: &ScheduleRequest,
        cancel: &CancellationToken,
    ) -> Result<AssignmentRun> {
        self.state = EngineState::Running;
        tracing::info!(
            parent: &self.span,
            supervisors = request.supervisors.len(),
            rooms = request.rooms.len(),
            sessions = request.sessions.len(),
            "assignment run started"
        );

        match self.execute(request, cancel) {
            Ok(run) => {
                self.state = EngineState::Committed;
                tracing::info!(
                    parent: &self.span,
                    assignments = run.result.assignment_count(),
                    "assignment run committed"
                );
                Ok(run)
            }
            Err(err) => {
                self.state = EngineState::Failed;
                tracing::warn!(parent: &self.span, error = %err, "assignment run failed");
                Err(err)
            }
        }
    }

    fn execute(&self, request: &ScheduleRequest, cancel: &CancellationToken) -> Result<AssignmentRun> {
        let rooms: HashMap<&str, &Room> = request.rooms.iter().map(|r| (r.id.as_str(), r)).collect();
        let order = order_sessions(&request.sessions, &rooms)?;

        let minimum = self.config.minimum_roster.unwrap_or_else(|| {
            match request.rooms.iter().map(|r| r.required_supervisors).max() {
                None | Some(0) => 0,
                Some(largest) => largest.max(MIN_ROSTER),
            }
        });
        if request.supervisors.len() < minimum {
            return Err(ScheduleError::InsufficientRoster {
                available: request.supervisors.len(),
                minimum,
            });
        }

        let availability = AvailabilityResolver::new(&request.leaves)?;
        let selector = EligiblePoolSelector::new(&request.supervisors, &availability)
            .with_policy(self.config.selection.clone());
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut ledger = WorkloadLedger::seeded(&request.supervisors);
        let mut guard = ConflictGuard::new();
        let mut eligible = BTreeSet::new();
        let mut committed: Vec<ExamSession> = Vec::with_capacity(order.len());
        let mut checked_date: Option<NaiveDate> = None;

        for (idx, &(session, room)) in order.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(ScheduleError::Cancelled);
            }

            let date = session.key.date;
            if checked_date != Some(date) {
                checked_date = Some(date);
                let free = selector.eligible(&session.key, &HashSet::new());
                eligible.extend(free.iter().map(|s| s.id.clone()));
                if !self.config.skip_capacity_check {
                    check_capacity(&order[idx..], free.len())?;
                }
            }

            let filled = self.fill_session(session, room, &selector, &mut guard, &mut ledger, &mut rng)?;
            committed.push(filled);
        }

        let mut result = AssignmentResult::from_sessions(committed);
        let optimization = self.optimizer.as_ref().map(|optimizer| {
            let (optimized, report) = optimizer.optimize(result.clone(), &availability);
            result = optimized;
            report
        });

        // Swaps can move last-assignment dates, so rebuild from the final result.
        let mut workload = WorkloadLedger::seeded(&request.supervisors);
        for session in result.sessions() {
            for slot in &session.slots {
                workload.record(slot, session.date());
            }
        }

        Ok(AssignmentRun {
            result,
            workload,
            eligible,
            optimization,
        })
    }

    fn fill_session(
        &self,
        placeholder: &ExamSession,
        room: &Room,
        selector: &EligiblePoolSelector<'_>,
        guard: &mut ConflictGuard,
        ledger: &mut WorkloadLedger,
        rng: &mut StdRng,
    ) -> Result<ExamSession> {
        let key = &placeholder.key;
        let required = room.required_supervisors;
        let mut session = ExamSession::new(key.date, key.room_id.clone());
        if required == 0 {
            return Ok(session);
        }

        let mut exclude: HashSet<String> = guard.booked_on(key.date).map(str::to_string).collect();
        let available = selector.eligible(key, &exclude).len();

        while session.slots.len() < required {
            let candidate = match selector.select(key, &exclude, ledger, rng) {
                Ok(c) => c,
                Err(PoolError::NoEligibleSupervisor(_)) => {
                    return Err(ScheduleError::InsufficientSupervisors {
                        session: key.clone(),
                        available,
                        required,
                    });
                }
            };

            if let Err(conflict) = guard.check(&session, required, &candidate.id) {
                if !conflict.is_repairable() {
                    return Err(ScheduleError::InvariantViolation {
                        session: key.clone(),
                        conflict,
                    });
                }
                tracing::warn!(
                    parent: &self.span,
                    session = %key,
                    supervisor = %candidate.id,
                    %conflict,
                    "conflict guard rejected candidate"
                );
                exclude.insert(candidate.id.clone());
                continue;
            }

            session.slots.push(candidate.id.clone());
            exclude.insert(candidate.id.clone());
            guard.book(key, &candidate.id);
            ledger.record(&candidate.id, key.date);
            tracing::debug!(
                parent: &self.span,
                session = %key,
                supervisor = %candidate.id,
                count = ledger.count(&candidate.id),
                "slot committed"
            );
        }

        Ok(session)
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorts sessions by (date, room name, room id), resolving their rooms.
fn order_sessions<'a>(
    sessions: &'a [ExamSession],
    rooms: &HashMap<&str, &'a Room>,
) -> Result<Vec<(&'a ExamSession, &'a Room)>> {
    let mut seen = HashSet::new();
    let mut order = Vec::with_capacity(sessions.len());
    for session in sessions {
        if !seen.insert(&session.key) {
            return Err(ScheduleError::DuplicateSession {
                session: session.key.clone(),
            });
        }
        let room = rooms
            .get(session.room_id())
            .copied()
            .ok_or_else(|| ScheduleError::UnknownRoom {
                session: session.key.clone(),
            })?;
        order.push((session, room));
    }
    order.sort_by(|(a, ra), (b, rb)| {
        a.key
            .date
            .cmp(&b.key.date)
            .then_with(|| ra.name.cmp(&rb.name))
            .then_with(|| ra.id.cmp(&rb.id))
    });
    Ok(order)
}

/// Fails if the sessions of the first date in `upcoming` need more
/// supervisors than `free`, naming the first session that runs short.
fn check_capacity(upcoming: &[(&ExamSession, &Room)], free: usize) -> Result<()> {
    let Some((first, _)) = upcoming.first() else {
        return Ok(());
    };
    let date = first.key.date;
    let mut needed = 0;
    for (session, room) in upcoming.iter().take_while(|(s, _)| s.key.date == date) {
        let before = needed;
        needed += room.required_supervisors;
        if needed > free {
            return Err(ScheduleError::InsufficientSupervisors {
                session: session.key.clone(),
                available: free.saturating_sub(before),
                required: room.required_supervisors,
            });
        }
    }
    Ok(())
}
