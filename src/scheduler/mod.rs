//! Assignment engine, post-pass optimizer and KPI evaluation.
//!
//! # Algorithm
//!
//! `AssignmentEngine` walks the exam calendar in (date, room) order and
//! fills every slot from a fairness-ranked eligible pool: candidates with
//! the fewest assignments first, ties broken by the longest idle time,
//! then a seeded random draw from the head of the ranking. Every commit
//! passes the conflict guard.
//!
//! `BalanceOptimizer` is an optional hill-climbing pass that swaps whole
//! supervisor lists between sessions when a pluggable score improves and
//! no leave or same-date conflict is introduced.
//!
//! # KPI
//!
//! `WorkloadKpi` reports count spread, variance, consecutive-day pairs
//! and per-date/per-room coverage for a committed run.

mod engine;
mod kpi;
mod optimizer;

pub use engine::{
    AssignmentEngine, AssignmentRun, EngineConfig, EngineState, ScheduleRequest, MIN_ROSTER,
};
pub use kpi::WorkloadKpi;
pub use optimizer::{
    BalanceOptimizer, ConsecutiveDays, OptimizationReport, OptimizerConfig, RoomRepetition,
    ScheduleView, SessionScore,
};
