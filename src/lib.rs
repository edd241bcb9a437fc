//! Fair exam-proctor assignment.
//!
//! Assigns supervisors to exam sessions (one session per date and room)
//! so that every session is fully staffed, nobody on approved leave is
//! used, nobody works two rooms on one date, and cumulative workload
//! stays balanced across the roster.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Supervisor`, `Room`, `ExamSession`,
//!   `LeaveInterval`, `LeaveRegister`, `AssignmentResult`, `DateRange`
//! - **`availability`**: Approved-leave lookup per (supervisor, date)
//! - **`workload`**: Cumulative counts and last assignment dates
//! - **`pool`**: Fairness-ranked eligible pool and seeded selection
//! - **`guard`**: Same-session and same-date conflict checks
//! - **`scheduler`**: The assignment engine, swap optimizer and KPIs
//! - **`validation`**: Input integrity checks (duplicate IDs, references, leave ranges)
//! - **`error`**: Failure taxonomy
//!
//! # Example
//!
//! ```
//! use u_proctor::models::{parse_date, LeaveInterval, Room, Supervisor};
//! use u_proctor::scheduler::{AssignmentEngine, EngineConfig, ScheduleRequest};
//!
//! let day = parse_date("2024-06-03").unwrap();
//! let supervisors = vec![
//!     Supervisor::new("S1"),
//!     Supervisor::new("S2"),
//!     Supervisor::new("S3"),
//! ];
//! let request = ScheduleRequest::new(supervisors, vec![Room::new("R1")], vec![])
//!     .with_date(day)
//!     .with_leaves(vec![LeaveInterval::approved("L1", "S1", day, day)]);
//!
//! let run = AssignmentEngine::new()
//!     .with_config(EngineConfig::default().with_seed(42))
//!     .run(&request)
//!     .unwrap();
//! let mut slots = run.result.sessions()[0].slots.clone();
//! slots.sort();
//! assert_eq!(slots, ["S2", "S3"]);
//! ```

pub mod availability;
pub mod error;
pub mod guard;
pub mod models;
pub mod pool;
pub mod scheduler;
pub mod validation;
pub mod workload;

pub use error::{Result, ScheduleError};
