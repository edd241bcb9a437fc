//! Proctoring domain models.
//!
//! Provides the data types a scheduling run consumes (roster, rooms,
//! exam calendar, leaves) and the result it produces.
//!
//! # Domain Mappings
//!
//! | u-proctor | Scheduling term | Staff rostering |
//! |-----------|-----------------|-----------------|
//! | Supervisor | Human resource | Employee |
//! | Room | Work center | Post |
//! | ExamSession | Activity slot | Shift |
//! | LeaveInterval | Blocked period | Time off |

mod assignment;
mod calendar;
mod leave;
mod room;
mod session;
mod supervisor;

pub use assignment::AssignmentResult;
pub use calendar::{parse_date, DateRange, DATE_FORMAT};
pub use leave::{LeaveError, LeaveInterval, LeaveRegister, LeaveStats, LeaveStatus};
pub use room::{Room, DEFAULT_REQUIRED_SUPERVISORS};
pub use session::{ExamSession, SessionKey};
pub use supervisor::{ExperienceTier, Supervisor};
