//! Course timetabling as a constraint-satisfaction problem.
//!
//! Scheduling facts are validated into a [`data::DataModel`], turned into
//! placement and time variables, encoded as constraints, handed to a
//! [`solver::ConstraintSolver`] and decoded back into a timetable.

pub mod config;
pub mod constraints;
pub mod data;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod server;
pub mod solver;
pub mod variables;

pub use data::{DataModel, ScheduledSession, TimetableInput};
pub use error::{ExtractionError, ScheduleError, SolverError, ValidationError};
pub use pipeline::{TimetableOutcome, build_model, schedule};
pub use solver::{ConstraintSolver, HighsSolver, SolveStatus, SolverConfig};
