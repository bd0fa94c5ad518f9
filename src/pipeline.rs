use log::{info, warn};
use serde::Serialize;
use std::time::Duration;

use crate::constraints::ConstraintBuilder;
use crate::data::{DataModel, ScheduledSession, TimetableInput};
use crate::error::{ExtractionError, ScheduleError};
use crate::extract::extract_schedule;
use crate::model::Model;
use crate::solver::{ConstraintSolver, SolveStatus};
use crate::variables::Variables;

/// Terminal result of a scheduling attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "sessions", rename_all = "camelCase")]
pub enum TimetableOutcome {
    #[serde(rename = "feasible")]
    Scheduled(Vec<ScheduledSession>),
    /// Proven: no timetable satisfies the rules.
    Infeasible,
    /// The budget ran out; a larger one may still find a timetable.
    Unknown,
}

/// A fully built model with the lookup needed to decode its assignments.
#[derive(Debug)]
pub struct BuiltModel {
    pub data: DataModel,
    pub vars: Variables,
    pub model: Model,
}

pub fn build_model(input: &TimetableInput) -> Result<BuiltModel, ScheduleError> {
    let data = DataModel::new(input)?;
    info!(
        "Building model with {} courses, {} rooms, and {} timeslots...",
        data.courses().len(),
        data.rooms().len(),
        data.timeslot_count()
    );
    let mut model = Model::new();
    let vars = Variables::allocate(&data, &mut model);
    ConstraintBuilder::new(&data, &vars).build(&mut model);
    Ok(BuiltModel { data, vars, model })
}

/// Validates the input, builds the model, solves it and decodes the timetable.
pub fn schedule<S: ConstraintSolver + ?Sized>(
    input: &TimetableInput,
    solver: &S,
    time_limit: Option<Duration>,
) -> Result<TimetableOutcome, ScheduleError> {
    let built = build_model(input)?;
    if built.data.courses().is_empty() {
        return Ok(TimetableOutcome::Scheduled(Vec::new()));
    }
    // no placement variables at all: no course can be placed anywhere
    if built.data.rooms().is_empty() {
        info!("No rooms to place {} courses in.", built.data.courses().len());
        return Ok(TimetableOutcome::Infeasible);
    }

    let result = solver.solve(&built.model, time_limit)?;
    match result.status {
        SolveStatus::Feasible | SolveStatus::Optimal => {
            let assignment = result.assignment.ok_or(ExtractionError::AssignmentShape {
                expected: built.vars.placements().len(),
                actual: 0,
            })?;
            let sessions = extract_schedule(&built.data, &built.vars, &assignment)?;
            Ok(TimetableOutcome::Scheduled(sessions))
        }
        SolveStatus::Infeasible => {
            info!("No valid timetable exists.");
            Ok(TimetableOutcome::Infeasible)
        }
        SolveStatus::Unknown => {
            warn!("Search was inconclusive after {:.2?}.", result.elapsed);
            Ok(TimetableOutcome::Unknown)
        }
    }
}
