use thiserror::Error;

use crate::data::{CourseId, RoomId, Timeslot};

/// Malformed or inconsistent input facts, raised while building the [`DataModel`].
///
/// [`DataModel`]: crate::data::DataModel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The timeslot domain is empty")]
    EmptyTimeslots,
    #[error("Course {0} is listed more than once")]
    DuplicateCourse(CourseId),
    #[error("Room {0} is listed more than once")]
    DuplicateRoom(RoomId),
    #[error("Room {room} has non-positive capacity {capacity}")]
    NonPositiveCapacity { room: RoomId, capacity: i64 },
    #[error("Unknown course {course} referenced by {context}")]
    UnknownCourse { context: String, course: CourseId },
    #[error("Student {student} is enrolled in {course} more than once")]
    DuplicateEnrollment { student: String, course: CourseId },
    #[error("Timeslot {timeslot} for course {course} is outside [0, {max}]")]
    TimeslotOutOfRange {
        course: CourseId,
        timeslot: Timeslot,
        max: Timeslot,
    },
}

/// The solver returned an assignment that breaks the single-assignment invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Assignment covers {actual} placement variables, expected {expected}")]
    AssignmentShape { expected: usize, actual: usize },
    #[error("Course {course} has no placement in the assignment")]
    NoPlacement { course: CourseId },
    #[error("Course {course} has {count} placements in the assignment")]
    MultiplePlacements { course: CourseId, count: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Solver backend failed: {0}")]
pub struct SolverError(pub String);

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}
