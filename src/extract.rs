use log::trace;

use crate::data::{DataModel, ScheduledSession};
use crate::error::ExtractionError;
use crate::model::Assignment;
use crate::variables::Variables;

/// Decodes a raw assignment into one session per course.
///
/// Sessions are ordered by timeslot, then room id, then course id.
pub fn extract_schedule(
    data: &DataModel,
    vars: &Variables,
    assignment: &Assignment,
) -> Result<Vec<ScheduledSession>, ExtractionError> {
    let expected = vars.placements().len();
    if assignment.bools.len() < expected {
        return Err(ExtractionError::AssignmentShape {
            expected,
            actual: assignment.bools.len(),
        });
    }

    let mut sessions = Vec::with_capacity(data.courses().len());
    for (c, course) in data.courses().iter().enumerate() {
        let mut placed = Vec::new();
        for (r, room) in data.rooms().iter().enumerate() {
            for t in data.timeslots() {
                if assignment.bool_value(vars.placement(c, r, t)) {
                    placed.push(ScheduledSession {
                        timeslot: t,
                        room: room.id.clone(),
                        course: course.clone(),
                        enrollment: data.enrollment(c),
                    });
                }
            }
        }
        match placed.len() {
            0 => {
                return Err(ExtractionError::NoPlacement {
                    course: course.clone(),
                });
            }
            1 => sessions.extend(placed),
            count => {
                return Err(ExtractionError::MultiplePlacements {
                    course: course.clone(),
                    count,
                });
            }
        }
    }

    sessions.sort_by(|a, b| {
        (a.timeslot, &a.room, &a.course).cmp(&(b.timeslot, &b.room, &b.course))
    });
    trace!("Extracted {} sessions.", sessions.len());
    Ok(sessions)
}
