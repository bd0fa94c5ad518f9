use std::fmt;

use crate::data::ScheduledSession;
use crate::pipeline::TimetableOutcome;

/// Fixed-width text table of sessions.
pub struct ScheduleTable<'a>(pub &'a [ScheduledSession]);

impl fmt::Display for ScheduleTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<5} | {:<15} | {:<15} | {:<5}", "TIME", "ROOM", "COURSE", "ENROLLED")?;
        writeln!(f, "{}", "-".repeat(50))?;
        for s in self.0 {
            writeln!(
                f,
                "{:<5} | {:<15} | {:<15} | {:<5}",
                s.timeslot, s.room, s.course, s.enrollment
            )?;
        }
        Ok(())
    }
}

pub fn format_schedule(sessions: &[ScheduledSession]) -> String {
    ScheduleTable(sessions).to_string()
}

impl fmt::Display for TimetableOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetableOutcome::Scheduled(sessions) => {
                writeln!(f, "Solution found")?;
                write!(f, "{}", ScheduleTable(sessions))
            }
            TimetableOutcome::Infeasible => {
                writeln!(f, "No valid timetable exists under the given constraints.")
            }
            TimetableOutcome::Unknown => writeln!(
                f,
                "Search was inconclusive within the time budget; retry with a larger budget."
            ),
        }
    }
}
