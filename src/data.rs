use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::Range;

use crate::error::ValidationError;

// Type aliases for clarity
pub type CourseId = String;
pub type RoomId = String;
pub type StudentId = String;
pub type Timeslot = u32;

/// Represents a physical room with a given capacity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub capacity: i64,
}

/// A student and the courses they are enrolled in.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Student {
    pub id: StudentId,
    pub courses: Vec<CourseId>,
}

/// `earlier` must occupy a strictly smaller timeslot than `later`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrecedencePair {
    pub earlier: CourseId,
    pub later: CourseId,
}

/// The raw scheduling facts, as received from a caller.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableInput {
    pub courses: Vec<CourseId>,
    pub rooms: Vec<Room>,
    pub total_timeslots: u32,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teacher_unavailability: BTreeMap<CourseId, BTreeSet<Timeslot>>,
    #[serde(default)]
    pub precedences: Vec<PrecedencePair>,
    /// Courses that need a time variable even without taking part in a precedence.
    #[serde(default)]
    pub time_tracked_courses: Vec<CourseId>,
}

/// Immutable, validated snapshot of the scheduling facts.
///
/// Courses, rooms and timeslots are addressed by their position in the input,
/// which fixes the iteration order of every later stage.
#[derive(Debug, Clone)]
pub struct DataModel {
    courses: Vec<CourseId>,
    rooms: Vec<Room>,
    timeslot_count: u32,
    enrollments: Vec<u32>,
    student_courses: Vec<Vec<usize>>,
    unavailable: Vec<BTreeSet<Timeslot>>,
    precedences: Vec<(usize, usize)>,
    time_tracked: BTreeSet<usize>,
}

impl DataModel {
    pub fn new(input: &TimetableInput) -> Result<Self, ValidationError> {
        if input.total_timeslots == 0 {
            return Err(ValidationError::EmptyTimeslots);
        }
        let max_timeslot = input.total_timeslots - 1;

        let mut course_index: HashMap<&str, usize> = HashMap::with_capacity(input.courses.len());
        for (idx, course) in input.courses.iter().enumerate() {
            if course_index.insert(course.as_str(), idx).is_some() {
                return Err(ValidationError::DuplicateCourse(course.clone()));
            }
        }
        let lookup = |context: &str, course: &CourseId| {
            course_index
                .get(course.as_str())
                .copied()
                .ok_or_else(|| ValidationError::UnknownCourse {
                    context: context.to_string(),
                    course: course.clone(),
                })
        };

        let mut room_ids = BTreeSet::new();
        for room in &input.rooms {
            if !room_ids.insert(room.id.as_str()) {
                return Err(ValidationError::DuplicateRoom(room.id.clone()));
            }
            if room.capacity <= 0 {
                return Err(ValidationError::NonPositiveCapacity {
                    room: room.id.clone(),
                    capacity: room.capacity,
                });
            }
        }

        // tally enrollments
        let mut enrollments = vec![0u32; input.courses.len()];
        let mut student_courses = Vec::with_capacity(input.students.len());
        for student in &input.students {
            let mut seen = BTreeSet::new();
            let mut indices = Vec::with_capacity(student.courses.len());
            for course in &student.courses {
                let idx = lookup(&format!("student {}", student.id), course)?;
                if !seen.insert(idx) {
                    return Err(ValidationError::DuplicateEnrollment {
                        student: student.id.clone(),
                        course: course.clone(),
                    });
                }
                enrollments[idx] += 1;
                indices.push(idx);
            }
            student_courses.push(indices);
        }

        let mut unavailable = vec![BTreeSet::new(); input.courses.len()];
        for (course, slots) in &input.teacher_unavailability {
            let idx = lookup("teacher unavailability", course)?;
            if let Some(&timeslot) = slots.iter().find(|&&t| t > max_timeslot) {
                return Err(ValidationError::TimeslotOutOfRange {
                    course: course.clone(),
                    timeslot,
                    max: max_timeslot,
                });
            }
            unavailable[idx].extend(slots.iter().copied());
        }

        let mut precedences = Vec::with_capacity(input.precedences.len());
        let mut time_tracked = BTreeSet::new();
        for pair in &input.precedences {
            let earlier = lookup("precedence pair", &pair.earlier)?;
            let later = lookup("precedence pair", &pair.later)?;
            precedences.push((earlier, later));
            time_tracked.insert(earlier);
            time_tracked.insert(later);
        }
        for course in &input.time_tracked_courses {
            time_tracked.insert(lookup("time tracking", course)?);
        }

        Ok(DataModel {
            courses: input.courses.clone(),
            rooms: input.rooms.clone(),
            timeslot_count: input.total_timeslots,
            enrollments,
            student_courses,
            unavailable,
            precedences,
            time_tracked,
        })
    }

    pub fn courses(&self) -> &[CourseId] {
        &self.courses
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn timeslot_count(&self) -> u32 {
        self.timeslot_count
    }

    pub fn timeslots(&self) -> Range<Timeslot> {
        0..self.timeslot_count
    }

    pub fn max_timeslot(&self) -> Timeslot {
        self.timeslot_count - 1
    }

    /// Number of students enrolled in the course at `course` index.
    pub fn enrollment(&self, course: usize) -> u32 {
        self.enrollments[course]
    }

    /// Course indices of every student, in enrollment order.
    pub fn student_courses(&self) -> &[Vec<usize>] {
        &self.student_courses
    }

    pub fn unavailable_timeslots(&self, course: usize) -> &BTreeSet<Timeslot> {
        &self.unavailable[course]
    }

    /// (earlier, later) course indices.
    pub fn precedences(&self) -> &[(usize, usize)] {
        &self.precedences
    }

    /// Courses that get an integer time variable.
    pub fn time_tracked_courses(&self) -> &BTreeSet<usize> {
        &self.time_tracked
    }
}

/// One row of an extracted timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub timeslot: Timeslot,
    pub room: RoomId,
    pub course: CourseId,
    pub enrollment: u32,
}

impl fmt::Display for ScheduledSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} at slot {} ({} enrolled)",
            self.course, self.room, self.timeslot, self.enrollment
        )
    }
}
