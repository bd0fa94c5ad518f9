#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};

use timetable_solver::data::{PrecedencePair, Room, ScheduledSession, Student, TimetableInput};

pub fn room(id: &str, capacity: i64) -> Room {
    Room {
        id: id.to_string(),
        capacity,
    }
}

pub fn student(id: &str, courses: &[&str]) -> Student {
    Student {
        id: id.to_string(),
        courses: courses.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn precedence(earlier: &str, later: &str) -> PrecedencePair {
    PrecedencePair {
        earlier: earlier.to_string(),
        later: later.to_string(),
    }
}

pub fn courses(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|c| c.to_string()).collect()
}

/// Inflates the enrollment of `course` with students who take nothing else.
pub fn add_dummy_students(input: &mut TimetableInput, course: &str, count: usize) {
    for i in 0..count {
        input
            .students
            .push(student(&format!("dummy_{course}_{i}"), &[course]));
    }
}

/// Six courses, three rooms and three timeslots with theory-before-lab rules.
pub fn department_input() -> TimetableInput {
    let mut input = TimetableInput {
        courses: courses(&[
            "C1_Prog",
            "C2_Math",
            "C3_Cpp_Theory",
            "C3_Cpp_Lab",
            "C4_CSP_Theory",
            "C5_CSP_Lab",
        ]),
        rooms: vec![room("R1_Small", 15), room("R2_Medium", 25), room("R3_Large", 50)],
        total_timeslots: 3,
        students: vec![
            student("Student_1", &["C1_Prog", "C2_Math"]),
            student("Student_2", &["C3_Cpp_Theory", "C3_Cpp_Lab", "C4_CSP_Theory"]),
            student("Student_3", &["C4_CSP_Theory", "C5_CSP_Lab"]),
            student("Student_4", &["C1_Prog", "C3_Cpp_Theory", "C3_Cpp_Lab"]),
            student("Student_5", &["C2_Math", "C5_CSP_Lab"]),
        ],
        teacher_unavailability: BTreeMap::from([("C1_Prog".to_string(), BTreeSet::from([0]))]),
        precedences: vec![
            precedence("C4_CSP_Theory", "C5_CSP_Lab"),
            precedence("C3_Cpp_Theory", "C3_Cpp_Lab"),
        ],
        time_tracked_courses: Vec::new(),
    };
    add_dummy_students(&mut input, "C3_Cpp_Theory", 20);
    add_dummy_students(&mut input, "C4_CSP_Theory", 30);
    input
}

/// Checks every hard rule against an extracted timetable, panicking on the first violation.
pub fn assert_valid_timetable(input: &TimetableInput, sessions: &[ScheduledSession]) {
    let mut enrollment: HashMap<&str, u32> = HashMap::new();
    for s in &input.students {
        for c in &s.courses {
            *enrollment.entry(c.as_str()).or_default() += 1;
        }
    }

    // exactly one session per course
    let by_course: HashMap<&str, &ScheduledSession> =
        sessions.iter().map(|s| (s.course.as_str(), s)).collect();
    assert_eq!(sessions.len(), input.courses.len(), "one session per course");
    for c in &input.courses {
        assert!(by_course.contains_key(c.as_str()), "{c} not scheduled");
    }

    // at most one course per (room, timeslot)
    let slots: BTreeSet<(&str, u32)> = sessions.iter().map(|s| (s.room.as_str(), s.timeslot)).collect();
    assert_eq!(slots.len(), sessions.len(), "room double-booked");

    for s in sessions {
        assert!(s.timeslot < input.total_timeslots);
        let expected = enrollment.get(s.course.as_str()).copied().unwrap_or(0);
        assert_eq!(s.enrollment, expected);

        let room = input.rooms.iter().find(|r| r.id == s.room).unwrap();
        assert!(
            i64::from(s.enrollment) <= room.capacity,
            "{} does not fit {}",
            s.course,
            s.room
        );

        if let Some(blocked) = input.teacher_unavailability.get(&s.course) {
            assert!(!blocked.contains(&s.timeslot), "{} at unavailable slot", s.course);
        }
    }

    for st in &input.students {
        let times: BTreeSet<u32> = st
            .courses
            .iter()
            .map(|c| by_course[c.as_str()].timeslot)
            .collect();
        assert_eq!(times.len(), st.courses.len(), "{} has a clash", st.id);
    }

    for p in &input.precedences {
        assert!(
            by_course[p.earlier.as_str()].timeslot < by_course[p.later.as_str()].timeslot,
            "{} must precede {}",
            p.earlier,
            p.later
        );
    }
}
