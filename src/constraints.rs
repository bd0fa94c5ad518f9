//! Translation of the scheduling rules into model constraints.
//!
//! Courses, rooms and timeslots are always visited in input order, so two
//! builds from the same input produce identical constraint lists.

use itertools::Itertools;
use log::{debug, info};
use std::collections::BTreeSet;

use crate::data::{DataModel, Timeslot};
use crate::model::{BoolVar, Constraint, ConstraintKind, Model, Relation};
use crate::variables::Variables;

pub struct ConstraintBuilder<'a> {
    data: &'a DataModel,
    vars: &'a Variables,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(data: &'a DataModel, vars: &'a Variables) -> Self {
        ConstraintBuilder { data, vars }
    }

    /// Posts every rule into `model`. Never fails; infeasibility only shows at solve time.
    pub fn build(&self, model: &mut Model) {
        self.add_single_assignment(model);
        self.add_room_exclusivity(model);
        self.add_capacity(model);
        self.add_student_conflicts(model);
        self.add_precedence_links(model);
        self.add_precedence_order(model);
        self.add_availability(model);
        for (count, kind) in model.constraints().iter().map(|c| c.kind).dedup_with_count() {
            debug!("{} {} constraints", count, kind);
        }
        info!(
            "Posted {} constraints over {} boolean and {} integer variables.",
            model.constraints().len(),
            model.num_bool_vars(),
            model.num_int_vars()
        );
    }

    fn room_indices(&self) -> std::ops::Range<usize> {
        0..self.data.rooms().len()
    }

    /// Placement variables of `course` across all rooms at `timeslot`.
    fn active_at(&self, course: usize, timeslot: Timeslot) -> impl Iterator<Item = BoolVar> + '_ {
        self.room_indices()
            .map(move |r| self.vars.placement(course, r, timeslot))
    }

    // each course is scheduled exactly once
    fn add_single_assignment(&self, model: &mut Model) {
        for c in 0..self.data.courses().len() {
            let vars = self
                .room_indices()
                .cartesian_product(self.data.timeslots())
                .map(|(r, t)| self.vars.placement(c, r, t))
                .collect();
            model.post(
                ConstraintKind::SingleAssignment,
                Constraint::BoolSum {
                    vars,
                    relation: Relation::Eq,
                    bound: 1,
                },
            );
        }
        debug!("Added 'course scheduled once' constraints.");
    }

    // no room double-booking
    fn add_room_exclusivity(&self, model: &mut Model) {
        for r in self.room_indices() {
            for t in self.data.timeslots() {
                let vars = (0..self.data.courses().len())
                    .map(|c| self.vars.placement(c, r, t))
                    .collect();
                model.post(
                    ConstraintKind::RoomExclusivity,
                    Constraint::BoolSum {
                        vars,
                        relation: Relation::Le,
                        bound: 1,
                    },
                );
            }
        }
        debug!("Added 'no room overlap' constraints.");
    }

    fn add_capacity(&self, model: &mut Model) {
        for c in 0..self.data.courses().len() {
            let enrollment = i64::from(self.data.enrollment(c));
            for (r, room) in self.data.rooms().iter().enumerate() {
                if enrollment > room.capacity {
                    debug!(
                        "Course {} ({} enrolled) does not fit room {} (capacity {}).",
                        self.data.courses()[c],
                        enrollment,
                        room.id,
                        room.capacity
                    );
                    for t in self.data.timeslots() {
                        model.post(
                            ConstraintKind::Capacity,
                            Constraint::ForceFalse(self.vars.placement(c, r, t)),
                        );
                    }
                }
            }
        }
    }

    /// Unordered pairs of distinct courses that share at least one student, sorted.
    pub fn conflicting_pairs(&self) -> BTreeSet<(usize, usize)> {
        self.data
            .student_courses()
            .iter()
            .flat_map(|courses| {
                courses
                    .iter()
                    .tuple_combinations()
                    .map(|(&a, &b)| (a.min(b), a.max(b)))
            })
            .collect()
    }

    // a student cannot attend two courses at the same time; pairwise exclusion
    // of every two courses covers any larger set of their courses
    fn add_student_conflicts(&self, model: &mut Model) {
        let pairs = self.conflicting_pairs();
        for &(c1, c2) in &pairs {
            for t in self.data.timeslots() {
                let vars = self.active_at(c1, t).chain(self.active_at(c2, t)).collect();
                model.post(
                    ConstraintKind::StudentConflict,
                    Constraint::BoolSum {
                        vars,
                        relation: Relation::Le,
                        bound: 1,
                    },
                );
            }
        }
        debug!("Added student conflict constraints for {} course pairs.", pairs.len());
    }

    // link placement x_crt to time_c: x_crt => time_c == t
    fn add_precedence_links(&self, model: &mut Model) {
        for (c, time) in self.vars.times() {
            for r in self.room_indices() {
                for t in self.data.timeslots() {
                    model.post(
                        ConstraintKind::PrecedenceLink,
                        Constraint::ReifiedEq {
                            literal: self.vars.placement(c, r, t),
                            var: time,
                            value: i64::from(t),
                        },
                    );
                }
            }
        }
    }

    fn add_precedence_order(&self, model: &mut Model) {
        for &(earlier, later) in self.data.precedences() {
            // both are tracked by construction of the data model
            if let (Some(left), Some(right)) = (self.vars.time(earlier), self.vars.time(later)) {
                model.post(
                    ConstraintKind::PrecedenceOrder,
                    Constraint::Less { left, right },
                );
            }
        }
    }

    fn add_availability(&self, model: &mut Model) {
        for c in 0..self.data.courses().len() {
            for &t in self.data.unavailable_timeslots(c) {
                for r in self.room_indices() {
                    model.post(
                        ConstraintKind::Availability,
                        Constraint::ForceFalse(self.vars.placement(c, r, t)),
                    );
                }
            }
        }
    }
}
