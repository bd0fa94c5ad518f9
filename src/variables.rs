use log::trace;
use std::collections::BTreeMap;

use crate::data::{DataModel, Timeslot};
use crate::model::{BoolVar, IntDomain, IntVar, Model};

/// Decision variables of one model build.
///
/// Placement variables live in a dense array addressed by
/// `(course, room, timeslot)`; time variables exist only for tracked courses.
#[derive(Debug, Clone)]
pub struct Variables {
    num_rooms: usize,
    num_timeslots: usize,
    placements: Vec<BoolVar>,
    times: BTreeMap<usize, IntVar>,
}

impl Variables {
    /// Allocates every placement variable and one time variable per tracked course.
    /// Posts no constraints.
    pub fn allocate(data: &DataModel, model: &mut Model) -> Self {
        let num_rooms = data.rooms().len();
        let num_timeslots = data.timeslot_count() as usize;

        // x_crt = 1 if course c is in room r at time t
        let mut placements = Vec::with_capacity(data.courses().len() * num_rooms * num_timeslots);
        for course in data.courses() {
            for room in data.rooms() {
                for t in data.timeslots() {
                    placements.push(model.new_bool_var(format!("x_{}_{}_{}", course, room.id, t)));
                }
            }
        }

        let domain = IntDomain {
            min: 0,
            max: i64::from(data.max_timeslot()),
        };
        let times = data
            .time_tracked_courses()
            .iter()
            .map(|&c| (c, model.new_int_var(format!("time_{}", data.courses()[c]), domain)))
            .collect();

        let variables = Variables {
            num_rooms,
            num_timeslots,
            placements,
            times,
        };
        trace!(
            "Allocated {} placement variables and {} time variables.",
            variables.placements.len(),
            variables.times.len()
        );
        variables
    }

    fn offset(&self, course: usize, room: usize, timeslot: Timeslot) -> usize {
        (course * self.num_rooms + room) * self.num_timeslots + timeslot as usize
    }

    pub fn placement(&self, course: usize, room: usize, timeslot: Timeslot) -> BoolVar {
        self.placements[self.offset(course, room, timeslot)]
    }

    /// All placement variables in (course, room, timeslot) order.
    pub fn placements(&self) -> &[BoolVar] {
        &self.placements
    }

    pub fn time(&self, course: usize) -> Option<IntVar> {
        self.times.get(&course).copied()
    }

    pub fn times(&self) -> impl Iterator<Item = (usize, IntVar)> + '_ {
        self.times.iter().map(|(&c, &v)| (c, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PrecedencePair, Room, TimetableInput};

    fn data() -> DataModel {
        DataModel::new(&TimetableInput {
            courses: vec!["A".into(), "B".into(), "C".into()],
            rooms: vec![
                Room {
                    id: "R1".into(),
                    capacity: 10,
                },
                Room {
                    id: "R2".into(),
                    capacity: 20,
                },
            ],
            total_timeslots: 4,
            precedences: vec![PrecedencePair {
                earlier: "C".into(),
                later: "A".into(),
            }],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_placement_cardinality() {
        let data = data();
        let mut model = Model::new();
        let vars = Variables::allocate(&data, &mut model);
        assert_eq!(vars.placements().len(), 3 * 2 * 4);
        assert_eq!(model.num_bool_vars(), 24);
        assert!(model.constraints().is_empty());
    }

    #[test]
    fn test_placement_addressable_by_key() {
        let data = data();
        let mut model = Model::new();
        let vars = Variables::allocate(&data, &mut model);
        assert_eq!(model.bool_name(vars.placement(1, 1, 3)), "x_B_R2_3");
        assert_eq!(model.bool_name(vars.placement(2, 0, 0)), "x_C_R1_0");
        let mut all: Vec<_> = vars.placements().to_vec();
        all.dedup();
        assert_eq!(all.len(), 24);
    }

    #[test]
    fn test_time_variables_only_for_tracked_courses() {
        let data = data();
        let mut model = Model::new();
        let vars = Variables::allocate(&data, &mut model);
        assert!(vars.time(1).is_none());
        let time_a = vars.time(0).unwrap();
        let (name, domain) = model.int_var(time_a);
        assert_eq!(name, "time_A");
        assert_eq!(domain, IntDomain { min: 0, max: 3 });
        assert_eq!(vars.times().map(|(c, _)| c).collect::<Vec<_>>(), vec![0, 2]);
    }
}
