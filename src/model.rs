//! Solver-agnostic constraint model.
//!
//! The builder emits constraints against this small vocabulary and the solver
//! backends lower it into whatever their engine understands.

use serde::Serialize;
use std::fmt;

/// Handle to a boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BoolVar(pub usize);

/// Handle to an integer decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IntVar(pub usize);

/// Inclusive integer domain of an [`IntVar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntDomain {
    pub min: i64,
    pub max: i64,
}

impl IntDomain {
    pub fn span(&self) -> i64 {
        self.max - self.min
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relation {
    Eq,
    Le,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Constraint {
    /// `sum(vars) <relation> bound`
    BoolSum {
        vars: Vec<BoolVar>,
        relation: Relation,
        bound: i64,
    },
    /// Domain restriction of a boolean to `false`.
    ForceFalse(BoolVar),
    /// `literal => var == value`
    ReifiedEq {
        literal: BoolVar,
        var: IntVar,
        value: i64,
    },
    /// `left < right`
    Less { left: IntVar, right: IntVar },
}

/// Which scheduling rule a constraint encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ConstraintKind {
    SingleAssignment,
    RoomExclusivity,
    Capacity,
    StudentConflict,
    PrecedenceLink,
    PrecedenceOrder,
    Availability,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::SingleAssignment => "single assignment",
            ConstraintKind::RoomExclusivity => "room exclusivity",
            ConstraintKind::Capacity => "capacity",
            ConstraintKind::StudentConflict => "student conflict",
            ConstraintKind::PrecedenceLink => "precedence link",
            ConstraintKind::PrecedenceOrder => "precedence order",
            ConstraintKind::Availability => "teacher availability",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedConstraint {
    pub kind: ConstraintKind,
    pub constraint: Constraint,
}

/// Raw values for every variable of a [`Model`], indexed by handle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    pub bools: Vec<bool>,
    pub ints: Vec<i64>,
}

impl Assignment {
    pub fn bool_value(&self, var: BoolVar) -> bool {
        self.bools.get(var.0).copied().unwrap_or(false)
    }

    pub fn int_value(&self, var: IntVar) -> Option<i64> {
        self.ints.get(var.0).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Model {
    bool_names: Vec<String>,
    int_vars: Vec<(String, IntDomain)>,
    constraints: Vec<PostedConstraint>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_bool_var(&mut self, name: impl Into<String>) -> BoolVar {
        self.bool_names.push(name.into());
        BoolVar(self.bool_names.len() - 1)
    }

    pub fn new_int_var(&mut self, name: impl Into<String>, domain: IntDomain) -> IntVar {
        self.int_vars.push((name.into(), domain));
        IntVar(self.int_vars.len() - 1)
    }

    pub fn post(&mut self, kind: ConstraintKind, constraint: Constraint) {
        self.constraints.push(PostedConstraint { kind, constraint });
    }

    pub fn num_bool_vars(&self) -> usize {
        self.bool_names.len()
    }

    pub fn num_int_vars(&self) -> usize {
        self.int_vars.len()
    }

    pub fn bool_name(&self, var: BoolVar) -> &str {
        &self.bool_names[var.0]
    }

    pub fn int_var(&self, var: IntVar) -> (&str, IntDomain) {
        let (name, domain) = &self.int_vars[var.0];
        (name, *domain)
    }

    pub fn constraints(&self) -> &[PostedConstraint] {
        &self.constraints
    }

    pub fn count(&self, kind: ConstraintKind) -> usize {
        self.constraints.iter().filter(|c| c.kind == kind).count()
    }

    /// Returns the indices of all constraints the assignment violates.
    ///
    /// An assignment of the wrong shape or with an integer outside its domain
    /// violates every constraint touching the offending variable.
    pub fn violations(&self, assignment: &Assignment) -> Vec<usize> {
        let int_ok = |var: IntVar| {
            assignment
                .int_value(var)
                .is_some_and(|v| self.int_vars[var.0].1.contains(v))
        };
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, posted)| match &posted.constraint {
                Constraint::BoolSum {
                    vars,
                    relation,
                    bound,
                } => {
                    let sum = vars.iter().filter(|v| assignment.bool_value(**v)).count() as i64;
                    match relation {
                        Relation::Eq => sum != *bound,
                        Relation::Le => sum > *bound,
                    }
                }
                Constraint::ForceFalse(var) => assignment.bool_value(*var),
                Constraint::ReifiedEq {
                    literal,
                    var,
                    value,
                } => {
                    assignment.bool_value(*literal)
                        && (!int_ok(*var) || assignment.int_value(*var) != Some(*value))
                }
                Constraint::Less { left, right } => {
                    !int_ok(*left)
                        || !int_ok(*right)
                        || assignment.int_value(*left) >= assignment.int_value(*right)
                }
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        assignment.bools.len() == self.num_bool_vars()
            && assignment.ints.len() == self.num_int_vars()
            && self.violations(assignment).is_empty()
    }
}
