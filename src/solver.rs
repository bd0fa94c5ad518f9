use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus, SolverModel, Variable,
    constraint, default_solver, variable,
};
use log::{info, warn};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::error::SolverError;
use crate::model::{Assignment, BoolVar, Constraint, IntVar, Model, Relation};

/// Outcome of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// A satisfying assignment was found.
    Feasible,
    /// The backend proved its (empty) objective optimal; treated like `Feasible`.
    Optimal,
    /// No satisfying assignment exists.
    Infeasible,
    /// The budget ran out before either proof.
    Unknown,
}

impl SolveStatus {
    pub fn is_solution_found(&self) -> bool {
        matches!(self, SolveStatus::Feasible | SolveStatus::Optimal)
    }
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Present exactly when a solution was found.
    pub assignment: Option<Assignment>,
    pub elapsed: Duration,
}

impl SolveResult {
    pub fn without_solution(status: SolveStatus, elapsed: Duration) -> Self {
        SolveResult {
            status,
            assignment: None,
            elapsed,
        }
    }
}

/// Solver configuration.
///
/// With more than one thread the backend may return a different (equally valid)
/// timetable on each run; only the status is reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Default time budget, used when a call does not pass its own.
    pub time_limit: Option<Duration>,
    /// HiGHS keeps one thread pool per process, so use a single value per process.
    pub threads: u32,
    pub random_seed: i32,
    pub log_to_console: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            threads: 1,
            random_seed: 1234,
            log_to_console: false,
        }
    }
}

/// The external constraint solver, addressed only through status and assignment.
pub trait ConstraintSolver {
    fn solve(&self, model: &Model, time_limit: Option<Duration>) -> Result<SolveResult, SolverError>;
}

/// Solves the model as a 0-1 integer program with HiGHS.
///
/// Reified equalities are lowered with a big-M pair of rows, forced-false
/// booleans become variables with an upper bound of zero.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: SolverConfig,
}

impl HighsSolver {
    pub fn new(config: SolverConfig) -> Self {
        HighsSolver { config }
    }
}

impl ConstraintSolver for HighsSolver {
    fn solve(&self, model: &Model, time_limit: Option<Duration>) -> Result<SolveResult, SolverError> {
        let start_time = Instant::now();
        let time_limit = time_limit.or(self.config.time_limit);

        let forced_false: HashSet<BoolVar> = model
            .constraints()
            .iter()
            .filter_map(|posted| match posted.constraint {
                Constraint::ForceFalse(var) => Some(var),
                _ => None,
            })
            .collect();

        let mut problem = ProblemVariables::new();
        let bools: Vec<Variable> = (0..model.num_bool_vars())
            .map(|idx| {
                let definition = variable().binary().name(model.bool_name(BoolVar(idx)));
                if forced_false.contains(&BoolVar(idx)) {
                    problem.add(definition.max(0))
                } else {
                    problem.add(definition)
                }
            })
            .collect();
        let ints: Vec<Variable> = (0..model.num_int_vars())
            .map(|idx| {
                let (name, domain) = model.int_var(IntVar(idx));
                problem.add(
                    variable()
                        .integer()
                        .min(domain.min as f64)
                        .max(domain.max as f64)
                        .name(name),
                )
            })
            .collect();

        info!(
            "Setting up ILP model with {} binary and {} integer variables...",
            bools.len(),
            ints.len()
        );
        let mut lp = problem
            .minimise(0.0)
            .using(default_solver)
            .set_option("threads", self.config.threads as i32)
            .set_option("random_seed", self.config.random_seed)
            .set_option("log_to_console", self.config.log_to_console);
        if let Some(limit) = time_limit {
            lp = lp.set_option("time_limit", limit.as_secs_f64());
        }

        for posted in model.constraints() {
            match &posted.constraint {
                Constraint::BoolSum {
                    vars,
                    relation,
                    bound,
                } => {
                    let sum: Expression = vars.iter().map(|v| bools[v.0]).sum();
                    let bound = *bound as f64;
                    match relation {
                        Relation::Eq => lp.add_constraint(constraint!(sum == bound)),
                        Relation::Le => lp.add_constraint(constraint!(sum <= bound)),
                    };
                }
                // handled as variable bounds
                Constraint::ForceFalse(_) => {}
                Constraint::ReifiedEq {
                    literal,
                    var,
                    value,
                } => {
                    let x = bools[literal.0];
                    let time = ints[var.0];
                    let big_m = model.int_var(*var).1.span() as f64;
                    let value = *value as f64;
                    // x = 1 forces value <= time <= value, x = 0 leaves the domain free
                    lp.add_constraint(constraint!(time + big_m * x <= value + big_m));
                    lp.add_constraint(constraint!(time - big_m * x >= value - big_m));
                }
                Constraint::Less { left, right } => {
                    let (left, right) = (ints[left.0], ints[right.0]);
                    lp.add_constraint(constraint!(left + 1.0 <= right));
                }
            }
        }

        info!("Starting ILP solver...");
        let solution = match lp.solve() {
            Ok(solution) => solution,
            Err(e) => {
                let status = status_for_error(e)?;
                info!("Solver finished in {:.2?} with {:?}", start_time.elapsed(), status);
                return Ok(SolveResult::without_solution(status, start_time.elapsed()));
            }
        };

        let assignment = Assignment {
            bools: bools.iter().map(|&v| solution.value(v) > 0.5).collect(),
            ints: ints.iter().map(|&v| solution.value(v).round() as i64).collect(),
        };
        let elapsed = start_time.elapsed();

        let status = status_for_solution(solution.status(), model.is_satisfied_by(&assignment));
        if status == SolveStatus::Unknown {
            warn!("Solver stopped after {:.2?} without a valid assignment.", elapsed);
            return Ok(SolveResult::without_solution(status, elapsed));
        }
        info!("Solution found in {:.2?}", elapsed);

        Ok(SolveResult {
            status,
            assignment: Some(assignment),
            elapsed,
        })
    }
}

/// Maps a failed HiGHS run onto a status, keeping real backend failures as errors.
///
/// HiGHS reports a budget that ran out before the first incumbent as
/// `NoSolutionFound`.
fn status_for_error(error: ResolutionError) -> Result<SolveStatus, SolverError> {
    match error {
        ResolutionError::Infeasible => Ok(SolveStatus::Infeasible),
        ResolutionError::Other("NoSolutionFound") => Ok(SolveStatus::Unknown),
        e => Err(SolverError(e.to_string())),
    }
}

/// Maps a returned HiGHS solution onto a status; values that break the model
/// (an unfinished incumbent cut off by a limit) count as no solution.
fn status_for_solution(status: SolutionStatus, satisfies_model: bool) -> SolveStatus {
    match status {
        _ if !satisfies_model => SolveStatus::Unknown,
        SolutionStatus::Optimal => SolveStatus::Optimal,
        SolutionStatus::TimeLimit | SolutionStatus::GapLimit => SolveStatus::Feasible,
    }
}
