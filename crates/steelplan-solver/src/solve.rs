use good_lp::Solution as _;
use good_lp::{Expression, ProblemVariables, ResolutionError, SolverModel, constraint, default_solver, variable};

use crate::problem::{ConstraintOp, LpProblem};
use crate::solution::Solution;

/// Adapter onto the external LP backend.
///
/// Translates an [`LpProblem`] into the backend's model, runs it, and maps
/// the outcome onto [`Solution`]. No solving arithmetic lives here.
pub struct Solver {
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self { tolerance: 1e-6 }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn solve(&self, problem: &LpProblem) -> Solution {
        if problem.num_variables() == 0 {
            return self.solve_degenerate(problem);
        }

        let mut vars = ProblemVariables::new();
        let handles: Vec<_> = (0..problem.num_variables())
            .map(|_| vars.add(variable().min(0.0)))
            .collect();

        let objective: Expression = problem
            .objective
            .iter()
            .zip(&handles)
            .map(|(cost, var)| *var * *cost)
            .sum();

        let mut model = vars.minimise(objective).using(default_solver);
        for c in &problem.constraints {
            let lhs: Expression = c
                .terms
                .iter()
                .map(|(id, coefficient)| handles[id.index()] * *coefficient)
                .sum();
            model = model.with(match c.op {
                ConstraintOp::Le => constraint::leq(lhs, c.rhs),
                ConstraintOp::Ge => constraint::geq(lhs, c.rhs),
                ConstraintOp::Eq => constraint::eq(lhs, c.rhs),
            });
        }

        match model.solve() {
            Ok(solved) => {
                let values: Vec<f64> = handles.iter().map(|var| solved.value(*var)).collect();
                let objective_value = problem
                    .objective
                    .iter()
                    .zip(&values)
                    .map(|(cost, value)| cost * value)
                    .sum();
                tracing::debug!(
                    variables = problem.num_variables(),
                    constraints = problem.num_constraints(),
                    objective = objective_value,
                    "backend returned an optimal assignment"
                );
                Solution::optimal(values, objective_value)
            }
            Err(ResolutionError::Infeasible) => Solution::infeasible(),
            Err(ResolutionError::Unbounded) => Solution::unbounded(),
            Err(err) => {
                tracing::warn!(error = %err, "backend failure");
                Solution::error()
            }
        }
    }

    /// A problem with no variables has an empty left-hand side everywhere;
    /// it is optimal at zero cost unless some right-hand side rules it out.
    fn solve_degenerate(&self, problem: &LpProblem) -> Solution {
        let satisfiable = problem.constraints.iter().all(|c| match c.op {
            ConstraintOp::Le => 0.0 <= c.rhs + self.tolerance,
            ConstraintOp::Ge => 0.0 >= c.rhs - self.tolerance,
            ConstraintOp::Eq => c.rhs.abs() <= self.tolerance,
        });
        if satisfiable {
            Solution::optimal(Vec::new(), 0.0)
        } else {
            Solution::infeasible()
        }
    }
}
