mod problem;
mod solution;
mod solve;

pub use problem::{Constraint, ConstraintOp, LpProblem, VarId};
pub use solution::{Solution, SolutionStatus};
pub use solve::Solver;
