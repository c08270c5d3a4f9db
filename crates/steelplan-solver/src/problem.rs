/// Handle for a decision variable, issued by [`LpProblem::add_variable`].
///
/// Handles are dense indices, so callers can key lookup tables on them and
/// read the matching entry out of [`crate::Solution::values`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A linear cost-minimization problem.
///
/// Every variable is continuous and bounded below by zero; the objective
/// coefficient is attached when the variable is registered. Constraints
/// are sparse: each one names only the variables it touches.
#[derive(Debug, Clone, Default)]
pub struct LpProblem {
    /// Variable names, indexed by [`VarId`]
    pub variables: Vec<String>,
    /// Objective cost coefficient per variable
    pub objective: Vec<f64>,
    /// Constraints
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Sparse left-hand side: (variable, coefficient) terms
    pub terms: Vec<(VarId, f64)>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl LpProblem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable with its objective cost. The variable is
    /// implicitly bounded below by zero.
    pub fn add_variable(&mut self, name: impl Into<String>, cost: f64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(name.into());
        self.objective.push(cost);
        id
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(VarId, f64)>,
        op: ConstraintOp,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            terms,
            op,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}
