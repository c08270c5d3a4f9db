use steelplan_solver::{Solution, SolutionStatus, Solver};
use thiserror::Error;

use crate::builder::{BuildError, Formulation, formulate};
use crate::store::EntityStore;

/// Tonnage at or below this threshold is treated as zero when building
/// tables, absorbing the backend's numeric tolerance.
pub const TONNAGE_TOLERANCE: f64 = 1e-6;

/// Why a solve attempt produced no plan. All variants are terminal for
/// the attempt; the caller decides whether to re-offer a solve after the
/// inputs change.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error(transparent)]
    Build(#[from] BuildError),
    /// No assignment satisfies every demand within the supply and
    /// capacity caps.
    #[error("no feasible plan satisfies every demand")]
    Infeasible,
    #[error("the plan cost can be driven down without limit")]
    Unbounded,
    #[error("the LP backend failed")]
    Solver,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OreShipmentRow {
    pub mine: String,
    pub plant: String,
    pub tons: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRow {
    pub plant: String,
    pub grade: String,
    pub tons: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRow {
    pub plant: String,
    pub country: String,
    pub grade: String,
    pub tons: f64,
}

/// Tabular view of an optimal plan: total cost plus the three tables,
/// filtered to strictly positive tonnages, in snapshot iteration order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub total_cost: f64,
    pub ore_shipments: Vec<OreShipmentRow>,
    pub production: Vec<ProductionRow>,
    pub distribution: Vec<DistributionRow>,
}

/// Read a solved assignment back into tables.
///
/// Non-optimal statuses yield an error and no tables; no partial results
/// are ever returned.
pub fn project(formulation: &Formulation, solution: &Solution) -> Result<SolveReport, SolveError> {
    match solution.status {
        SolutionStatus::Optimal => {}
        SolutionStatus::Infeasible => return Err(SolveError::Infeasible),
        SolutionStatus::Unbounded => return Err(SolveError::Unbounded),
        SolutionStatus::Error => return Err(SolveError::Solver),
    }

    let ore_shipments = formulation
        .ore
        .iter()
        .map(|((mine, plant), var)| OreShipmentRow {
            mine: mine.clone(),
            plant: plant.clone(),
            tons: solution.value(*var),
        })
        .filter(|row| row.tons > TONNAGE_TOLERANCE)
        .collect();

    let production = formulation
        .production
        .iter()
        .map(|((plant, grade), var)| ProductionRow {
            plant: plant.clone(),
            grade: grade.clone(),
            tons: solution.value(*var),
        })
        .filter(|row| row.tons > TONNAGE_TOLERANCE)
        .collect();

    let distribution = formulation
        .distribution
        .iter()
        .map(|((plant, country, grade), var)| DistributionRow {
            plant: plant.clone(),
            country: country.clone(),
            grade: grade.clone(),
            tons: solution.value(*var),
        })
        .filter(|row| row.tons > TONNAGE_TOLERANCE)
        .collect();

    Ok(SolveReport {
        total_cost: solution.objective_value,
        ore_shipments,
        production,
        distribution,
    })
}

/// Formulate, solve, and project one snapshot. Blocks until the backend
/// returns; one attempt, no retries.
pub fn solve(store: &EntityStore) -> Result<SolveReport, SolveError> {
    let formulation = formulate(store)?;
    let solution = Solver::new().solve(&formulation.problem);
    project(&formulation, &solution)
}
