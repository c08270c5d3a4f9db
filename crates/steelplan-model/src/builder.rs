use indexmap::IndexMap;
use steelplan_solver::{ConstraintOp, LpProblem, VarId};
use thiserror::Error;

use crate::store::EntityStore;

#[derive(Error, Debug)]
pub enum BuildError {
    /// The grade's blend parts sum to zero, so the per-type share is undefined.
    #[error("steel grade `{0}` has no positive blend parts")]
    EmptyBlend(String),
}

/// A complete LP formulation for one store snapshot, with the identity
/// maps needed to read the solved assignment back out.
#[derive(Debug, Clone)]
pub struct Formulation {
    pub problem: LpProblem,
    /// (mine, plant) -> ore tonnage variable
    pub ore: IndexMap<(String, String), VarId>,
    /// (plant, grade) -> finished-steel tonnage variable
    pub production: IndexMap<(String, String), VarId>,
    /// (plant, country, grade) -> shipped tonnage variable
    pub distribution: IndexMap<(String, String, String), VarId>,
}

/// Translate a store snapshot into an LP formulation.
///
/// Pure: reads the snapshot and holds no state across calls. Only plants
/// currently in the plant collection are iterated, so stale keys left in
/// mine or market cost mappings are ignored; a mapping that lacks an
/// entry for a live plant (or grade) contributes a zero cost.
pub fn formulate(store: &EntityStore) -> Result<Formulation, BuildError> {
    for (grade, blend) in store.grades() {
        if blend.total_parts() <= 0.0 {
            return Err(BuildError::EmptyBlend(grade.clone()));
        }
    }

    let mut problem = LpProblem::new();
    let mut ore = IndexMap::new();
    let mut production = IndexMap::new();
    let mut distribution = IndexMap::new();

    // ore(m, p): purchase plus inbound freight
    for (mine_name, mine) in store.mines() {
        for plant_name in store.plants().keys() {
            let freight = mine.ship_cost.get(plant_name).copied().unwrap_or(0.0);
            let var = problem.add_variable(
                format!("ore({mine_name},{plant_name})"),
                mine.purchase_cost + freight,
            );
            ore.insert((mine_name.clone(), plant_name.clone()), var);
        }
    }

    // production(p, g): per-grade processing
    for (plant_name, plant) in store.plants() {
        for grade in store.grades().keys() {
            let processing = plant.process_cost.get(grade).copied().unwrap_or(0.0);
            let var = problem.add_variable(format!("production({plant_name},{grade})"), processing);
            production.insert((plant_name.clone(), grade.clone()), var);
        }
    }

    // distribution(p, c, g): outbound freight
    for plant_name in store.plants().keys() {
        for (country_name, country) in store.countries() {
            for grade in store.grades().keys() {
                let tariff = country
                    .ship_cost
                    .get(plant_name)
                    .and_then(|per_grade| per_grade.get(grade))
                    .copied()
                    .unwrap_or(0.0);
                let var = problem.add_variable(
                    format!("distribution({plant_name},{country_name},{grade})"),
                    tariff,
                );
                distribution.insert(
                    (plant_name.clone(), country_name.clone(), grade.clone()),
                    var,
                );
            }
        }
    }

    // each mine can source at most its limit
    for (mine_name, mine) in store.mines() {
        let terms: Vec<(VarId, f64)> = store
            .plants()
            .keys()
            .map(|plant| (ore[&(mine_name.clone(), plant.clone())], 1.0))
            .collect();
        problem.add_constraint(format!("supply({mine_name})"), terms, ConstraintOp::Le, mine.limit);
    }

    // each plant can take in at most its capacity
    for (plant_name, plant) in store.plants() {
        let terms: Vec<(VarId, f64)> = store
            .mines()
            .keys()
            .map(|mine| (ore[&(mine.clone(), plant_name.clone())], 1.0))
            .collect();
        problem.add_constraint(
            format!("intake({plant_name})"),
            terms,
            ConstraintOp::Le,
            plant.capacity,
        );
    }

    // blend availability: the ore of each type delivered to a plant must
    // cover that type's share of every grade produced there. Availability
    // is pooled per grade; the same tonnage is checked against every
    // grade without being decremented.
    for plant_name in store.plants().keys() {
        for (grade, blend) in store.grades() {
            let total = blend.total_parts();
            let made = production[&(plant_name.clone(), grade.clone())];
            for (ore_type, part) in &blend.parts {
                let mut terms: Vec<(VarId, f64)> = store
                    .mines()
                    .iter()
                    .filter(|(_, mine)| mine.ore_type == *ore_type)
                    .map(|(mine, _)| (ore[&(mine.clone(), plant_name.clone())], 1.0))
                    .collect();
                terms.push((made, -(part / total)));
                problem.add_constraint(
                    format!("blend({plant_name},{grade},{ore_type})"),
                    terms,
                    ConstraintOp::Ge,
                    0.0,
                );
            }
        }
    }

    // a plant cannot ship more of a grade than it produced
    for plant_name in store.plants().keys() {
        for grade in store.grades().keys() {
            let mut terms: Vec<(VarId, f64)> = store
                .countries()
                .keys()
                .map(|country| {
                    (
                        distribution[&(plant_name.clone(), country.clone(), grade.clone())],
                        1.0,
                    )
                })
                .collect();
            terms.push((production[&(plant_name.clone(), grade.clone())], -1.0));
            problem.add_constraint(
                format!("balance({plant_name},{grade})"),
                terms,
                ConstraintOp::Le,
                0.0,
            );
        }
    }

    // demand is an exact obligation, missing entries included
    for (country_name, country) in store.countries() {
        for grade in store.grades().keys() {
            let demand = country.demand.get(grade).copied().unwrap_or(0.0);
            let terms: Vec<(VarId, f64)> = store
                .plants()
                .keys()
                .map(|plant| {
                    (
                        distribution[&(plant.clone(), country_name.clone(), grade.clone())],
                        1.0,
                    )
                })
                .collect();
            problem.add_constraint(
                format!("demand({country_name},{grade})"),
                terms,
                ConstraintOp::Eq,
                demand,
            );
        }
    }

    tracing::debug!(
        variables = problem.num_variables(),
        constraints = problem.num_constraints(),
        "assembled cost model"
    );

    Ok(Formulation {
        problem,
        ore,
        production,
        distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Blend, Country, Mine, Plant, costs};

    #[test]
    fn test_sample_model_shape() {
        let formulation = formulate(&EntityStore::sample()).unwrap();

        // 2 mines x 2 plants, 2 plants x 2 grades, 2 plants x 4 markets x 2 grades
        assert_eq!(formulation.ore.len(), 4);
        assert_eq!(formulation.production.len(), 4);
        assert_eq!(formulation.distribution.len(), 16);
        assert_eq!(formulation.problem.num_variables(), 24);

        // supply 2 + intake 2 + blend 2*2*2 + balance 2*2 + demand 4*2
        assert_eq!(formulation.problem.num_constraints(), 24);
    }

    #[test]
    fn test_zero_part_blend_is_rejected() {
        let mut store = EntityStore::sample();
        store.upsert_grade("hollow", Blend::of([("A", 0.0), ("B", 0.0)]));

        match formulate(&store) {
            Err(BuildError::EmptyBlend(grade)) => assert_eq!(grade, "hollow"),
            Ok(_) => panic!("zero-part blend must not formulate"),
        }
    }

    #[test]
    fn test_stale_plant_references_are_ignored() {
        let mut store = EntityStore::sample();
        store.remove_plant("Youngstown");

        let formulation = formulate(&store).unwrap();

        assert_eq!(formulation.ore.len(), 2);
        assert!(formulation.ore.keys().all(|(_, plant)| plant == "Pittsburgh"));
        // the mine record still mentions the removed plant, harmlessly
        assert!(store.mines()["Butte"].ship_cost.contains_key("Youngstown"));
    }

    #[test]
    fn test_missing_cost_entries_default_to_zero() {
        let mut store = EntityStore::new();
        store.upsert_grade("high", Blend::of([("A", 1.0)]));
        store.upsert_plant(
            "Gary",
            Plant {
                capacity: 100.0,
                process_cost: IndexMap::new(),
            },
        );
        store.upsert_mine(
            "Butte",
            Mine {
                ore_type: "A".to_string(),
                purchase_cost: 50.0,
                ship_cost: IndexMap::new(),
                limit: 100.0,
            },
        );
        store.upsert_country("Canada", Country::default());

        let formulation = formulate(&store).unwrap();

        let ore = formulation.ore[&("Butte".to_string(), "Gary".to_string())];
        assert_eq!(formulation.problem.objective[ore.index()], 50.0);

        let made = formulation.production[&("Gary".to_string(), "high".to_string())];
        assert_eq!(formulation.problem.objective[made.index()], 0.0);

        let shipped = formulation.distribution
            [&("Gary".to_string(), "Canada".to_string(), "high".to_string())];
        assert_eq!(formulation.problem.objective[shipped.index()], 0.0);
    }

    #[test]
    fn test_missing_demand_is_an_exact_zero() {
        let mut store = EntityStore::new();
        store.upsert_grade("high", Blend::of([("A", 1.0)]));
        store.upsert_plant(
            "Gary",
            Plant {
                capacity: 100.0,
                process_cost: costs([("high", 10.0)]),
            },
        );
        store.upsert_country("Canada", Country::default());

        let formulation = formulate(&store).unwrap();

        let demand = formulation
            .problem
            .constraints
            .iter()
            .find(|c| c.name == "demand(Canada,high)")
            .expect("demand row missing");
        assert_eq!(demand.op, ConstraintOp::Eq);
        assert_eq!(demand.rhs, 0.0);
    }

    #[test]
    fn test_blend_shares_divide_by_the_part_total() {
        let mut store = EntityStore::new();
        store.upsert_grade("high", Blend::of([("A", 1.0), ("B", 3.0)]));
        store.upsert_plant(
            "Gary",
            Plant {
                capacity: 100.0,
                process_cost: costs([("high", 10.0)]),
            },
        );
        store.upsert_mine(
            "Butte",
            Mine {
                ore_type: "A".to_string(),
                purchase_cost: 50.0,
                ship_cost: costs([("Gary", 5.0)]),
                limit: 100.0,
            },
        );

        let formulation = formulate(&store).unwrap();

        let made = formulation.production[&("Gary".to_string(), "high".to_string())];
        let row = formulation
            .problem
            .constraints
            .iter()
            .find(|c| c.name == "blend(Gary,high,A)")
            .expect("blend row missing");
        let share = row
            .terms
            .iter()
            .find(|(id, _)| *id == made)
            .map(|(_, coefficient)| *coefficient)
            .expect("production term missing");
        assert!((share - (-0.25)).abs() < 1e-12);
    }
}
