//! Factory: a linear-programming planner that finds recipe execution rates
//! achieving (or maximizing) a target item's production rate subject to raw
//! supply and machine-count caps, then minimizes total machines among those
//! optima.
//!
//! [`solve`] builds the LP model (see [`model`]) and runs the two-pass
//! simplex invocation (see [`solver`]).

mod model;
mod solver;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct MachineSpec {
    pub crafts_per_min: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeSpec {
    pub machine: String,
    pub time_s: f64,
    #[serde(default)]
    pub r#in: BTreeMap<String, f64>,
    #[serde(default)]
    pub out: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleSpec {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub prod: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Limits {
    #[serde(default)]
    pub raw_supply_per_min: BTreeMap<String, f64>,
    #[serde(default)]
    pub max_machines: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    pub item: String,
    pub rate_per_min: f64,
}

/// A factory problem as read from the input document.
#[derive(Debug, Clone, Deserialize)]
pub struct FactoryProblem {
    pub machines: BTreeMap<String, MachineSpec>,
    pub recipes: BTreeMap<String, RecipeSpec>,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleSpec>,
    #[serde(default)]
    pub limits: Limits,
    pub target: Target,
}

/// Outcome of solving a [`FactoryProblem`]. Maps are emitted in lexicographic
/// key order by virtue of being `BTreeMap`s.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum FactoryResult {
    #[serde(rename = "ok")]
    Ok {
        per_recipe_crafts_per_min: BTreeMap<String, f64>,
        per_machine_counts: BTreeMap<String, f64>,
        raw_consumption_per_min: BTreeMap<String, f64>,
    },
    #[serde(rename = "infeasible")]
    Infeasible {
        max_feasible_target_per_min: f64,
        bottleneck_hint: Vec<String>,
    },
}

/// Solve a factory problem: build the LP model, run the two-pass simplex
/// invocation, and report the resulting plan or bottleneck diagnosis.
pub fn solve(problem: &FactoryProblem) -> Result<FactoryResult> {
    info!(
        recipes = problem.recipes.len(),
        machines = problem.machines.len(),
        target = %problem.target.item,
        "solving factory problem"
    );
    solver::solve(problem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(crafts_per_min: f64) -> MachineSpec {
        MachineSpec { crafts_per_min }
    }

    fn recipe(machine: &str, time_s: f64, inputs: &[(&str, f64)], outputs: &[(&str, f64)]) -> RecipeSpec {
        RecipeSpec {
            machine: machine.to_string(),
            time_s,
            r#in: inputs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            out: outputs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn single_recipe_chain_hits_target_rate() {
        let problem = FactoryProblem {
            machines: BTreeMap::from([("smelter".to_string(), machine(1.0))]),
            recipes: BTreeMap::from([(
                "smelt_plate".to_string(),
                recipe("smelter", 1.0, &[("ore", 1.0)], &[("plate", 1.0)]),
            )]),
            modules: BTreeMap::new(),
            limits: Limits {
                raw_supply_per_min: BTreeMap::from([("ore".to_string(), 1000.0)]),
                max_machines: BTreeMap::from([("smelter".to_string(), 1000.0)]),
            },
            target: Target {
                item: "plate".to_string(),
                rate_per_min: 60.0,
            },
        };

        let result = solve(&problem).unwrap();
        match result {
            FactoryResult::Ok {
                per_recipe_crafts_per_min,
                raw_consumption_per_min,
                ..
            } => {
                assert!((per_recipe_crafts_per_min["smelt_plate"] - 60.0).abs() < 1e-6);
                assert!((raw_consumption_per_min["ore"] - 60.0).abs() < 1e-6);
            }
            other => panic!("expected ok, got {other:?}"),
        }
    }

    #[test]
    fn starved_raw_supply_is_reported_as_bottleneck() {
        let problem = FactoryProblem {
            machines: BTreeMap::from([("smelter".to_string(), machine(1.0))]),
            recipes: BTreeMap::from([(
                "smelt_plate".to_string(),
                recipe("smelter", 1.0, &[("ore", 1.0)], &[("plate", 1.0)]),
            )]),
            modules: BTreeMap::new(),
            limits: Limits {
                raw_supply_per_min: BTreeMap::from([("ore".to_string(), 10.0)]),
                max_machines: BTreeMap::new(),
            },
            target: Target {
                item: "plate".to_string(),
                rate_per_min: 60.0,
            },
        };

        let result = solve(&problem).unwrap();
        match result {
            FactoryResult::Infeasible { bottleneck_hint, .. } => {
                assert!(bottleneck_hint.contains(&"ore supply".to_string()));
            }
            other => panic!("expected infeasible, got {other:?}"),
        }
    }
}
