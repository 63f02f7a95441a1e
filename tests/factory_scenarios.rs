//! End-to-end factory scenarios driven directly through the library API.

use std::collections::BTreeMap;

use factoria_optimization::factory::{
    solve, FactoryProblem, FactoryResult, Limits, MachineSpec, RecipeSpec, Target,
};

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

/// A small iron/copper/green-circuit production chain:
/// `iron_plate`, `copper_plate` on furnaces; `green_circuit` on an
/// assembler consuming one of each per craft.
fn green_circuit_chain(iron_ore_cap: f64, copper_ore_cap: f64) -> FactoryProblem {
    FactoryProblem {
        machines: BTreeMap::from([
            ("furnace".to_string(), machine(1.0)),
            ("assembler".to_string(), machine(1.0)),
        ]),
        recipes: BTreeMap::from([
            (
                "iron_plate".to_string(),
                recipe("furnace", 3.2, &[("iron_ore", 1.0)], &[("iron_plate", 1.0)]),
            ),
            (
                "copper_plate".to_string(),
                recipe("furnace", 3.2, &[("copper_ore", 1.0)], &[("copper_plate", 1.0)]),
            ),
            (
                "green_circuit".to_string(),
                recipe(
                    "assembler",
                    0.5,
                    &[("iron_plate", 1.0), ("copper_plate", 1.0)],
                    &[("green_circuit", 1.0)],
                ),
            ),
        ]),
        modules: BTreeMap::new(),
        limits: Limits {
            raw_supply_per_min: BTreeMap::from([
                ("iron_ore".to_string(), iron_ore_cap),
                ("copper_ore".to_string(), copper_ore_cap),
            ]),
            max_machines: BTreeMap::from([
                ("furnace".to_string(), 300.0),
                ("assembler".to_string(), 300.0),
            ]),
        },
        target: Target {
            item: "green_circuit".to_string(),
            rate_per_min: 1800.0,
        },
    }
}

#[test]
fn full_raw_supply_meets_the_target_rate() {
    let problem = green_circuit_chain(5000.0, 5000.0);
    let result = solve(&problem).expect("construction should succeed");

    match result {
        FactoryResult::Ok {
            per_recipe_crafts_per_min,
            per_machine_counts,
            raw_consumption_per_min,
        } => {
            assert!((per_recipe_crafts_per_min["green_circuit"] - 1800.0).abs() < 1e-6);
            assert!((per_recipe_crafts_per_min["iron_plate"] - 1800.0).abs() < 1e-6);
            assert!((per_recipe_crafts_per_min["copper_plate"] - 1800.0).abs() < 1e-6);
            for v in raw_consumption_per_min.values() {
                assert!(*v >= 0.0);
            }
            assert!(per_machine_counts["furnace"] <= 300.0 + 1e-6);
            assert!(per_machine_counts["assembler"] <= 300.0 + 1e-6);
        }
        other => panic!("expected ok, got {other:?}"),
    }
}

#[test]
fn starved_iron_ore_supply_reports_the_bottleneck() {
    let problem = green_circuit_chain(10.0, 5000.0);
    let result = solve(&problem).expect("construction should succeed");

    match result {
        FactoryResult::Infeasible {
            max_feasible_target_per_min,
            bottleneck_hint,
        } => {
            assert!(max_feasible_target_per_min < 1800.0);
            assert!(bottleneck_hint.contains(&"iron_ore supply".to_string()));
        }
        other => panic!("expected infeasible, got {other:?}"),
    }
}

#[test]
fn solving_the_same_problem_twice_is_byte_identical() {
    let problem = green_circuit_chain(5000.0, 5000.0);
    let first = serde_json::to_string(&solve(&problem).unwrap()).unwrap();
    let second = serde_json::to_string(&solve(&problem).unwrap()).unwrap();
    assert_eq!(first, second);
}
