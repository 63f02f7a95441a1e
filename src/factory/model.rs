//! Effective-rate computation, item classification, and constraint-matrix
//! construction for the factory LP.
//!
//! Produces an [`LpProblem`] in the variable layout `[x_r for each recipe |
//! c_i for each raw item | y]`, matching the balance equations and capacity
//! inequalities described by the modeling layer.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::lp::LpProblem;

use super::FactoryProblem;

/// Crafts/min a machine would need to achieve the impossible; substituted
/// for `eff[r] == 0` so `1 / eff` never produces infinity or NaN.
pub const DEGENERATE_EFF_SURROGATE: f64 = 1e30;

/// A built LP plus the bookkeeping needed to interpret its solution back
/// into recipe rates, raw consumption, and machine counts.
pub struct Model {
    pub rnames: Vec<String>,
    pub raw_list: Vec<String>,
    pub y_idx: usize,
    pub eff: BTreeMap<String, f64>,
    pub problem: LpProblem,
}

fn effective_rates(problem: &FactoryProblem) -> Result<BTreeMap<String, f64>> {
    let mut eff = BTreeMap::new();
    for (rname, r) in &problem.recipes {
        let machine = problem
            .machines
            .get(&r.machine)
            .ok_or_else(|| Error::unknown_identifier(r.machine.clone()))?;
        if r.time_s <= 0.0 {
            return Err(Error::invalid_input(format!(
                "recipe {rname} has non-positive time_s"
            )));
        }
        let speed = problem.modules.get(&r.machine).map(|m| m.speed).unwrap_or(0.0);
        let rate = machine.crafts_per_min * (1.0 + speed) * 60.0 / r.time_s;
        eff.insert(rname.clone(), rate);
    }
    Ok(eff)
}

/// Raw items (consumed, never produced) and intermediates (everything else
/// that appears in a recipe, including the target).
fn classify_items(problem: &FactoryProblem) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut produced = BTreeSet::new();
    let mut consumed = BTreeSet::new();
    for r in problem.recipes.values() {
        produced.extend(r.out.keys().cloned());
        consumed.extend(r.r#in.keys().cloned());
    }
    let all_items: BTreeSet<String> = produced.union(&consumed).cloned().collect();
    let raw: BTreeSet<String> = consumed.difference(&produced).cloned().collect();
    let intermediates: BTreeSet<String> = all_items.difference(&raw).cloned().collect();
    (raw, intermediates)
}

fn prod_multiplier(problem: &FactoryProblem, machine: &str) -> f64 {
    1.0 + problem.modules.get(machine).map(|m| m.prod).unwrap_or(0.0)
}

/// Net per-minute balance of `item` across all recipes' decision variables.
fn balance_row(problem: &FactoryProblem, item: &str, r_index: &BTreeMap<String, usize>, nvars: usize) -> Vec<f64> {
    let mut row = vec![0.0; nvars];
    for (rname, r) in &problem.recipes {
        let i = r_index[rname];
        let prod = prod_multiplier(problem, &r.machine);
        if let Some(&v) = r.out.get(item) {
            row[i] += v * prod;
        }
        if let Some(&v) = r.r#in.get(item) {
            row[i] -= v;
        }
    }
    row
}

fn validate(problem: &FactoryProblem, all_items: &BTreeSet<String>) -> Result<()> {
    if problem.recipes.is_empty() {
        return Err(Error::invalid_input("factory problem has no recipes"));
    }
    for m in problem.limits.max_machines.keys() {
        if !problem.machines.contains_key(m) {
            return Err(Error::unknown_identifier(m.clone()));
        }
    }
    for item in problem.limits.raw_supply_per_min.keys() {
        if !all_items.contains(item) {
            return Err(Error::unknown_identifier(item.clone()));
        }
    }
    if !all_items.contains(&problem.target.item) {
        return Err(Error::unknown_identifier(problem.target.item.clone()));
    }
    Ok(())
}

pub fn build(problem: &FactoryProblem) -> Result<Model> {
    let eff = effective_rates(problem)?;
    let (raw_items, intermediates) = classify_items(problem);
    let all_items: BTreeSet<String> = raw_items.union(&intermediates).cloned().collect();
    validate(problem, &all_items)?;

    let target_item = problem.target.item.clone();
    let target_rate = problem.target.rate_per_min;

    let rnames: Vec<String> = problem.recipes.keys().cloned().collect();
    let raw_list: Vec<String> = raw_items.into_iter().collect();
    let r_index: BTreeMap<String, usize> = rnames.iter().cloned().zip(0..).collect();

    let idx_c_start = rnames.len();
    let idx_c_end = idx_c_start + raw_list.len();
    let y_idx = idx_c_end;
    let nvars = y_idx + 1;

    let mut a_eq = Vec::new();
    let mut b_eq = Vec::new();

    for item in &intermediates {
        if *item == target_item {
            continue;
        }
        a_eq.push(balance_row(problem, item, &r_index, nvars));
        b_eq.push(0.0);
    }

    let mut target_row = balance_row(problem, &target_item, &r_index, nvars);
    target_row[y_idx] = -target_rate;
    a_eq.push(target_row);
    b_eq.push(0.0);

    for (j, item) in raw_list.iter().enumerate() {
        let mut row = balance_row(problem, item, &r_index, nvars);
        row[idx_c_start + j] = 1.0;
        a_eq.push(row);
        b_eq.push(0.0);
    }

    let mut a_ub = Vec::new();
    let mut b_ub = Vec::new();

    for (j, item) in raw_list.iter().enumerate() {
        if let Some(&cap) = problem.limits.raw_supply_per_min.get(item) {
            let mut row = vec![0.0; nvars];
            row[idx_c_start + j] = 1.0;
            a_ub.push(row);
            b_ub.push(cap);
        }
    }

    let mut by_machine: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (rname, r) in &problem.recipes {
        by_machine.entry(r.machine.clone()).or_default().push(rname.clone());
    }
    for (m, rlist) in &by_machine {
        if let Some(&cap) = problem.limits.max_machines.get(m) {
            let mut row = vec![0.0; nvars];
            for rname in rlist {
                let i = r_index[rname];
                let rate = eff[rname];
                row[i] = 1.0 / if rate > 0.0 { rate } else { DEGENERATE_EFF_SURROGATE };
            }
            a_ub.push(row);
            b_ub.push(cap);
        }
    }

    Ok(Model {
        rnames,
        raw_list,
        y_idx,
        eff,
        problem: LpProblem {
            c: vec![0.0; nvars],
            a_eq,
            b_eq,
            a_ub,
            b_ub,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::factory::{FactoryProblem, Limits, MachineSpec, RecipeSpec, Target};

    fn simple_problem() -> FactoryProblem {
        let mut machines = BTreeMap::new();
        machines.insert(
            "smelter".to_string(),
            MachineSpec { crafts_per_min: 1.0 },
        );
        let mut recipes = BTreeMap::new();
        let mut out = BTreeMap::new();
        out.insert("plate".to_string(), 1.0);
        let mut r#in = BTreeMap::new();
        r#in.insert("ore".to_string(), 1.0);
        recipes.insert(
            "smelt_plate".to_string(),
            RecipeSpec {
                machine: "smelter".to_string(),
                time_s: 1.0,
                r#in,
                out,
            },
        );
        FactoryProblem {
            machines,
            recipes,
            modules: BTreeMap::new(),
            limits: Limits::default(),
            target: Target {
                item: "plate".to_string(),
                rate_per_min: 60.0,
            },
        }
    }

    #[test]
    fn classifies_ore_as_raw_and_plate_as_intermediate() {
        let problem = simple_problem();
        let (raw, intermediates) = classify_items(&problem);
        assert!(raw.contains("ore"));
        assert!(intermediates.contains("plate"));
    }

    #[test]
    fn build_produces_one_equation_per_raw_and_target() {
        let problem = simple_problem();
        let model = build(&problem).unwrap();
        // one target-balance row + one raw-balance row for `ore`
        assert_eq!(model.problem.a_eq.len(), 2);
        assert_eq!(model.raw_list, vec!["ore".to_string()]);
    }

    #[test]
    fn unknown_target_item_is_rejected() {
        let mut problem = simple_problem();
        problem.target.item = "does_not_exist".to_string();
        assert!(build(&problem).is_err());
    }
}
