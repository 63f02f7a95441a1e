//! Two-pass LP invocation: maximize the achievable target fraction, then
//! minimize total machines used while pinning that fraction to 1.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::lp::{self, LpStatus};

use super::model::{self, Model, DEGENERATE_EFF_SURROGATE};
use super::{FactoryProblem, FactoryResult};

const BOTTLENECK_TOL: f64 = 1e-7;
const Y_FEASIBLE_TOL: f64 = 1e-9;
const TIE_BREAK_EPS: f64 = 1e-12;

fn inv_eff(rate: f64) -> f64 {
    1.0 / if rate > 0.0 { rate } else { DEGENERATE_EFF_SURROGATE }
}

pub fn solve(problem: &FactoryProblem) -> Result<FactoryResult> {
    let model = model::build(problem)?;
    let nvars = model.problem.c.len();

    debug!("factory pass 1: maximizing achievable target fraction");
    let mut pass1 = model.problem.clone();
    pass1.c = vec![0.0; nvars];
    pass1.c[model.y_idx] = -1.0;
    let sol1 = lp::minimize(&pass1)?;

    if sol1.status != LpStatus::Optimal {
        warn!("factory pass 1 LP did not reach optimality");
        return Ok(FactoryResult::Infeasible {
            max_feasible_target_per_min: 0.0,
            bottleneck_hint: vec!["LP failed".to_string()],
        });
    }

    let y = sol1.x[model.y_idx];
    if y < 1.0 - Y_FEASIBLE_TOL {
        debug!(y, "target rate not fully achievable");
        let hints = bottleneck_hints(problem, &model, &sol1.x);
        return Ok(FactoryResult::Infeasible {
            max_feasible_target_per_min: y * problem.target.rate_per_min,
            bottleneck_hint: hints,
        });
    }

    debug!("factory pass 2: minimizing total machines at y = 1");
    let mut pass2 = model.problem.clone();
    let mut y_upper = vec![0.0; nvars];
    y_upper[model.y_idx] = 1.0;
    let mut y_lower = vec![0.0; nvars];
    y_lower[model.y_idx] = -1.0;
    pass2.a_ub.push(y_upper);
    pass2.b_ub.push(1.0);
    pass2.a_ub.push(y_lower);
    pass2.b_ub.push(-1.0);

    let mut min_machines_obj = vec![0.0; nvars];
    for (idx, rname) in model.rnames.iter().enumerate() {
        min_machines_obj[idx] = inv_eff(model.eff[rname]) + TIE_BREAK_EPS * (idx as f64 + 1.0);
    }
    pass2.c = min_machines_obj;

    let sol2 = lp::minimize(&pass2)?;
    let x = if sol2.status == LpStatus::Optimal {
        sol2.x
    } else {
        warn!("factory pass 2 LP did not reach optimality, falling back to the pass 1 plan");
        sol1.x
    };

    Ok(build_ok_result(problem, &model, &x))
}

fn bottleneck_hints(problem: &FactoryProblem, model: &Model, x: &[f64]) -> Vec<String> {
    let mut used_by_machine: BTreeMap<&str, f64> = BTreeMap::new();
    for (i, rname) in model.rnames.iter().enumerate() {
        let r = &problem.recipes[rname];
        *used_by_machine.entry(r.machine.as_str()).or_insert(0.0) += x[i] * inv_eff(model.eff[rname]);
    }

    let mut hints = Vec::new();
    for (m, &cap) in &problem.limits.max_machines {
        let used = used_by_machine.get(m.as_str()).copied().unwrap_or(0.0);
        if used >= cap - BOTTLENECK_TOL {
            hints.push(format!("{m} cap"));
        }
    }
    for (j, item) in model.raw_list.iter().enumerate() {
        if let Some(&cap) = problem.limits.raw_supply_per_min.get(item) {
            let c_i = x[model.rnames.len() + j];
            if c_i >= cap - BOTTLENECK_TOL {
                hints.push(format!("{item} supply"));
            }
        }
    }
    hints.sort();
    hints.dedup();
    hints
}

fn build_ok_result(problem: &FactoryProblem, model: &Model, x: &[f64]) -> FactoryResult {
    let mut per_recipe = BTreeMap::new();
    let mut per_machine: BTreeMap<String, f64> = BTreeMap::new();
    for (i, rname) in model.rnames.iter().enumerate() {
        per_recipe.insert(rname.clone(), x[i]);
        let r = &problem.recipes[rname];
        *per_machine.entry(r.machine.clone()).or_insert(0.0) += x[i] * inv_eff(model.eff[rname]);
    }

    let mut raw_consumption = BTreeMap::new();
    for (j, item) in model.raw_list.iter().enumerate() {
        raw_consumption.insert(item.clone(), x[model.rnames.len() + j]);
    }

    FactoryResult::Ok {
        per_recipe_crafts_per_min: per_recipe,
        per_machine_counts: per_machine,
        raw_consumption_per_min: raw_consumption,
    }
}
