//! Feasible/infeasible result reconstruction from a solved residual graph.

use tracing::warn;

use super::model::{BuildOutcome, GraphBuild};
use super::{BeltsProblem, BeltsResult, Deficit, FlowEntry, TightEdge};

/// Slack allowed between achieved max-flow and total positive demand before
/// an instance is declared infeasible.
const FEASIBILITY_TOL: f64 = 1e-6;

pub fn reconstruct(problem: &BeltsProblem, outcome: BuildOutcome) -> BeltsResult {
    let mut built = match outcome {
        BuildOutcome::TriviallyInfeasible => {
            return BeltsResult::Infeasible {
                cut_reachable: Vec::new(),
                deficit: Deficit {
                    demand_balance: 0.0,
                    tight_nodes: Vec::new(),
                    tight_edges: Vec::new(),
                },
            };
        }
        BuildOutcome::Graph(g) => g,
    };

    let flow = built.graph.maxflow(built.s_star, built.t_star);
    if flow + FEASIBILITY_TOL < built.total_pos {
        warn!(flow, total_pos = built.total_pos, "belts instance is infeasible");
        return infeasible_report(&built, flow);
    }

    let flows = feasible_flows(problem, &built);
    let max_flow_per_min: f64 = problem.sources.values().sum();

    BeltsResult::Ok {
        max_flow_per_min,
        flows,
    }
}

fn infeasible_report(built: &GraphBuild, flow: f64) -> BeltsResult {
    let reach = built.graph.reachable_from(built.s_star);

    let mut cut_reachable: Vec<String> = built
        .names
        .iter()
        .enumerate()
        .filter(|&(i, _)| reach[i])
        .map(|(_, name)| name.clone())
        .collect();
    cut_reachable.sort();

    let tight_edges = built
        .edgelist
        .iter()
        .filter(|e| reach[e.u] && !reach[e.v] && built.graph.residual(e.arc) <= 1e-9)
        .map(|e| TightEdge {
            from: built.names[e.u].clone(),
            to: built.names[e.v].clone(),
            flow_needed: 0,
        })
        .collect();

    BeltsResult::Infeasible {
        cut_reachable,
        deficit: Deficit {
            demand_balance: built.total_pos - flow,
            tight_nodes: Vec::new(),
            tight_edges,
        },
    }
}

fn feasible_flows(_problem: &BeltsProblem, built: &GraphBuild) -> Vec<FlowEntry> {
    built
        .edgelist
        .iter()
        .filter(|e| e.from_input_edge)
        .map(|e| {
            let sent = (e.hi - e.lo) - built.graph.residual(e.arc);
            let flow = (e.lo + sent).max(0.0);
            FlowEntry {
                from: demangle(&built.names[e.u]),
                to: demangle(&built.names[e.v]),
                flow,
            }
        })
        .collect()
}

fn demangle(name: &str) -> String {
    name.strip_suffix("#out")
        .or_else(|| name.strip_suffix("#in"))
        .unwrap_or(name)
        .to_string()
}
