//! Belts: a feasibility-and-flow solver over a directed transportation graph
//! with per-edge lower/upper bounds and per-node throughput caps.
//!
//! [`solve`] is the single public entry point: it validates the problem,
//! builds the lower-bound-reduced residual graph (see [`model`]), runs
//! [`crate::graph::FlowGraph::maxflow`] from the super-source to the
//! super-sink, and reconstructs either a feasible flow assignment or an
//! infeasibility witness (see [`reconstruct`]).

mod model;
mod reconstruct;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// One directed edge with a flow range `[lo, hi]`.
#[derive(Debug, Clone, Deserialize)]
pub struct BeltsEdge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub lo: f64,
    pub hi: f64,
}

/// A belts problem as read from the input document.
#[derive(Debug, Clone, Deserialize)]
pub struct BeltsProblem {
    pub nodes: Vec<String>,
    pub sink: String,
    pub sources: BTreeMap<String, f64>,
    #[serde(default)]
    pub node_caps: BTreeMap<String, f64>,
    pub edges: Vec<BeltsEdge>,
}

/// A single reported edge flow.
#[derive(Debug, Clone, Serialize)]
pub struct FlowEntry {
    pub from: String,
    pub to: String,
    pub flow: f64,
}

/// A transformed arc crossing the infeasibility cut. `flow_needed` is an
/// informational placeholder, always `0`.
#[derive(Debug, Clone, Serialize)]
pub struct TightEdge {
    pub from: String,
    pub to: String,
    pub flow_needed: u32,
}

/// Witness data accompanying an infeasible result.
#[derive(Debug, Clone, Serialize)]
pub struct Deficit {
    pub demand_balance: f64,
    pub tight_nodes: Vec<String>,
    pub tight_edges: Vec<TightEdge>,
}

/// Outcome of solving a [`BeltsProblem`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum BeltsResult {
    #[serde(rename = "ok")]
    Ok {
        max_flow_per_min: f64,
        flows: Vec<FlowEntry>,
    },
    #[serde(rename = "infeasible")]
    Infeasible {
        cut_reachable: Vec<String>,
        deficit: Deficit,
    },
}

/// Solve a belts problem: validate, build the residual graph, run max-flow,
/// and reconstruct a feasible or infeasible result.
pub fn solve(problem: &BeltsProblem) -> Result<BeltsResult> {
    info!(
        nodes = problem.nodes.len(),
        edges = problem.edges.len(),
        sources = problem.sources.len(),
        "solving belts problem"
    );
    let outcome = model::build(problem)?;
    Ok(reconstruct::reconstruct(problem, outcome))
}
