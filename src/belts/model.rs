//! Node splitting, lower-bound reduction, and super-source/super-sink
//! construction for a belts problem.
//!
//! Builds a residual graph of `N + 2` vertices (the original/split node set
//! plus `S*` and `T*`) ready for a single [`crate::graph::FlowGraph::maxflow`]
//! call. `S*`/`T*` are always the last two vertex indices.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::graph::flow::{FlowGraph, INF_CAPACITY};

use super::BeltsProblem;

/// A transformed arc together with its bounds and whether it came from an
/// actual input edge (as opposed to a synthetic node-split arc) — only
/// input-edge arcs are eligible for the feasible-flow report.
pub struct RecordedEdge {
    pub u: usize,
    pub v: usize,
    pub lo: f64,
    pub hi: f64,
    pub arc: usize,
    pub from_input_edge: bool,
}

/// A fully constructed residual graph plus enough bookkeeping to reconstruct
/// either a feasible flow report or an infeasibility witness.
pub struct GraphBuild {
    pub graph: FlowGraph,
    pub s_star: usize,
    pub t_star: usize,
    pub total_pos: f64,
    pub names: Vec<String>,
    pub edgelist: Vec<RecordedEdge>,
}

pub enum BuildOutcome {
    /// A transformed arc had `hi < lo`: immediately infeasible, no cut to report.
    TriviallyInfeasible,
    Graph(GraphBuild),
}

/// Maps node names to dense indices, growing as split/edge-local names
/// (`v#in`, `v#out`) are interned.
struct NodeIndex {
    names: Vec<String>,
    index: BTreeMap<String, usize>,
}

impl NodeIndex {
    fn new(nodes: &[String]) -> Self {
        let mut index = BTreeMap::new();
        for (i, n) in nodes.iter().enumerate() {
            index.insert(n.clone(), i);
        }
        Self {
            names: nodes.to_vec(),
            index,
        }
    }

    fn get(&self, name: &str) -> usize {
        *self
            .index
            .get(name)
            .expect("node must be interned before lookup")
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), i);
        i
    }
}

fn validate_identifiers(problem: &BeltsProblem) -> Result<()> {
    if problem.nodes.is_empty() {
        return Err(Error::invalid_input("belts problem has no nodes"));
    }
    let declared: std::collections::BTreeSet<&str> =
        problem.nodes.iter().map(String::as_str).collect();
    if !declared.contains(problem.sink.as_str()) {
        return Err(Error::unknown_identifier(problem.sink.clone()));
    }
    for name in problem.sources.keys().chain(problem.node_caps.keys()) {
        if !declared.contains(name.as_str()) {
            return Err(Error::unknown_identifier(name.clone()));
        }
    }
    for e in &problem.edges {
        if !declared.contains(e.from.as_str()) {
            return Err(Error::unknown_identifier(e.from.clone()));
        }
        if !declared.contains(e.to.as_str()) {
            return Err(Error::unknown_identifier(e.to.clone()));
        }
    }
    Ok(())
}

pub fn build(problem: &BeltsProblem) -> Result<BuildOutcome> {
    validate_identifiers(problem)?;

    let mut nodes = NodeIndex::new(&problem.nodes);

    let mut split_in: BTreeMap<String, usize> = BTreeMap::new();
    let mut split_out: BTreeMap<String, usize> = BTreeMap::new();
    let mut transformed: Vec<(String, String, f64, f64, bool)> = Vec::new();

    for (v, &cap) in &problem.node_caps {
        if *v == problem.sink || problem.sources.contains_key(v) {
            continue;
        }
        let vin = format!("{v}#in");
        let vout = format!("{v}#out");
        let vin_idx = nodes.intern(&vin);
        let vout_idx = nodes.intern(&vout);
        split_in.insert(v.clone(), vin_idx);
        split_out.insert(v.clone(), vout_idx);
        transformed.push((vin, vout, 0.0, cap, false));
    }

    for e in &problem.edges {
        let u2 = if split_out.contains_key(&e.from) {
            format!("{}#out", e.from)
        } else {
            e.from.clone()
        };
        let v2 = if split_in.contains_key(&e.to) {
            format!("{}#in", e.to)
        } else {
            e.to.clone()
        };
        nodes.intern(&u2);
        nodes.intern(&v2);
        transformed.push((u2, v2, e.lo, e.hi, true));
    }

    let n = nodes.names.len();
    let s_star = n;
    let t_star = n + 1;
    let mut graph = FlowGraph::new(n + 2);

    let mut demand = vec![0.0; n];
    let mut edgelist = Vec::with_capacity(transformed.len());
    for (u, v, lo, hi, from_input_edge) in transformed {
        let ui = nodes.get(&u);
        let vi = nodes.get(&v);
        let cap = hi - lo;
        if cap < -1e-9 {
            return Ok(BuildOutcome::TriviallyInfeasible);
        }
        let arc = graph.add_edge(ui, vi, cap.max(0.0));
        demand[ui] -= lo;
        demand[vi] += lo;
        edgelist.push(RecordedEdge {
            u: ui,
            v: vi,
            lo,
            hi,
            arc,
            from_input_edge,
        });
    }

    // Circulation closure: sink flows back to each source, uncapacitated.
    let sink_node = if split_in.contains_key(&problem.sink) {
        format!("{}#in", problem.sink)
    } else {
        problem.sink.clone()
    };
    let sink_idx = nodes.get(&sink_node);
    for sname in problem.sources.keys() {
        let s_idx = nodes.get(&source_node_name(sname, &split_out));
        graph.add_edge(sink_idx, s_idx, INF_CAPACITY);
    }

    let mut total_supply = 0.0;
    for (sname, &supply) in &problem.sources {
        let s_idx = nodes.get(&source_node_name(sname, &split_out));
        demand[s_idx] -= supply;
        total_supply += supply;
    }
    demand[sink_idx] += total_supply;

    let mut total_pos = 0.0;
    for (i, &d) in demand.iter().enumerate() {
        if d > 1e-9 {
            graph.add_edge(s_star, i, d);
            total_pos += d;
        } else if d < -1e-9 {
            graph.add_edge(i, t_star, -d);
        }
    }

    Ok(BuildOutcome::Graph(GraphBuild {
        graph,
        s_star,
        t_star,
        total_pos,
        names: nodes.names,
        edgelist,
    }))
}

fn source_node_name(sname: &str, split_out: &BTreeMap<String, usize>) -> String {
    if split_out.contains_key(sname) {
        format!("{sname}#out")
    } else {
        sname.to_string()
    }
}
