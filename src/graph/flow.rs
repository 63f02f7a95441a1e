//! Maximum flow via Dinic's layered blocking-flow algorithm
//!
//! The residual graph is stored as parallel arc arrays `(to, cap, next)`
//! with a per-vertex `head` pointing at the first outgoing arc — a classic
//! adjacency-list-by-index layout. Arcs are always added in forward/reverse
//! pairs at consecutive indices, so the reverse of arc `e` is `e ^ 1`.

use std::collections::VecDeque;

/// Residual capacities at or below this are treated as zero.
const TOL: f64 = 1e-9;

/// Surrogate for an uncapacitated arc (reverse arcs of circulation edges).
pub const INF_CAPACITY: f64 = 1e30;

/// A directed multigraph with per-arc capacity, solved via Dinic's algorithm.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    num_nodes: usize,
    head: Vec<Option<usize>>,
    to: Vec<usize>,
    cap: Vec<f64>,
    next: Vec<Option<usize>>,
}

impl FlowGraph {
    /// Create a graph with `num_nodes` vertices and no arcs.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            head: vec![None; num_nodes],
            to: Vec::new(),
            cap: Vec::new(),
            next: Vec::new(),
        }
    }

    /// Number of vertices in the graph.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Append a forward arc `u -> v` of capacity `cap` and its paired
    /// reverse arc of capacity 0. Returns the index of the forward arc;
    /// the reverse arc is always `forward_index + 1`.
    pub fn add_edge(&mut self, u: usize, v: usize, cap: f64) -> usize {
        let fwd = self.to.len();
        self.to.push(v);
        self.cap.push(cap);
        self.next.push(self.head[u]);
        self.head[u] = Some(fwd);

        self.to.push(u);
        self.cap.push(0.0);
        self.next.push(self.head[v]);
        self.head[v] = Some(fwd + 1);

        fwd
    }

    /// Residual capacity remaining on arc `e`.
    pub fn residual(&self, e: usize) -> f64 {
        self.cap[e]
    }

    /// Reverse arc of `e` (they are always allocated in adjacent pairs).
    fn rev(e: usize) -> usize {
        e ^ 1
    }

    fn bfs_levels(&self, s: usize, t: usize) -> Option<Vec<i32>> {
        let mut level = vec![-1i32; self.num_nodes];
        level[s] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(s);
        while let Some(u) = queue.pop_front() {
            let mut e = self.head[u];
            while let Some(edge) = e {
                if self.cap[edge] > TOL && level[self.to[edge]] < 0 {
                    level[self.to[edge]] = level[u] + 1;
                    queue.push_back(self.to[edge]);
                }
                e = self.next[edge];
            }
        }
        if level[t] >= 0 {
            Some(level)
        } else {
            None
        }
    }

    /// Push up to `bound` units of blocking flow from `u` to `t`, following
    /// only level-respecting arcs, advancing each vertex's current-arc
    /// pointer past exhausted arcs along the way.
    fn dfs_blocking(
        &mut self,
        u: usize,
        t: usize,
        bound: f64,
        level: &[i32],
        current: &mut [Option<usize>],
    ) -> f64 {
        if u == t || bound <= TOL {
            return bound;
        }
        while let Some(e) = current[u] {
            let v = self.to[e];
            if self.cap[e] > TOL && level[v] == level[u] + 1 {
                let pushed = self.dfs_blocking(v, t, bound.min(self.cap[e]), level, current);
                if pushed > TOL {
                    self.cap[e] -= pushed;
                    self.cap[Self::rev(e)] += pushed;
                    return pushed;
                }
            }
            current[u] = self.next[e];
        }
        0.0
    }

    /// Compute the maximum flow from `s` to `t`, leaving the residual graph
    /// in its post-flow state. Runs in successive BFS/blocking-flow phases
    /// until `t` is no longer reachable from `s`.
    pub fn maxflow(&mut self, s: usize, t: usize) -> f64 {
        let mut total = 0.0;
        while let Some(level) = self.bfs_levels(s, t) {
            let mut current = self.head.clone();
            loop {
                let pushed = self.dfs_blocking(s, t, INF_CAPACITY, &level, &mut current);
                if pushed <= TOL {
                    break;
                }
                total += pushed;
            }
        }
        total
    }

    /// Vertices reachable from `s` via arcs with residual capacity above TOL.
    pub fn reachable_from(&self, s: usize) -> Vec<bool> {
        let mut seen = vec![false; self.num_nodes];
        seen[s] = true;
        let mut queue = VecDeque::new();
        queue.push_back(s);
        while let Some(u) = queue.pop_front() {
            let mut e = self.head[u];
            while let Some(edge) = e {
                if self.cap[edge] > TOL && !seen[self.to[edge]] {
                    seen[self.to[edge]] = true;
                    queue.push_back(self.to[edge]);
                }
                e = self.next[edge];
            }
        }
        seen
    }
}
