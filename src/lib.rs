//! # factoria-optimization
//!
//! Two production-planning engines sharing one house style:
//!
//! - [`graph`] — a maximum-flow engine (Dinic layered blocking flow) over a
//!   residual graph.
//! - [`lp`] — a dense two-phase simplex linear-programming solver.
//! - [`belts`] — a feasibility/flow solver for a transportation network with
//!   per-edge bounds and per-node throughput caps, built on [`graph`].
//! - [`factory`] — a production-rate planner built on [`lp`]: maximize a
//!   target item's rate, then minimize machines used among optima.
//!
//! Each of `belts` and `factory` exposes a single `solve` entry point driven
//! by the `belts` and `factory` binaries, which read one JSON document from
//! stdin and write one back to stdout.
//!
//! ## Quick Start
//!
//! ```rust
//! use factoria_optimization::lp::{LpProblem, LpStatus};
//!
//! // min x  s.t.  x >= 1  (encoded as -x <= -1)
//! let problem = LpProblem {
//!     c: vec![1.0],
//!     a_eq: vec![],
//!     b_eq: vec![],
//!     a_ub: vec![vec![-1.0]],
//!     b_ub: vec![-1.0],
//! };
//! let solution = factoria_optimization::lp::minimize(&problem).unwrap();
//! assert_eq!(solution.status, LpStatus::Optimal);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod belts;
pub mod factory;
pub mod graph;
pub mod lp;

mod error;

pub use error::{Error, Result};

/// Common imports for consumers embedding both solvers.
pub mod prelude {
    pub use crate::belts::{BeltsProblem, BeltsResult};
    pub use crate::factory::{FactoryProblem, FactoryResult};
    pub use crate::graph::FlowGraph;
    pub use crate::lp::{LpProblem, LpSolution, LpStatus};
    pub use crate::Error;
    pub use crate::Result;
}
