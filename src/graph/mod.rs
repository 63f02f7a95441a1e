//! Maximum-flow engine
//!
//! [`flow::FlowGraph`] is the single numeric engine shared by the belts
//! pipeline: a residual graph solved with Dinic's layered blocking-flow
//! algorithm. See [`flow`] for the implementation.

pub mod flow;

pub use flow::FlowGraph;
