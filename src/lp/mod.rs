//! Dense two-phase simplex linear-programming solver
//!
//! Solves `min cᵀx  s.t.  A_eq x = b_eq,  A_ub x ≤ b_ub,  x ≥ 0` for small
//! to medium dense problems, with Bland's rule and an ordered leaving-row
//! tie-break for anti-cycling (see [`solver`]). This is the numeric engine
//! the [`crate::factory`] modeling layer is built on.

mod solver;

pub use solver::minimize;

/// Outcome of a simplex solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    /// A basic feasible optimum was found.
    Optimal,
    /// The feasible region is empty.
    Infeasible,
    /// The objective is unbounded below over the feasible region.
    Unbounded,
}

/// A linear program in mixed equality/inequality standard form.
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Objective coefficients, one per variable.
    pub c: Vec<f64>,
    /// Equality constraint rows, `A_eq x = b_eq`.
    pub a_eq: Vec<Vec<f64>>,
    /// Equality right-hand sides.
    pub b_eq: Vec<f64>,
    /// Inequality constraint rows, `A_ub x <= b_ub`.
    pub a_ub: Vec<Vec<f64>>,
    /// Inequality right-hand sides.
    pub b_ub: Vec<f64>,
}

impl LpProblem {
    /// Number of decision variables.
    pub fn num_vars(&self) -> usize {
        self.c.len()
    }
}

/// Result of solving an [`LpProblem`].
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// Solve status.
    pub status: LpStatus,
    /// Variable assignment, valid only when `status == Optimal`. Empty
    /// otherwise.
    pub x: Vec<f64>,
    /// Objective value, valid only when `status == Optimal`.
    pub objective: f64,
}

impl LpSolution {
    fn infeasible() -> Self {
        Self {
            status: LpStatus::Infeasible,
            x: Vec::new(),
            objective: 0.0,
        }
    }

    fn unbounded() -> Self {
        Self {
            status: LpStatus::Unbounded,
            x: Vec::new(),
            objective: 0.0,
        }
    }
}
