//! Two-phase dense simplex tableau
//!
//! Tableau columns are laid out as `[original vars | slacks for A_ub |
//! artificials for A_eq | artificials for negated A_ub rows | rhs]` in
//! Phase I, and `[original vars | slacks | rhs]` in Phase II. A row (equality
//! or inequality) with a negative RHS is negated before being added, so
//! every artificial starts from a nonnegative basic value; a negated
//! inequality row gets a surplus (its slack column, now with coefficient
//! `-1`) plus its own artificial, the same treatment an equality row always
//! gets. Anti-cycling combines Bland's rule (lowest-index entering column
//! with negative reduced cost) with an ordered tie-break on the leaving row
//! (prefer the row whose current basic variable has the larger index).

use super::{LpProblem, LpSolution, LpStatus};
use crate::error::{Error, Result};
use tracing::debug;

const EPS: f64 = 1e-10;
const ENTERING_EPS: f64 = 1e-12;
const LEAVING_EPS: f64 = 1e-12;
const PHASE1_FEASIBLE_EPS: f64 = 1e-8;
const CLAMP_EPS: f64 = 1e-9;

/// Marks a Phase-II row whose basic variable has not yet been pivoted in
/// (see `bootstrap_pending_rows`).
const PENDING: usize = usize::MAX;

/// Pivot the tableau (including the objective row, if present) on
/// `(row, col)`: scale the pivot row to 1 there, then eliminate the column
/// from every other row.
fn pivot(rows: &mut [Vec<f64>], col: usize, row: usize) {
    let inv = 1.0 / rows[row][col];
    for v in rows[row].iter_mut() {
        *v *= inv;
    }
    let pivot_row = rows[row].clone();
    for (i, r) in rows.iter_mut().enumerate() {
        if i == row {
            continue;
        }
        let factor = r[col];
        if factor.abs() > EPS {
            for (a, b) in r.iter_mut().zip(pivot_row.iter()) {
                *a -= factor * b;
            }
        }
    }
}

/// Zero out the reduced costs of the current basic columns in `obj`.
fn reduce_objective(obj: &mut [f64], rows: &[Vec<f64>], basis: &[usize]) {
    for (i, &bvar) in basis.iter().enumerate() {
        if bvar == PENDING {
            continue;
        }
        let coef = obj[bvar];
        if coef.abs() > EPS {
            for j in 0..obj.len() {
                obj[j] -= coef * rows[i][j];
            }
        }
    }
}

/// A live simplex tableau: constraint rows plus a trailing objective row,
/// and the basic variable currently assigned to each constraint row.
struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
}

impl Tableau {
    fn num_constraint_rows(&self) -> usize {
        self.rows.len() - 1
    }

    fn rhs(&self, row: usize) -> f64 {
        *self.rows[row].last().unwrap()
    }

    /// Smallest-index column with a strictly negative reduced cost
    /// (Bland's rule).
    fn choose_entering(&self) -> Option<usize> {
        let obj = self.rows.last().unwrap();
        (0..obj.len() - 1).find(|&j| obj[j] < -ENTERING_EPS)
    }

    /// Minimum-ratio leaving row for `col`, ties broken toward the row
    /// whose basic variable has the larger index.
    fn choose_leaving(&self, col: usize) -> Option<usize> {
        let mut best_ratio = f64::INFINITY;
        let mut best_row = None;
        for i in 0..self.num_constraint_rows() {
            let a = self.rows[i][col];
            if a <= LEAVING_EPS {
                continue;
            }
            let ratio = self.rhs(i) / a;
            if ratio < -LEAVING_EPS {
                continue;
            }
            let better = match best_row {
                None => true,
                Some(br) => {
                    ratio < best_ratio - LEAVING_EPS
                        || ((ratio - best_ratio).abs() <= LEAVING_EPS && self.basis[i] > self.basis[br])
                }
            };
            if better {
                best_ratio = ratio;
                best_row = Some(i);
            }
        }
        best_row
    }

    fn pivot(&mut self, col: usize, row: usize) {
        pivot(&mut self.rows, col, row);
        self.basis[row] = col;
    }

    /// Run to convergence. Returns `false` if an entering column has no
    /// valid leaving row (unbounded).
    fn run(&mut self) -> bool {
        while let Some(col) = self.choose_entering() {
            match self.choose_leaving(col) {
                Some(row) => self.pivot(col, row),
                None => return false,
            }
        }
        true
    }
}

/// For each Phase-II row without a basic variable (its Phase-I artificial
/// is gone — either an equality row or an inequality row that needed a
/// surplus+artificial pair), pivot in any nonbasic column with a nonzero
/// entry in that row.
fn bootstrap_pending_rows(rows: &mut [Vec<f64>], basis: &mut [usize], num_vars: usize) {
    for i in 0..rows.len() {
        if basis[i] != PENDING {
            continue;
        }
        let taken: Vec<bool> = (0..num_vars)
            .map(|j| basis.contains(&j))
            .collect();
        if let Some(j) = (0..num_vars).find(|&j| !taken[j] && rows[i][j].abs() > 1e-9) {
            pivot(rows, j, i);
            basis[i] = j;
        }
    }
}

/// Solve `min cᵀx  s.t.  A_eq x = b_eq,  A_ub x ≤ b_ub,  x ≥ 0`.
pub fn minimize(problem: &LpProblem) -> Result<LpSolution> {
    let n = problem.num_vars();
    let m_eq = problem.a_eq.len();
    let m_ub = problem.a_ub.len();

    if problem.b_eq.len() != m_eq {
        return Err(Error::dimension_mismatch(m_eq, problem.b_eq.len()));
    }
    if problem.b_ub.len() != m_ub {
        return Err(Error::dimension_mismatch(m_ub, problem.b_ub.len()));
    }
    for row in problem.a_eq.iter().chain(problem.a_ub.iter()) {
        if row.len() != n {
            return Err(Error::dimension_mismatch(n, row.len()));
        }
    }

    debug!(vars = n, eq = m_eq, ub = m_ub, "phase I: driving artificials to zero");

    // An inequality row with a negative RHS has no feasible all-slack
    // starting point (the slack would have to be negative), so it gets
    // negated into a `≥` row and given its own surplus+artificial pair,
    // the same treatment an equality row always gets.
    let ub_negated: Vec<bool> = problem.b_ub.iter().map(|&b| b < 0.0).collect();
    let m_ub_art = ub_negated.iter().filter(|&&neg| neg).count();

    // Phase I: artificials for equalities and negated inequalities, slacks
    // (or surpluses, for negated rows) for every inequality.
    let var_total = n + m_ub + m_eq + m_ub_art;
    let mut rows = Vec::with_capacity(m_eq + m_ub + 1);
    let mut basis = Vec::with_capacity(m_eq + m_ub);

    for i in 0..m_eq {
        let sign = if problem.b_eq[i] < 0.0 { -1.0 } else { 1.0 };
        let mut row = vec![0.0; var_total + 1];
        for (j, &a) in problem.a_eq[i].iter().enumerate() {
            row[j] = a * sign;
        }
        row[n + m_ub + i] = 1.0;
        *row.last_mut().unwrap() = problem.b_eq[i] * sign;
        rows.push(row);
        basis.push(n + m_ub + i);
    }
    let mut ub_art_counter = 0;
    for i in 0..m_ub {
        let sign = if ub_negated[i] { -1.0 } else { 1.0 };
        let mut row = vec![0.0; var_total + 1];
        for (j, &a) in problem.a_ub[i].iter().enumerate() {
            row[j] = a * sign;
        }
        row[n + i] = sign;
        *row.last_mut().unwrap() = problem.b_ub[i] * sign;
        if ub_negated[i] {
            let art_idx = n + m_ub + m_eq + ub_art_counter;
            ub_art_counter += 1;
            row[art_idx] = 1.0;
            rows.push(row);
            basis.push(art_idx);
        } else {
            rows.push(row);
            basis.push(n + i);
        }
    }

    let mut phase1_obj = vec![0.0; var_total + 1];
    phase1_obj[(n + m_ub)..var_total].fill(1.0);
    reduce_objective(&mut phase1_obj, &rows, &basis);
    rows.push(phase1_obj);

    let mut tableau = Tableau { rows, basis };
    if !tableau.run() {
        debug!("phase I unbounded");
        return Ok(LpSolution::unbounded());
    }

    // The objective row is built by subtracting each basic row from a
    // positive-cost row, so its rhs settles at minus the true cost.
    let phase1_cost = -tableau.rhs(tableau.num_constraint_rows());
    if phase1_cost > PHASE1_FEASIBLE_EPS {
        debug!(phase1_cost, "phase I could not zero artificial cost");
        return Ok(LpSolution::infeasible());
    }

    debug!("phase II: optimizing real objective");

    // Phase II: rebuild the tableau without artificials. Rows that relied
    // on an artificial (every equality, and any negated inequality) start
    // with no basic variable and are bootstrapped below.
    let var_total2 = n + m_ub;
    let mut rows2 = Vec::with_capacity(m_eq + m_ub + 1);
    let mut basis2 = Vec::with_capacity(m_eq + m_ub);

    for i in 0..m_eq {
        let sign = if problem.b_eq[i] < 0.0 { -1.0 } else { 1.0 };
        let mut row = vec![0.0; var_total2 + 1];
        for (j, &a) in problem.a_eq[i].iter().enumerate() {
            row[j] = a * sign;
        }
        *row.last_mut().unwrap() = problem.b_eq[i] * sign;
        rows2.push(row);
        basis2.push(PENDING);
    }
    for i in 0..m_ub {
        let sign = if ub_negated[i] { -1.0 } else { 1.0 };
        let mut row = vec![0.0; var_total2 + 1];
        for (j, &a) in problem.a_ub[i].iter().enumerate() {
            row[j] = a * sign;
        }
        row[n + i] = sign;
        *row.last_mut().unwrap() = problem.b_ub[i] * sign;
        rows2.push(row);
        basis2.push(if ub_negated[i] { PENDING } else { n + i });
    }

    bootstrap_pending_rows(&mut rows2, &mut basis2, var_total2);

    let mut obj2 = vec![0.0; var_total2 + 1];
    obj2[..n].copy_from_slice(&problem.c);
    reduce_objective(&mut obj2, &rows2, &basis2);
    rows2.push(obj2);

    let mut tableau2 = Tableau {
        rows: rows2,
        basis: basis2,
    };
    if !tableau2.run() {
        debug!("phase II unbounded");
        return Ok(LpSolution::unbounded());
    }

    let mut x = vec![0.0; var_total2];
    for row in 0..tableau2.num_constraint_rows() {
        let bvar = tableau2.basis[row];
        if bvar != PENDING && bvar < var_total2 {
            x[bvar] = tableau2.rhs(row);
        }
    }
    for v in x.iter_mut() {
        if *v < 0.0 && *v > -CLAMP_EPS {
            *v = 0.0;
        }
    }
    let objective = -tableau2.rhs(tableau2.num_constraint_rows());
    x.truncate(n);

    Ok(LpSolution {
        status: LpStatus::Optimal,
        x,
        objective,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lp(c: Vec<f64>, a_eq: Vec<Vec<f64>>, b_eq: Vec<f64>, a_ub: Vec<Vec<f64>>, b_ub: Vec<f64>) -> LpProblem {
        LpProblem { c, a_eq, b_eq, a_ub, b_ub }
    }

    #[test]
    fn trivial_lower_bound() {
        // min x s.t. -x <= -1  (i.e. x >= 1)
        let problem = lp(vec![1.0], vec![], vec![], vec![vec![-1.0]], vec![-1.0]);
        let sol = minimize(&problem).unwrap();
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!((sol.x[0] - 1.0).abs() < 1e-9);
        assert!((sol.objective - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unbounded_guard() {
        // min -x, no constraints at all.
        let problem = lp(vec![-1.0], vec![], vec![], vec![], vec![]);
        let sol = minimize(&problem).unwrap();
        assert_eq!(sol.status, LpStatus::Unbounded);
    }

    #[test]
    fn infeasible_region() {
        // x >= 2 and x <= 1 simultaneously.
        let problem = lp(
            vec![0.0],
            vec![],
            vec![],
            vec![vec![-1.0], vec![1.0]],
            vec![-2.0, 1.0],
        );
        let sol = minimize(&problem).unwrap();
        assert_eq!(sol.status, LpStatus::Infeasible);
    }

    #[test]
    fn equality_constraint_is_respected() {
        // min x + y s.t. x + y = 5, x,y >= 0
        let problem = lp(vec![1.0, 1.0], vec![vec![1.0, 1.0]], vec![5.0], vec![], vec![]);
        let sol = minimize(&problem).unwrap();
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!((sol.x[0] + sol.x[1] - 5.0).abs() < 1e-9);
        assert!((sol.objective - 5.0).abs() < 1e-9);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let problem = lp(vec![1.0, 1.0], vec![vec![1.0]], vec![1.0], vec![], vec![]);
        assert!(minimize(&problem).is_err());
    }

    #[test]
    fn deterministic_across_repeated_solves() {
        let problem = lp(
            vec![2.0, 3.0, 1.0],
            vec![vec![1.0, 1.0, 1.0]],
            vec![10.0],
            vec![vec![1.0, 0.0, 0.0]],
            vec![4.0],
        );
        let first = minimize(&problem).unwrap();
        let second = minimize(&problem).unwrap();
        assert_eq!(first.x, second.x);
        assert_eq!(first.objective, second.objective);
    }
}
