//! Adapter over MiniSat, through [rustsat](https://docs.rs/rustsat).
//!
//! Both budgets map onto MiniSat's own: the conflict limit onto its conflict budget, the
//! inspection limit onto its propagation budget. MiniSat checks them between two propagation
//! rounds, so a limit of `n` gives up once `n` conflicts (or propagations) have happened.
//!
//! MiniSat does not tell whether a clause made the formula unsatisfiable when it is added.
//! The adapter keeps the unit clauses it saw, and refuses a clause whose literals are all
//! falsified by them.

use ::rustsat::{
    solvers::{GetInternalStats, LimitConflicts, LimitPropagations, Solve, SolverResult},
    types::{Clause as RsClause, Lit as RsLit, TernaryVal, Var as RsVar},
};
use rustsat_minisat::core::Minisat;

use crate::cnf::{ClauseSink, Lit, Var};

use super::{Exhaustion, SatSolver, SearchLimits, SearchOutcome, SolverStats};

fn to_rustsat(lit: Lit) -> RsLit {
    RsVar::new(lit.var().index() - 1).lit(lit.is_negative())
}

fn budget(limit: Option<u64>) -> Option<u32> {
    limit.map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

/// A [`SatSolver`] backed by MiniSat.
///
/// ```rust
/// use satmiter::{cnf::{ClauseSink, Lit, Var}, solver::{MinisatSolver, SatSolver, SearchLimits, SearchOutcome}};
///
/// let mut solver = MinisatSolver::new();
/// assert!(solver.add_clause(&[Lit::from(1), Lit::from(2)]));
/// assert!(solver.add_clause(&[Lit::from(-1)]));
/// assert_eq!(solver.solve(SearchLimits::unbounded()), SearchOutcome::Sat);
/// assert_eq!(solver.model_value(Var::new(2)), Some(true));
///
/// // Contradicts a unit clause
/// assert!(!solver.add_clause(&[Lit::from(1)]));
/// assert_eq!(solver.solve(SearchLimits::unbounded()), SearchOutcome::Unsat);
/// ```
pub struct MinisatSolver {
    solver: Minisat,
    /// Values fixed by unit clauses.
    units: Vec<Option<bool>>,
    /// Cleared once the formula is known to be unsatisfiable.
    ok: bool,
    model: Option<Vec<bool>>,
    vars: u64,
    clauses: u64,
}

impl MinisatSolver {
    pub fn new() -> Self {
        MinisatSolver {
            solver: Minisat::default(),
            units: Vec::new(),
            ok: true,
            model: None,
            vars: 0,
            clauses: 0,
        }
    }

    fn unit_value(&self, lit: Lit) -> Option<bool> {
        self.units
            .get(lit.var().index() as usize - 1)
            .copied()
            .flatten()
            .map(|value| lit.eval(value))
    }

    /// Tells which budget stopped the last search.
    fn exhaustion(&self, limits: SearchLimits, before: SolverStats) -> Exhaustion {
        let after = self.stats();
        if limits
            .conflicts
            .is_some_and(|limit| after.conflicts - before.conflicts >= limit)
        {
            Exhaustion::ConflictLimit
        } else if limits
            .inspections
            .is_some_and(|limit| after.inspections - before.inspections >= limit)
        {
            Exhaustion::InspectionLimit
        } else {
            Exhaustion::Interrupted
        }
    }
}

impl Default for MinisatSolver {
    fn default() -> Self {
        MinisatSolver::new()
    }
}

impl ClauseSink for MinisatSolver {
    fn add_clause(&mut self, clause: &[Lit]) -> bool {
        self.clauses += 1;
        if !self.ok {
            return false;
        }
        self.model = None;
        for lit in clause {
            self.vars = self.vars.max(u64::from(lit.var().index()));
        }

        // The empty clause is falsified too
        if clause.iter().all(|&lit| self.unit_value(lit) == Some(false)) {
            self.ok = false;
            return false;
        }
        if let [unit] = clause {
            let index = unit.var().index() as usize - 1;
            if self.units.len() <= index {
                self.units.resize(index + 1, None);
            }
            self.units[index] = Some(!unit.is_negative());
        }

        let lits: RsClause = clause.iter().map(|&lit| to_rustsat(lit)).collect();
        if let Err(e) = self.solver.add_clause(lits) {
            log::warn!("minisat rejected clause {:?}: {}", clause, e);
        }
        true
    }
}

impl SatSolver for MinisatSolver {
    fn simplify(&mut self) -> bool {
        // MiniSat simplifies at the top level when a search starts
        self.ok
    }

    fn solve(&mut self, limits: SearchLimits) -> SearchOutcome {
        self.model = None;
        if !self.ok {
            return SearchOutcome::Unsat;
        }

        let before = self.stats();
        if let Err(e) = self.solver.limit_conflicts(budget(limits.conflicts)) {
            log::warn!("could not set the minisat conflict budget: {}", e);
        }
        if let Err(e) = self.solver.limit_propagations(budget(limits.inspections)) {
            log::warn!("could not set the minisat propagation budget: {}", e);
        }

        match self.solver.solve() {
            Ok(SolverResult::Sat) => {
                let model = (1..=self.vars as u32)
                    .map(|k| {
                        let lit = to_rustsat(Var::new(k).positive());
                        matches!(self.solver.lit_val(lit), Ok(TernaryVal::True))
                    })
                    .collect();
                self.model = Some(model);
                SearchOutcome::Sat
            }
            Ok(SolverResult::Unsat) => {
                self.ok = false;
                SearchOutcome::Unsat
            }
            Ok(SolverResult::Interrupted) => {
                let reason = self.exhaustion(limits, before);
                log::debug!("minisat stopped: {}", reason);
                SearchOutcome::Undetermined(reason)
            }
            Err(e) => {
                log::warn!("minisat failed: {}", e);
                SearchOutcome::Undetermined(Exhaustion::Interrupted)
            }
        }
    }

    fn model_value(&self, var: Var) -> Option<bool> {
        self.model
            .as_ref()
            .and_then(|model| model.get(var.index() as usize - 1).copied())
    }

    fn stats(&self) -> SolverStats {
        SolverStats {
            conflicts: self.solver.conflicts() as u64,
            inspections: self.solver.propagations() as u64,
            decisions: self.solver.decisions() as u64,
            vars: self.vars,
            clauses: self.clauses,
        }
    }
}
