//! The SAT engine seam.
//!
//! A [`SatSolver`] receives clauses through [`ClauseSink`], simplifies the formula at the top
//! level, then searches for a model within optional resource limits. The engine used by
//! default is [`MinisatSolver`].

pub mod minisat;

use std::fmt::{self, Display};

use crate::cnf::{ClauseSink, Var};

pub use minisat::MinisatSolver;

/// Resource limits of one search, counted from the start of that search.
///
/// `None` means unbounded. A limit of `n` lets the search run until `n` conflicts (or
/// propagation work units) have happened, so `Some(0)` gives up before the first decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub conflicts: Option<u64>,
    pub inspections: Option<u64>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        SearchLimits::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.conflicts.is_none() && self.inspections.is_none()
    }
}

/// Why a search stopped without an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    ConflictLimit,
    InspectionLimit,
    /// The engine gave up for a reason of its own.
    Interrupted,
}

impl Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exhaustion::ConflictLimit => write!(f, "conflict limit reached"),
            Exhaustion::InspectionLimit => write!(f, "inspection limit reached"),
            Exhaustion::Interrupted => write!(f, "search interrupted"),
        }
    }
}

/// Outcome of a bounded search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Sat,
    Unsat,
    Undetermined(Exhaustion),
}

/// Counters of a SAT engine, cumulated over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub conflicts: u64,
    /// Work units of propagation, as counted by the engine.
    pub inspections: u64,
    pub decisions: u64,
    pub vars: u64,
    /// Clauses submitted.
    pub clauses: u64,
}

/// A SAT engine.
pub trait SatSolver: ClauseSink {
    /// Simplifies the formula under the top-level assignments.
    ///
    /// Returns false if the formula is proven unsatisfiable.
    fn simplify(&mut self) -> bool;

    /// Searches for a model.
    fn solve(&mut self, limits: SearchLimits) -> SearchOutcome;

    /// Value of the variable in the model found by the last successful search.
    ///
    /// `None` if there is no model or if the engine never heard of the variable.
    fn model_value(&self, var: Var) -> Option<bool>;

    fn stats(&self) -> SolverStats;
}
