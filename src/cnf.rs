//! Translate networks into SAT formulas in conjunctive normal form.
//!
//! Two encoders produce clauses, depending on the kind of network:
//! - [`structural`] handles [`Aig`]s: single-fanout and chains are merged into supergates and
//!   multiplexers are recognized, see [`StructuralEncoder`]
//! - [`cover`] handles [`LogicNetwork`]s whose nodes are described by a pair of covers,
//!   see [`CoverEncoder`].
//!
//! Both write into a [`ClauseSink`]: either a [`Cnf`] clause database or a SAT solver directly.
//! A sink refusing a clause means the formula is trivially unsatisfiable, in which case the
//! encoders stop right away and report [`TriviallyUnsat`].
//!
//! [`Aig`]: crate::Aig
//! [`LogicNetwork`]: crate::logic::LogicNetwork
//! [`StructuralEncoder`]: structural::StructuralEncoder
//! [`CoverEncoder`]: cover::CoverEncoder

pub mod cover;
pub mod structural;
pub mod supergate;
pub mod varmap;

use std::{
    fmt::{self, Display},
    io,
    ops::Not,
};

/// A SAT variable, numbered from 1 as in the DIMACS format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(u32);

impl Var {
    pub fn new(index: u32) -> Self {
        if index == 0 {
            panic!("Tried to create a Var from 0. Variables are numbered from 1 in DIMACS format.");
        }
        Var(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    /// The literal of this variable, negative if `complement` is set.
    pub fn lit(self, complement: bool) -> Lit {
        let lit = Lit(self.0 as i64);
        if complement { !lit } else { lit }
    }

    pub fn positive(self) -> Lit {
        self.lit(false)
    }

    pub fn negative(self) -> Lit {
        self.lit(true)
    }
}

/// A SAT literal, stored the DIMACS way: the variable index, negated if the literal is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit(i64);

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Lit(-self.0)
    }
}

impl From<i64> for Lit {
    fn from(value: i64) -> Self {
        if value == 0 {
            panic!("Tried to create a Lit from 0. 0 is not a valid literal in DIMACS format.");
        }
        if value.unsigned_abs() > u32::MAX as u64 {
            panic!("Tried to create a Lit from {}, variable index out of range.", value);
        }
        Lit(value)
    }
}

impl Lit {
    pub fn var(self) -> Var {
        Var(self.0.unsigned_abs() as u32)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn to_dimacs(self) -> i64 {
        self.0
    }

    /// Value of the literal when its variable takes `value`.
    pub fn eval(self, value: bool) -> bool {
        value ^ self.is_negative()
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A SAT clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause(Vec<Lit>);

impl Clause {
    /// A new empty clause.
    pub fn new() -> Self {
        Clause(Vec::new())
    }

    pub fn lits(&self) -> &[Lit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if at least one literal holds under the assignment.
    pub fn is_satisfied_by(&self, assignment: impl Fn(Var) -> bool) -> bool {
        self.0.iter().any(|lit| lit.eval(assignment(lit.var())))
    }
}

impl Default for Clause {
    fn default() -> Self {
        Clause::new()
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(value: Vec<Lit>) -> Self {
        Clause(value)
    }
}

impl From<&[Lit]> for Clause {
    fn from(value: &[Lit]) -> Self {
        Clause(value.to_vec())
    }
}

/// Returned when a clause submission made the formula trivially unsatisfiable.
///
/// This is not an error: it is a definite answer, reached without any search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriviallyUnsat;

/// Outcome of an encoding pass (or of a single clause submission).
pub type Emission = std::result::Result<(), TriviallyUnsat>;

/// Anything clauses can be appended to.
pub trait ClauseSink {
    /// Appends a clause.
    ///
    /// Returns false when the clause makes the formula trivially unsatisfiable
    /// (empty clause, or a conflict the sink is able to detect on its own).
    fn add_clause(&mut self, clause: &[Lit]) -> bool;
}

/// Submits a clause, turning a refusal from the sink into [`TriviallyUnsat`].
pub(crate) fn submit<S: ClauseSink + ?Sized>(sink: &mut S, clause: &[Lit]) -> Emission {
    if sink.add_clause(clause) {
        Ok(())
    } else {
        log::debug!("clause {:?} made the formula trivially unsatisfiable", clause);
        Err(TriviallyUnsat)
    }
}

/// A SAT CNF (clause database) that can be passed to a SAT solver or dumped in DIMACS format.
///
/// Clauses are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf(Vec<Clause>);

impl Cnf {
    /// A new empty CNF.
    pub fn new() -> Self {
        Cnf(Vec::new())
    }

    /// Add the given clause to the CNF.
    pub fn push(&mut self, clause: Clause) {
        self.0.push(clause);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest variable index used by any clause.
    pub fn num_vars(&self) -> u32 {
        self.0
            .iter()
            .flat_map(|clause| clause.lits())
            .map(|lit| lit.var().index())
            .max()
            .unwrap_or(0)
    }

    /// Returns true if every clause holds under the assignment.
    pub fn is_satisfied_by(&self, assignment: impl Fn(Var) -> bool) -> bool {
        self.0.iter().all(|clause| clause.is_satisfied_by(&assignment))
    }

    /// Writes the CNF in DIMACS format.
    pub fn write_dimacs<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{}", self)
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars(), self.len())?;
        for clause in &self.0 {
            for lit in clause.lits() {
                write!(f, "{} ", lit)?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

impl ClauseSink for Cnf {
    fn add_clause(&mut self, clause: &[Lit]) -> bool {
        self.push(Clause::from(clause));
        !clause.is_empty()
    }
}
