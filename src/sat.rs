//! Solve a miter: encode it, hand the formula to a SAT engine, and read back a verdict.
//!
//! The entry points are [`solve_miter`] ([`MinisatSolver`]) and [`solve_miter_with`]
//! (any [`SatSolver`]). Both drive a [`SolveSession`] through its phases:
//!
//! ```text
//! Idle --load--> Loaded --simplify--> Simplified --search--> Solved
//!   \                \
//!    `- trivially unsat during emission or simplification ---> Solved(Unsat)
//! ```
//!
//! A satisfiable miter comes with a [`Counterexample`]: one value per primary input, in
//! declaration order.
//!
//! ```rust
//! use satmiter::{Aig, sat::{MiterResult, SolveParams, solve_miter}};
//!
//! // a & b against a | b
//! let mut aig = Aig::new();
//! let a = aig.add_input().unwrap();
//! let b = aig.add_input().unwrap();
//! let f = aig.and(a.clone(), b.clone()).unwrap();
//! let g = aig.or(a, b).unwrap();
//! let diff = aig.xor(f, g).unwrap();
//! aig.add_output_edge(diff).unwrap();
//!
//! let report = solve_miter(&aig, &SolveParams::default()).unwrap();
//! let MiterResult::Sat(cex) = report.result else { panic!("a & b and a | b differ") };
//! assert_ne!(cex[0], cex[1]);
//! ```

use std::{
    fmt::{self, Display},
    ops::Deref,
};

use log::{debug, info};

use crate::{
    Aig, NodeId, Result,
    cnf::{
        Clause, ClauseSink, Cnf, Lit, TriviallyUnsat, cover::CoverEncoder,
        structural::StructuralEncoder, varmap::VarMap,
    },
    logic::LogicNetwork,
    solver::{MinisatSolver, SatSolver, SearchLimits, SearchOutcome},
};

pub use crate::solver::Exhaustion;

/// The network to encode, which decides the encoding path.
#[derive(Debug, Clone, Copy)]
pub enum Network<'a> {
    /// An AIG, encoded with supergates and multiplexers. The formula asserts that at least one
    /// output is true.
    Structural(&'a Aig),
    /// A network of nodes described by covers. The formula asserts every output.
    CoverBased(&'a LogicNetwork),
}

impl<'a> From<&'a Aig> for Network<'a> {
    fn from(value: &'a Aig) -> Self {
        Network::Structural(value)
    }
}

impl<'a> From<&'a LogicNetwork> for Network<'a> {
    fn from(value: &'a LogicNetwork) -> Self {
        Network::CoverBased(value)
    }
}

impl Network<'_> {
    fn inputs(&self) -> Vec<NodeId> {
        match self {
            Network::Structural(aig) => aig.get_inputs_id(),
            Network::CoverBased(network) => network.get_inputs().to_vec(),
        }
    }
}

/// Parameters of a solve.
///
/// ```rust
/// use satmiter::sat::SolveParams;
///
/// let params = SolveParams::default().with_conflict_limit(1000).with_muxes(false);
/// assert_eq!(params.conflict_limit, Some(1000));
/// assert_eq!(params.inspection_limit, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveParams {
    /// Maximum number of conflicts during the search, `None` for no limit.
    pub conflict_limit: Option<u64>,
    /// Maximum number of clause inspections during the search, `None` for no limit.
    pub inspection_limit: Option<u64>,
    /// Recognize multiplexers on the structural path.
    pub use_muxes: bool,
    /// Derive covers made of all prime implicants on the cover-based path.
    pub all_primes: bool,
    /// Log a summary of the solve at info level.
    pub verbose: bool,
    /// Keep a copy of every submitted clause in the report.
    pub trace: bool,
}

impl Default for SolveParams {
    fn default() -> Self {
        SolveParams {
            conflict_limit: None,
            inspection_limit: None,
            use_muxes: true,
            all_primes: false,
            verbose: false,
            trace: false,
        }
    }
}

impl SolveParams {
    pub fn with_conflict_limit(mut self, limit: u64) -> Self {
        self.conflict_limit = Some(limit);
        self
    }

    pub fn with_inspection_limit(mut self, limit: u64) -> Self {
        self.inspection_limit = Some(limit);
        self
    }

    pub fn with_muxes(mut self, use_muxes: bool) -> Self {
        self.use_muxes = use_muxes;
        self
    }

    pub fn with_all_primes(mut self, all_primes: bool) -> Self {
        self.all_primes = all_primes;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            conflicts: self.conflict_limit,
            inspections: self.inspection_limit,
        }
    }
}

/// Values of the primary inputs, in declaration order, making at least one output true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample(Vec<bool>);

impl Counterexample {
    pub fn into_inner(self) -> Vec<bool> {
        self.0
    }
}

impl Deref for Counterexample {
    type Target = [bool];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Counterexample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &value in &self.0 {
            write!(f, "{}", value as u8)?;
        }
        Ok(())
    }
}

/// Verdict on a miter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiterResult {
    /// No input assignment makes an output true: the compared designs are equivalent.
    Unsat,
    /// The designs differ on the given inputs.
    Sat(Counterexample),
    /// The search stopped before reaching a verdict.
    Undetermined(Exhaustion),
}

impl MiterResult {
    pub fn is_unsat(&self) -> bool {
        matches!(self, MiterResult::Unsat)
    }

    pub fn is_sat(&self) -> bool {
        matches!(self, MiterResult::Sat(_))
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(self, MiterResult::Undetermined(_))
    }

    pub fn counterexample(&self) -> Option<&Counterexample> {
        match self {
            MiterResult::Sat(cex) => Some(cex),
            _ => None,
        }
    }
}

impl Display for MiterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiterResult::Unsat => write!(f, "UNSAT"),
            MiterResult::Sat(cex) => write!(f, "SAT ({})", cex),
            MiterResult::Undetermined(reason) => write!(f, "UNDETERMINED ({})", reason),
        }
    }
}

/// Statistics of a solve.
///
/// `vars` and `clauses` describe the emitted formula. The search counters stay at zero when
/// the verdict was reached without searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub conflicts: u64,
    pub inspections: u64,
    pub decisions: u64,
    pub vars: usize,
    pub clauses: u64,
}

impl Display for SolveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vars, {} clauses, {} conflicts, {} inspections, {} decisions",
            self.vars, self.clauses, self.conflicts, self.inspections, self.decisions
        )
    }
}

/// Everything a solve produces.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub result: MiterResult,
    pub stats: SolveStats,
    /// Every clause submitted to the solver, when [`SolveParams::trace`] is set.
    pub trace: Option<Cnf>,
}

/// Phase of a [`SolveSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loaded,
    Simplified,
    Solved,
}

/// Forwards clauses to the solver, keeping a copy if tracing.
struct Recorder<'a, S: ?Sized> {
    solver: &'a mut S,
    trace: Option<&'a mut Cnf>,
}

impl<S: ClauseSink + ?Sized> ClauseSink for Recorder<'_, S> {
    fn add_clause(&mut self, clause: &[Lit]) -> bool {
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.push(Clause::from(clause));
        }
        self.solver.add_clause(clause)
    }
}

/// One solve attempt, step by step.
///
/// Calling a step out of order panics. Once the session is solved, the remaining steps do
/// nothing, so a trivially unsatisfiable miter can go through every step.
///
/// ```rust
/// use satmiter::{Aig, sat::{Phase, SolveParams, SolveSession}, solver::MinisatSolver};
///
/// let mut aig = Aig::new();
/// let a = aig.add_input().unwrap();
/// aig.add_output_edge(a).unwrap();
///
/// let mut session = SolveSession::new(MinisatSolver::new(), SolveParams::default());
/// session.load((&aig).into()).unwrap();
/// assert_eq!(session.phase(), Phase::Loaded);
/// session.simplify();
/// session.search();
/// assert_eq!(session.phase(), Phase::Solved);
///
/// let report = session.into_report();
/// assert_eq!(report.result.counterexample().unwrap()[..], [true]);
/// ```
pub struct SolveSession<S: SatSolver> {
    solver: S,
    params: SolveParams,
    phase: Phase,
    vars: VarMap,
    inputs: Vec<NodeId>,
    trace: Option<Cnf>,
    result: Option<MiterResult>,
    searched: bool,
}

impl<S: SatSolver> SolveSession<S> {
    pub fn new(solver: S, params: SolveParams) -> Self {
        SolveSession {
            solver,
            params,
            phase: Phase::Idle,
            vars: VarMap::new(),
            inputs: Vec::new(),
            trace: params.trace.then(Cnf::new),
            result: None,
            searched: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The verdict, once solved.
    pub fn result(&self) -> Option<&MiterResult> {
        self.result.as_ref()
    }

    /// Variable table of the loaded network.
    pub fn vars(&self) -> &VarMap {
        &self.vars
    }

    /// Encodes the network into the solver.
    ///
    /// Fails without submitting anything if the network cannot be encoded (sequential
    /// elements, malformed covers). If a clause is refused, the session is solved as UNSAT.
    ///
    /// # Panics
    ///
    /// Panics if a network was already loaded.
    pub fn load(&mut self, network: Network<'_>) -> Result<()> {
        assert_eq!(self.phase, Phase::Idle, "a session loads a single network");

        let mut sink = Recorder {
            solver: &mut self.solver,
            trace: self.trace.as_mut(),
        };
        let emission = match network {
            Network::Structural(aig) => {
                let mut encoder = StructuralEncoder::new(self.params.use_muxes);
                let emission = encoder.encode(aig, &mut sink)?;
                self.vars = encoder.vars().clone();
                emission
            }
            Network::CoverBased(logic) => {
                let mut encoder = CoverEncoder::new(self.params.all_primes);
                let emission = encoder.encode(logic, &mut sink)?;
                self.vars = encoder.vars().clone();
                emission
            }
        };
        self.inputs = network.inputs();

        match emission {
            Ok(()) => {
                debug!("loaded {} vars, {} clauses", self.vars.len(), self.solver.stats().clauses);
                self.phase = Phase::Loaded;
            }
            Err(TriviallyUnsat) => self.conclude(MiterResult::Unsat),
        }
        Ok(())
    }

    /// Simplifies the formula at the top level.
    ///
    /// # Panics
    ///
    /// Panics if no network was loaded.
    pub fn simplify(&mut self) {
        if self.phase == Phase::Solved {
            return;
        }
        assert_eq!(self.phase, Phase::Loaded, "load a network before simplifying");

        if self.solver.simplify() {
            self.phase = Phase::Simplified;
        } else {
            debug!("simplification proved the formula unsatisfiable");
            self.conclude(MiterResult::Unsat);
        }
    }

    /// Searches within the limits of the parameters.
    ///
    /// # Panics
    ///
    /// Panics if the formula was not simplified.
    pub fn search(&mut self) {
        if self.phase == Phase::Solved {
            return;
        }
        assert_eq!(self.phase, Phase::Simplified, "simplify the formula before searching");

        self.searched = true;
        let limits = self.params.limits();
        if !limits.is_unbounded() {
            debug!("searching within {:?}", limits);
        }
        let result = match self.solver.solve(limits) {
            SearchOutcome::Sat => MiterResult::Sat(self.counterexample()),
            SearchOutcome::Unsat => MiterResult::Unsat,
            SearchOutcome::Undetermined(reason) => MiterResult::Undetermined(reason),
        };
        self.conclude(result);
    }

    /// Reads the value of every primary input in the model. Inputs without a variable do not
    /// matter to the outputs, they are set to false.
    fn counterexample(&self) -> Counterexample {
        Counterexample(
            self.inputs
                .iter()
                .map(|&id| {
                    self.vars
                        .get(id)
                        .and_then(|var| self.solver.model_value(var))
                        .unwrap_or(false)
                })
                .collect(),
        )
    }

    fn conclude(&mut self, result: MiterResult) {
        debug!("solved: {}", result);
        self.result = Some(result);
        self.phase = Phase::Solved;
    }

    pub fn stats(&self) -> SolveStats {
        let solver = self.solver.stats();
        let mut stats = SolveStats {
            vars: self.vars.len(),
            clauses: solver.clauses,
            ..Default::default()
        };
        if self.searched {
            stats.conflicts = solver.conflicts;
            stats.inspections = solver.inspections;
            stats.decisions = solver.decisions;
        }
        stats
    }

    /// # Panics
    ///
    /// Panics if the session is not solved.
    pub fn into_report(self) -> SolveReport {
        let stats = self.stats();
        let Some(result) = self.result else {
            panic!("the session has not reached a verdict (phase {:?})", self.phase);
        };
        SolveReport {
            result,
            stats,
            trace: self.trace,
        }
    }
}

/// Solves a miter with [`MinisatSolver`].
pub fn solve_miter<'a>(network: impl Into<Network<'a>>, params: &SolveParams) -> Result<SolveReport> {
    solve_miter_with(network, params, MinisatSolver::new())
}

/// Solves a miter with the given solver, which should not hold any clause yet.
///
/// Errors are only returned for networks which cannot be encoded. UNSAT, including when it
/// is found without searching, and exhausted limits are reported in [`SolveReport::result`].
pub fn solve_miter_with<'a, S: SatSolver>(
    network: impl Into<Network<'a>>,
    params: &SolveParams,
    solver: S,
) -> Result<SolveReport> {
    let mut session = SolveSession::new(solver, *params);
    session.load(network.into())?;
    session.simplify();
    session.search();
    let report = session.into_report();

    if params.verbose {
        info!("miter is {}: {}", report.result, report.stats);
    }
    Ok(report)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AigEdge, AigError, AigNode, logic::NodeFunction};
    use test_log::test;

    fn aig_with_inputs(n: usize) -> (Aig, Vec<AigEdge>) {
        let mut aig = Aig::new();
        let inputs = (0..n).map(|_| aig.add_input().unwrap()).collect();
        (aig, inputs)
    }

    /// `a & (b | c)` against `(a & b) | (a & c)`: equivalent, but not structurally.
    fn distributivity() -> Aig {
        let (mut aig, i) = aig_with_inputs(3);
        let (a, b, c) = (i[0].clone(), i[1].clone(), i[2].clone());
        let bc = aig.or(b.clone(), c.clone()).unwrap();
        let f = aig.and(a.clone(), bc).unwrap();
        let ab = aig.and(a.clone(), b).unwrap();
        let ac = aig.and(a, c).unwrap();
        let g = aig.or(ab, ac).unwrap();
        let diff = aig.xor(f, g).unwrap();
        aig.add_output_edge(diff).unwrap();
        aig
    }

    /// `a & b` against `a | b`.
    fn and_vs_or() -> Aig {
        let (mut aig, i) = aig_with_inputs(2);
        let f = aig.and(i[0].clone(), i[1].clone()).unwrap();
        let g = aig.or(i[0].clone(), i[1].clone()).unwrap();
        let diff = aig.xor(f, g).unwrap();
        aig.add_output_edge(diff).unwrap();
        aig
    }

    fn assert_valid_counterexample(aig: &Aig, result: &MiterResult) {
        let cex = result.counterexample().expect("expected a counterexample");
        assert_eq!(cex.len(), aig.num_inputs());
        assert!(aig.evaluate(cex).unwrap().into_iter().any(|o| o));
    }

    #[test]
    fn identical_gates_are_unsat() {
        let (mut aig, i) = aig_with_inputs(2);
        let f = aig.and(i[0].clone(), i[1].clone()).unwrap();
        let g = aig.and(i[0].clone(), i[1].clone()).unwrap();
        let diff = aig.xor(f, g).unwrap();
        aig.add_output_edge(diff).unwrap();

        // Structural hashing folded the miter to false: nothing to search
        let report = solve_miter(&aig, &SolveParams::default().with_trace(true)).unwrap();
        assert_eq!(report.result, MiterResult::Unsat);
        assert_eq!(report.stats.conflicts, 0);
        assert_eq!(report.stats.decisions, 0);
        assert!(report.trace.unwrap().len() <= 2);
    }

    #[test]
    fn duplicated_gates_are_unsat() {
        let (mut aig, i) = aig_with_inputs(2);
        let f = aig
            .add_node(AigNode::and(10, i[0].clone(), i[1].clone()))
            .unwrap();
        let g = aig
            .add_node(AigNode::and(11, i[0].clone(), i[1].clone()))
            .unwrap();
        let diff = aig
            .xor(AigEdge::new(f, false), AigEdge::new(g, false))
            .unwrap();
        aig.add_output_edge(diff).unwrap();

        for use_muxes in [true, false] {
            let params = SolveParams::default().with_muxes(use_muxes);
            let report = solve_miter(&aig, &params).unwrap();
            assert_eq!(report.result, MiterResult::Unsat);
        }
    }

    #[test]
    fn and_vs_or_is_sat() {
        let aig = and_vs_or();
        let report = solve_miter(&aig, &SolveParams::default()).unwrap();
        assert_valid_counterexample(&aig, &report.result);
        let cex = report.result.counterexample().unwrap();
        assert!(cex[..] == [true, false] || cex[..] == [false, true]);
    }

    #[test]
    fn contradictory_gate_is_unsat_without_search() {
        let (mut aig, i) = aig_with_inputs(1);
        let n = aig
            .add_node(AigNode::and(10, i[0].clone(), !i[0].clone()))
            .unwrap();
        aig.add_output(10, false).unwrap();

        let params = SolveParams::default().with_trace(true);
        let mut session = SolveSession::new(MinisatSolver::new(), params);
        session.load((&aig).into()).unwrap();
        assert_eq!(session.phase(), Phase::Solved);
        let var = session.vars().get(n.borrow().get_id()).unwrap();

        let report = session.into_report();
        assert_eq!(report.result, MiterResult::Unsat);
        assert_eq!(report.stats.conflicts, 0);

        // The gate is forced false, no n-ary clause is emitted for it
        let trace = report.trace.unwrap();
        assert_eq!(trace.clauses().last().unwrap().lits(), &[var.negative()]);
        assert!(trace.clauses().iter().all(|clause| clause.len() == 1));
    }

    #[test]
    fn conflict_limit_leaves_result_undetermined() {
        let aig = distributivity();

        let params = SolveParams::default().with_conflict_limit(0);
        let report = solve_miter(&aig, &params).unwrap();
        assert_eq!(
            report.result,
            MiterResult::Undetermined(Exhaustion::ConflictLimit)
        );
        assert_eq!(report.stats.decisions, 0);

        let report = solve_miter(&aig, &SolveParams::default()).unwrap();
        assert_eq!(report.result, MiterResult::Unsat);
        assert!(report.stats.conflicts >= 1);
    }

    #[test]
    fn inspection_limit_leaves_result_undetermined() {
        let params = SolveParams::default().with_inspection_limit(0);
        let report = solve_miter(&distributivity(), &params).unwrap();
        assert_eq!(
            report.result,
            MiterResult::Undetermined(Exhaustion::InspectionLimit)
        );
        assert_eq!(report.stats.decisions, 0);
    }

    #[test]
    fn sequential_networks_are_rejected() {
        let (mut aig, i) = aig_with_inputs(1);
        aig.add_node(AigNode::latch(5, i[0].clone(), None)).unwrap();
        aig.add_output(5, false).unwrap();
        assert!(matches!(
            solve_miter(&aig, &SolveParams::default()),
            Err(AigError::SequentialNetwork(1))
        ));
    }

    #[test]
    fn trace_holds_every_submitted_clause() {
        let aig = and_vs_or();
        let report = solve_miter(&aig, &SolveParams::default()).unwrap();
        assert!(report.trace.is_none());

        let report = solve_miter(&aig, &SolveParams::default().with_trace(true)).unwrap();
        let trace = report.trace.unwrap();
        assert_eq!(trace.len() as u64, report.stats.clauses);
        assert_eq!(trace.num_vars() as usize, report.stats.vars);

        // The counterexample extends to a model of the traced formula
        let cex = report.result.counterexample().unwrap();
        let values = aig.simulate(cex).unwrap();
        let mut encoder = StructuralEncoder::new(true);
        encoder.encode(&aig, &mut Cnf::new()).unwrap().unwrap();
        let vars = encoder.vars();
        assert!(trace.is_satisfied_by(|var| {
            let id = vars.node_at(var.index() as usize - 1).unwrap();
            values[&id]
        }));
    }

    #[test]
    fn inputs_outside_the_cone_are_false() {
        let (mut aig, i) = aig_with_inputs(3);
        let f = aig.and(i[0].clone(), !i[2].clone()).unwrap();
        aig.add_output_edge(f).unwrap();

        let report = solve_miter(&aig, &SolveParams::default()).unwrap();
        let cex = report.result.counterexample().unwrap();
        assert_eq!(cex[..], [true, false, false]);
    }

    #[test]
    fn cover_based_path() {
        for aig in [and_vs_or(), distributivity()] {
            let logic = LogicNetwork::from_aig(&aig).unwrap();
            for all_primes in [false, true] {
                let params = SolveParams::default().with_all_primes(all_primes);
                let structural = solve_miter(&aig, &params).unwrap();
                let cover = solve_miter(&logic, &params).unwrap();
                assert_eq!(structural.result.is_sat(), cover.result.is_sat());
                if cover.result.is_sat() {
                    assert_valid_counterexample(&aig, &cover.result);
                    let cex = cover.result.counterexample().unwrap();
                    assert_eq!(logic.evaluate(cex).unwrap(), vec![true]);
                }
            }
        }
    }

    #[test]
    fn cover_based_constant_output_is_unsat() {
        let mut logic = LogicNetwork::new();
        let a = logic.add_input();
        let zero = logic.add_node(vec![], NodeFunction::Const(false)).unwrap();
        logic.add_output(a, false).unwrap();
        logic.add_output(zero, false).unwrap();

        let report = solve_miter(&logic, &SolveParams::default()).unwrap();
        assert_eq!(report.result, MiterResult::Unsat);
        assert_eq!(report.stats.decisions, 0);
    }

    /// Left and right folds of an `n`-input XOR, compared in one miter.
    fn parity_chains(n: usize) -> Aig {
        let (mut aig, i) = aig_with_inputs(n);
        let mut left = i[0].clone();
        for x in &i[1..] {
            left = aig.xor(left, x.clone()).unwrap();
        }
        let mut right = i[n - 1].clone();
        for x in i[..n - 1].iter().rev() {
            right = aig.xor(x.clone(), right).unwrap();
        }
        let diff = aig.xor(left, right).unwrap();
        aig.add_output_edge(diff).unwrap();
        aig
    }

    #[test]
    fn parity_chains_are_unsat() {
        let aig = parity_chains(32);
        for use_muxes in [true, false] {
            let params = SolveParams::default().with_muxes(use_muxes);
            let report = solve_miter(&aig, &params).unwrap();
            assert_eq!(report.result, MiterResult::Unsat);
        }
    }

    #[test]
    fn parity_chains_differing_in_one_input_are_sat() {
        let (mut aig, i) = aig_with_inputs(24);
        let mut left = i[0].clone();
        for x in &i[1..] {
            left = aig.xor(left, x.clone()).unwrap();
        }
        // Leaves out the last input
        let mut right = i[22].clone();
        for x in i[..22].iter().rev() {
            right = aig.xor(x.clone(), right).unwrap();
        }
        let diff = aig.xor(left, right).unwrap();
        aig.add_output_edge(diff).unwrap();

        let report = solve_miter(&aig, &SolveParams::default()).unwrap();
        assert_valid_counterexample(&aig, &report.result);
        assert!(report.result.counterexample().unwrap()[23]);
    }

    #[test]
    fn session_steps() {
        let aig = and_vs_or();
        let mut session = SolveSession::new(MinisatSolver::new(), SolveParams::default());
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.result().is_none());

        session.load(Network::Structural(&aig)).unwrap();
        assert_eq!(session.phase(), Phase::Loaded);
        session.simplify();
        assert_eq!(session.phase(), Phase::Simplified);
        assert_eq!(session.stats().conflicts, 0);
        session.search();
        assert_eq!(session.phase(), Phase::Solved);
        assert!(session.result().unwrap().is_sat());

        // Nothing left to do
        session.search();
        assert!(session.into_report().result.is_sat());
    }

    #[test]
    #[should_panic]
    fn search_before_load_panics() {
        let mut session = SolveSession::new(MinisatSolver::new(), SolveParams::default());
        session.search();
    }

    #[test]
    #[should_panic]
    fn report_before_verdict_panics() {
        let aig = and_vs_or();
        let mut session = SolveSession::new(MinisatSolver::new(), SolveParams::default());
        session.load((&aig).into()).unwrap();
        let _ = session.into_report();
    }

    #[test]
    fn verbose_solve() {
        let params = SolveParams::default().with_verbose(true);
        assert!(solve_miter(&and_vs_or(), &params).unwrap().result.is_sat());
    }
}
