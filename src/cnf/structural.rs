//! Structural encoding of an [`Aig`]: Tseitin clauses over supergates and multiplexers.
//!
//! The whole-network pass ([`StructuralEncoder::encode`]) works as follows:
//! 1. the constant node receives the first variable and a unit clause fixing it to false
//! 2. the fanins of the primary outputs receive variables, and one clause asserts that at
//!    least one output is true (the miter condition)
//! 3. every node which received a variable is visited in allocation order: multiplexers are
//!    encoded with [`emit_mux`], other and gates are merged into supergates and encoded with
//!    [`emit_and`]. Their operands receive variables on the way, which grows the work list.
//!
//! Only the cone of the outputs is encoded.

use crate::{Aig, AigEdge, AigNodeRef, Result};

use super::{
    ClauseSink, Emission, Lit, Var, submit,
    supergate::{SupergateCollector, SupergateStatus},
    varmap::VarMap,
};

/// Emits a unit clause.
pub fn emit_unit<S: ClauseSink + ?Sized>(sink: &mut S, lit: Lit) -> Emission {
    submit(sink, &[lit])
}

/// Emits the top-level miter clause: the disjunction of the output literals.
pub fn emit_top<S: ClauseSink + ?Sized>(sink: &mut S, outputs: &[Lit]) -> Emission {
    submit(sink, outputs)
}

/// Emits `root = l1 & ... & ln`.
///
/// One clause `(li | !root)` per leaf and one clause `(!l1 | ... | !ln | root)`.
/// Without any leaf (contradictory supergate), the root is forced to false instead.
pub fn emit_and<S: ClauseSink + ?Sized>(sink: &mut S, root: Var, leaves: &[Lit]) -> Emission {
    if leaves.is_empty() {
        return emit_unit(sink, root.negative());
    }

    for &leaf in leaves {
        submit(sink, &[leaf, root.negative()])?;
    }
    let mut clause: Vec<Lit> = leaves.iter().map(|&leaf| !leaf).collect();
    clause.push(root.positive());
    submit(sink, &clause)
}

/// Emits `root = if cond { then } else { other }`.
///
/// Four clauses define the multiplexer, two more help propagation when the data operands
/// are distinct variables. When they share a variable, those two would be tautologies or
/// bogus units, so they are skipped.
pub fn emit_mux<S: ClauseSink + ?Sized>(
    sink: &mut S,
    root: Var,
    cond: Var,
    then: Lit,
    other: Lit,
) -> Emission {
    let (f, i) = (root.positive(), cond.positive());

    submit(sink, &[!i, !then, f])?;
    submit(sink, &[!i, then, !f])?;
    submit(sink, &[i, !other, f])?;
    submit(sink, &[i, other, !f])?;

    if then.var() == other.var() {
        return Ok(());
    }

    submit(sink, &[then, other, !f])?;
    submit(sink, &[!then, !other, f])
}

/// Encodes a whole combinational [`Aig`] for miter solving.
///
/// The encoder keeps the variable table of its last pass, which is how the caller maps
/// primary inputs back to solver variables.
///
/// ```rust
/// use satmiter::{Aig, cnf::{Cnf, structural::StructuralEncoder}};
///
/// let mut aig = Aig::new();
/// let a = aig.add_input().unwrap();
/// let b = aig.add_input().unwrap();
/// let ab = aig.and(a, b).unwrap();
/// aig.add_output_edge(ab).unwrap();
///
/// let mut encoder = StructuralEncoder::new(true);
/// let mut cnf = Cnf::new();
/// assert!(encoder.encode(&aig, &mut cnf).unwrap().is_ok());
/// // const unit, top clause, then 3 clauses for the and gate
/// assert_eq!(cnf.len(), 5);
/// assert_eq!(encoder.vars().len(), 4);
/// ```
#[derive(Debug)]
pub struct StructuralEncoder {
    use_muxes: bool,
    vars: VarMap,
    worklist: Vec<AigNodeRef>,
    collector: SupergateCollector,
    num_muxes: usize,
    num_supergates: usize,
    num_contradictions: usize,
}

impl StructuralEncoder {
    /// A new encoder. With `use_muxes`, multiplexers are recognized and encoded as such.
    pub fn new(use_muxes: bool) -> Self {
        StructuralEncoder {
            use_muxes,
            vars: VarMap::new(),
            worklist: Vec::new(),
            collector: SupergateCollector::new(),
            num_muxes: 0,
            num_supergates: 0,
            num_contradictions: 0,
        }
    }

    /// Variable table of the last pass.
    pub fn vars(&self) -> &VarMap {
        &self.vars
    }

    pub fn num_muxes(&self) -> usize {
        self.num_muxes
    }

    pub fn num_supergates(&self) -> usize {
        self.num_supergates
    }

    /// Number of supergates found to be constant false during the last pass.
    pub fn num_contradictions(&self) -> usize {
        self.num_contradictions
    }

    /// Encodes `aig` into `sink`.
    ///
    /// Fails if the AIG holds latches. Otherwise returns the outcome of the emission:
    /// `Err(TriviallyUnsat)` as soon as the sink refuses a clause, in which case nothing
    /// more is emitted.
    pub fn encode<S: ClauseSink + ?Sized>(&mut self, aig: &Aig, sink: &mut S) -> Result<Emission> {
        aig.check_combinational()?;

        self.vars = VarMap::new();
        self.worklist.clear();
        self.num_muxes = 0;
        self.num_supergates = 0;
        self.num_contradictions = 0;

        let emission = self.emit_network(aig, sink);
        log::debug!(
            "structural encoding: {} vars, {} supergates, {} muxes, {} contradictions{}",
            self.vars.len(),
            self.num_supergates,
            self.num_muxes,
            self.num_contradictions,
            if emission.is_err() { ", trivially unsat" } else { "" }
        );
        Ok(emission)
    }

    fn var_of(&mut self, node: &AigNodeRef) -> Var {
        let id = node.borrow().get_id();
        if !self.vars.contains(id) {
            self.worklist.push(node.clone());
        }
        self.vars.get_or_alloc(id)
    }

    fn lit_of(&mut self, edge: &AigEdge) -> Lit {
        self.var_of(&edge.get_node()).lit(edge.get_complement())
    }

    fn emit_network<S: ClauseSink + ?Sized>(&mut self, aig: &Aig, sink: &mut S) -> Emission {
        let cst = self.var_of(&aig.const_false().get_node());
        emit_unit(sink, cst.negative())?;

        let top: Vec<Lit> = aig
            .get_outputs()
            .iter()
            .map(|output| self.lit_of(output))
            .collect();
        emit_top(sink, &top)?;

        // The work list grows while it is being walked
        let mut k = 0;
        while k < self.worklist.len() {
            let node = self.worklist[k].clone();
            k += 1;
            self.emit_node(aig, &node, sink)?;
        }
        Ok(())
    }

    fn emit_node<S: ClauseSink + ?Sized>(
        &mut self,
        aig: &Aig,
        node: &AigNodeRef,
        sink: &mut S,
    ) -> Emission {
        let (id, is_and) = {
            let n = node.borrow();
            (n.get_id(), n.is_and())
        };
        if !is_and {
            return Ok(());
        }
        let root = self.var_of(node);

        let mux = if self.use_muxes && node.borrow().is_mux_type() {
            Some(node.borrow().recognize_mux())
        } else {
            None
        };

        if let Some(ops) = mux {
            self.num_muxes += 1;
            let cond = self.var_of(&ops.condition.get_node());
            let then = self.lit_of(&ops.then_edge);
            let other = self.lit_of(&ops.else_edge);
            log::trace!("node {}: mux", id);
            return emit_mux(sink, root, cond, then, other);
        }

        self.num_supergates += 1;
        let status = self.collector.collect(aig, node, self.use_muxes);
        if status == SupergateStatus::Contradiction {
            self.num_contradictions += 1;
            log::debug!("node {} is constant false (complementary leaves)", id);
            return emit_unit(sink, root.negative());
        }

        let leaves = self.collector.leaves().to_vec();
        let lits: Vec<Lit> = leaves.iter().map(|leaf| self.lit_of(leaf)).collect();
        log::trace!("node {}: supergate of {} leaves", id, lits.len());
        emit_and(sink, root, &lits)
    }
}
