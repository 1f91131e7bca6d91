//! Module defining the [`Aig`] struct, as well as [`AigNode`], [`AigEdge`] and the multiplexer queries.
//!
//! An [`Aig`] is the structural network fed to the CNF encoder, see [`crate::cnf`] and
//! [`crate::sat`] to go from a network to a SAT verdict.

pub mod edge;
pub mod error;
pub mod mux;
pub mod node;

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    ops::Deref,
    rc::Rc,
};

pub use edge::AigEdge;
pub use error::{AigError, Result};
pub use mux::MuxOperands;
pub use node::{AigNode, AigNodeRef, NodeId};

/// Key of the structural hashing table: both fanins as (id, complement), smaller first.
type StrashKey = ((NodeId, bool), (NodeId, bool));

fn strash_key(a: &AigEdge, b: &AigEdge) -> StrashKey {
    let ka: (NodeId, bool) = a.into();
    let kb: (NodeId, bool) = b.into();
    if ka <= kb { (ka, kb) } else { (kb, ka) }
}

/// A whole AIG.
///
/// Nodes are kept in creation order. Since the fanins of a node must exist before the node
/// itself can be added, this order is also a topological order, and it is the stable order
/// used for every traversal (inputs in declaration order, then and gates as they were built).
///
/// There are two ways to build and gates:
/// - [`Aig::and`] (and the [`Aig::or`], [`Aig::xor`], [`Aig::mux`] helpers built on top of it)
///   allocates a fresh id, folds constants and reuses a structurally identical gate if any
/// - [`Aig::add_node`] adds the node exactly as given, with the caller's id.
///
/// The fanout count of a node ([`Aig::fanout_count`]) includes primary output references, so
/// a gate which drives an output and another gate is considered shared.
#[derive(Debug, Clone)]
pub struct Aig {
    nodes: HashMap<NodeId, AigNodeRef>,
    /// Creation order (topological).
    order: Vec<NodeId>,
    /// Inputs in declaration order.
    inputs: Vec<AigNodeRef>,
    latches: Vec<AigNodeRef>,
    outputs: Vec<AigEdge>,
    fanouts: HashMap<NodeId, usize>,
    strash: HashMap<StrashKey, NodeId>,
    next_id: NodeId,
}

impl Aig {
    /// Create a brand new AIG (constant node [`AigNode::False`] included).
    pub fn new() -> Self {
        let node_false = Rc::new(RefCell::new(AigNode::False));
        Aig {
            nodes: HashMap::from([(0, node_false)]),
            order: vec![0],
            inputs: Vec::new(),
            latches: Vec::new(),
            outputs: Vec::new(),
            fanouts: HashMap::new(),
            strash: HashMap::new(),
            next_id: 1,
        }
    }

    /// Retrieves a node from its id.
    pub fn get_node(&self, id: NodeId) -> Option<AigNodeRef> {
        self.nodes.get(&id).cloned()
    }

    /// Builds an edge to an existing node.
    pub fn get_edge(&self, id: NodeId, complement: bool) -> Result<AigEdge> {
        let node = self.get_node(id).ok_or(AigError::NodeDoesNotExist(id))?;
        Ok(AigEdge::new(node, complement))
    }

    /// Edge to the constant false node.
    pub fn const_false(&self) -> AigEdge {
        AigEdge::new(self.nodes[&0].clone(), false)
    }

    /// Complemented edge to the constant false node.
    pub fn const_true(&self) -> AigEdge {
        !self.const_false()
    }

    /// Retrieves inputs reference, in declaration order.
    pub fn get_inputs(&self) -> Vec<AigNodeRef> {
        self.inputs.clone()
    }

    /// Retrieves inputs id, in declaration order.
    pub fn get_inputs_id(&self) -> Vec<NodeId> {
        self.inputs.iter().map(|n| n.borrow().get_id()).collect()
    }

    /// Retrieves latches reference.
    pub fn get_latches(&self) -> Vec<AigNodeRef> {
        self.latches.clone()
    }

    /// Retrieves outputs reference.
    pub fn get_outputs(&self) -> Vec<AigEdge> {
        self.outputs.clone()
    }

    /// Retrieves all nodes (constant included) in creation order.
    pub fn get_nodes(&self) -> Vec<AigNodeRef> {
        self.order.iter().map(|id| self.nodes[id].clone()).collect()
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn num_ands(&self) -> usize {
        self.nodes.values().filter(|n| n.borrow().is_and()).count()
    }

    /// Number of references to the node: fanins of and gates and latches, plus primary outputs.
    pub fn fanout_count(&self, id: NodeId) -> usize {
        self.fanouts.get(&id).copied().unwrap_or(0)
    }

    fn check_edge_known(&self, edge: &AigEdge) -> Result<()> {
        let id = edge.get_node_id();
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(AigError::NodeDoesNotExist(id))
        }
    }

    fn check_valid_node_to_add(&self, node: &AigNode) -> Result<()> {
        match node {
            AigNode::False => Ok(()),
            AigNode::Input(id) => {
                if *id == 0 {
                    Err(AigError::IdZeroButNotFalse)
                } else {
                    Ok(())
                }
            }
            AigNode::And {
                id, fanin0, fanin1, ..
            } => {
                if *id == 0 {
                    return Err(AigError::IdZeroButNotFalse);
                }
                self.check_edge_known(fanin0)?;
                self.check_edge_known(fanin1)
            }
            AigNode::Latch { id, next, .. } => {
                if *id == 0 {
                    return Err(AigError::IdZeroButNotFalse);
                }
                self.check_edge_known(next)
            }
        }
    }

    fn add_fanout(&mut self, id: NodeId) {
        *self.fanouts.entry(id).or_insert(0) += 1;
    }

    /// Create a new (or retrieve existing) node within the AIG.
    /// This will fail if a different node with the same id already exists in the AIG,
    /// or if a node uses id 0 (reserved for constant node [`AigNode::False`]).
    ///
    /// The node is added as is: no constant folding nor structural hashing takes place,
    /// which allows building degenerate gates such as `a & !a`.
    ///
    /// ```rust
    /// use satmiter::{Aig, AigEdge, AigNode};
    /// let mut aig = Aig::new();
    /// let i1 = aig.add_node(AigNode::Input(1)).unwrap();
    /// let i1_ = aig.add_node(AigNode::Input(1)).unwrap(); // will simply retrieve the existing node
    /// assert_eq!(i1, i1_);
    ///
    /// let _and_gate =
    ///     aig.add_node(AigNode::and(
    ///         2,
    ///         AigEdge::new(i1.clone(), false),
    ///         AigEdge::new(i1.clone(), true)
    ///     )).unwrap(); // represent i1 & !i1 so will be false all the time
    ///
    /// // Node with id 0
    /// assert!(aig.add_node(AigNode::Input(0)).is_err());
    /// // Id 2 is already taken by the and gate
    /// assert!(aig.add_node(AigNode::Input(2)).is_err());
    /// ```
    pub fn add_node(&mut self, node: AigNode) -> Result<AigNodeRef> {
        self.check_valid_node_to_add(&node)?;

        let id = node.get_id();
        if let Some(n) = self.get_node(id) {
            return if *n.borrow() == node {
                Ok(n)
            } else {
                Err(AigError::DuplicateId(id))
            };
        }

        let n: AigNodeRef = Rc::new(RefCell::new(node));
        match n.borrow().deref() {
            AigNode::Input(_) => self.inputs.push(n.clone()),
            AigNode::Latch { next, .. } => {
                self.latches.push(n.clone());
                self.add_fanout(next.get_node_id());
            }
            AigNode::And { fanin0, fanin1, .. } => {
                self.add_fanout(fanin0.get_node_id());
                self.add_fanout(fanin1.get_node_id());
                self.strash.entry(strash_key(fanin0, fanin1)).or_insert(id);
            }
            AigNode::False => (),
        }
        self.nodes.insert(id, n.clone());
        self.order.push(id);
        self.next_id = self.next_id.max(id + 1);
        Ok(n)
    }

    /// Create a new primary input with a fresh id.
    pub fn add_input(&mut self) -> Result<AigEdge> {
        let node = self.add_node(AigNode::Input(self.next_id))?;
        Ok(AigEdge::new(node, false))
    }

    /// Returns an edge computing `a & b`.
    ///
    /// Constants are folded (`a & 0 = 0`, `a & 1 = a`), trivial cases are simplified
    /// (`a & a = a`, `a & !a = 0`) and an existing gate with the same fanins is reused.
    pub fn and(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        self.check_edge_known(&a)?;
        self.check_edge_known(&b)?;

        if a.is_cst_false() || b.is_cst_false() || a.is_complement_of(&b) {
            return Ok(self.const_false());
        }
        if a.is_cst_true() || a == b {
            return Ok(b);
        }
        if b.is_cst_true() {
            return Ok(a);
        }

        if let Some(&id) = self.strash.get(&strash_key(&a, &b)) {
            return self.get_edge(id, false);
        }

        let node = self.add_node(AigNode::and(self.next_id, a, b))?;
        Ok(AigEdge::new(node, false))
    }

    /// Returns an edge computing `a | b`.
    pub fn or(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        Ok(!self.and(!a, !b)?)
    }

    /// Returns an edge computing `a ^ b`.
    pub fn xor(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        let left = self.and(a.clone(), !b.clone())?;
        let right = self.and(!a, b)?;
        self.or(left, right)
    }

    /// Returns an edge computing `if c { t } else { e }`.
    pub fn mux(&mut self, c: AigEdge, t: AigEdge, e: AigEdge) -> Result<AigEdge> {
        let then = self.and(c.clone(), t)?;
        let other = self.and(!c, e)?;
        self.or(then, other)
    }

    /// Mark an existing node as an output.
    pub fn add_output(&mut self, id: NodeId, complement: bool) -> Result<()> {
        let edge = self.get_edge(id, complement)?;
        self.add_output_edge(edge)
    }

    /// Mark the given edge as an output.
    pub fn add_output_edge(&mut self, edge: AigEdge) -> Result<()> {
        self.check_edge_known(&edge)?;
        self.add_fanout(edge.get_node_id());
        self.outputs.push(edge);
        Ok(())
    }

    /// Fails if the AIG holds latches: only combinational networks can be encoded.
    pub fn check_combinational(&self) -> Result<()> {
        if self.latches.is_empty() {
            Ok(())
        } else {
            Err(AigError::SequentialNetwork(self.latches.len()))
        }
    }

    /// Computes the value of every node for the given input values (in declaration order).
    pub fn simulate(&self, inputs: &[bool]) -> Result<HashMap<NodeId, bool>> {
        self.check_combinational()?;
        if inputs.len() != self.inputs.len() {
            return Err(AigError::InputCountMismatch {
                expected: self.inputs.len(),
                got: inputs.len(),
            });
        }

        let positions: HashMap<NodeId, usize> = self
            .get_inputs_id()
            .into_iter()
            .enumerate()
            .map(|(k, id)| (id, k))
            .collect();

        let mut values = HashMap::with_capacity(self.order.len());
        for &id in &self.order {
            let value = match self.nodes[&id].borrow().deref() {
                AigNode::False => false,
                AigNode::Input(_) => inputs[positions[&id]],
                AigNode::And { fanin0, fanin1, .. } => {
                    edge_value(&values, fanin0)? && edge_value(&values, fanin1)?
                }
                AigNode::Latch { .. } => {
                    return Err(AigError::InvalidState(format!(
                        "latch {} found in a combinational network",
                        id
                    )));
                }
            };
            values.insert(id, value);
        }
        Ok(values)
    }

    /// Computes the value of every output for the given input values (in declaration order).
    pub fn evaluate(&self, inputs: &[bool]) -> Result<Vec<bool>> {
        let values = self.simulate(inputs)?;
        self.outputs
            .iter()
            .map(|output| edge_value(&values, output))
            .collect()
    }

    /// Checks that every edge refers to a node of this AIG and that ids are coherent.
    pub fn check_integrity(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for &id in &self.order {
            let node = self
                .get_node(id)
                .ok_or(AigError::InvalidState(format!("node {} is not registered", id)))?;
            if node.borrow().get_id() != id {
                return Err(AigError::InvalidState("incoherent node id".to_string()));
            }
            // Creation order is topological, fanins were necessarily seen before
            for fanin in node.borrow().get_fanins() {
                if !seen.contains(&fanin.get_node_id()) {
                    return Err(AigError::InvalidState(format!(
                        "node {} uses fanin {} which comes later",
                        id,
                        fanin.get_node_id()
                    )));
                }
            }
            seen.insert(id);
        }
        for output in &self.outputs {
            self.check_edge_known(output)?;
        }
        Ok(())
    }
}

impl Default for Aig {
    fn default() -> Self {
        Aig::new()
    }
}

fn edge_value(values: &HashMap<NodeId, bool>, edge: &AigEdge) -> Result<bool> {
    let id = edge.get_node_id();
    let value = values
        .get(&id)
        .copied()
        .ok_or(AigError::NodeDoesNotExist(id))?;
    Ok(value ^ edge.get_complement())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_node_test() {
        let mut aig = Aig::new();

        // Adding legit nodes
        let nf = AigNode::False;
        let rnf = aig.add_node(nf.clone()).unwrap();
        assert_eq!(*rnf.borrow(), nf);
        let i1 = AigNode::Input(1);
        let ri1 = aig.add_node(i1.clone()).unwrap();
        assert_eq!(*ri1.borrow(), i1);
        let a2 = AigNode::and(
            2,
            AigEdge::new(rnf.clone(), false),
            AigEdge::new(ri1.clone(), false),
        );
        let ra2 = aig.add_node(a2.clone()).unwrap();
        assert_eq!(*ra2.borrow(), a2);

        // Now, trying to add some illegal nodes
        assert!(aig.add_node(AigNode::Input(2)).is_err());
        assert!(
            aig.add_node(AigNode::and(
                1,
                AigEdge::new(rnf.clone(), false),
                AigEdge::new(rnf.clone(), false)
            ))
            .is_err()
        );

        // Trying to re-add existing nodes (legal)
        assert_eq!(*aig.add_node(nf.clone()).unwrap().borrow(), nf);
        assert_eq!(*aig.add_node(i1.clone()).unwrap().borrow(), i1);
        assert_eq!(*aig.add_node(a2.clone()).unwrap().borrow(), a2);
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn add_node_test_invalid_input_id0() {
        let mut a = Aig::new();
        assert!(matches!(
            a.add_node(AigNode::Input(0)),
            Err(AigError::IdZeroButNotFalse)
        ));
    }

    #[test]
    fn add_node_test_invalid_dependency() {
        let mut a = Aig::new();

        let fake_input = Rc::new(RefCell::new(AigNode::Input(1)));
        assert!(
            a.add_node(AigNode::and(
                2,
                AigEdge::new(fake_input.clone(), false),
                AigEdge::new(fake_input.clone(), false),
            ))
            .is_err()
        );

        assert!(
            a.add_node(AigNode::latch(
                2,
                AigEdge::new(fake_input.clone(), false),
                None
            ))
            .is_err()
        );
    }

    #[test]
    fn inputs_keep_declaration_order() {
        let mut aig = Aig::new();
        aig.add_node(AigNode::Input(5)).unwrap();
        aig.add_node(AigNode::Input(2)).unwrap();
        let fresh = aig.add_input().unwrap();
        assert_eq!(fresh.get_node_id(), 6);
        assert_eq!(aig.get_inputs_id(), vec![5, 2, 6]);
    }

    #[test]
    fn strash_and_folding() {
        let mut aig = Aig::new();
        let a = aig.add_input().unwrap();
        let b = aig.add_input().unwrap();

        let ab = aig.and(a.clone(), b.clone()).unwrap();
        let ba = aig.and(b.clone(), a.clone()).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(aig.num_ands(), 1);

        assert_eq!(aig.and(a.clone(), a.clone()).unwrap(), a);
        assert!(aig.and(a.clone(), !a.clone()).unwrap().is_cst_false());
        assert!(aig.and(a.clone(), aig.const_false()).unwrap().is_cst_false());
        assert_eq!(aig.and(aig.const_true(), b.clone()).unwrap(), b);
        assert_eq!(aig.and(b.clone(), aig.const_true()).unwrap(), b);
        assert_eq!(aig.num_ands(), 1);
    }

    #[test]
    fn fanout_count_includes_outputs() {
        let mut aig = Aig::new();
        let a = aig.add_input().unwrap();
        let b = aig.add_input().unwrap();
        let c = aig.add_input().unwrap();
        let ab = aig.and(a.clone(), b.clone()).unwrap();
        assert_eq!(aig.fanout_count(ab.get_node_id()), 0);
        let top = aig.and(ab.clone(), c).unwrap();
        assert_eq!(aig.fanout_count(ab.get_node_id()), 1);
        aig.add_output_edge(top.clone()).unwrap();
        aig.add_output_edge(!ab.clone()).unwrap();
        assert_eq!(aig.fanout_count(ab.get_node_id()), 2);
        assert_eq!(aig.fanout_count(top.get_node_id()), 1);
        assert_eq!(aig.fanout_count(a.get_node_id()), 1);
    }

    #[test]
    fn evaluate_gates() {
        let mut aig = Aig::new();
        let a = aig.add_input().unwrap();
        let b = aig.add_input().unwrap();
        let c = aig.add_input().unwrap();
        let and = aig.and(a.clone(), b.clone()).unwrap();
        let or = aig.or(a.clone(), b.clone()).unwrap();
        let xor = aig.xor(a.clone(), b.clone()).unwrap();
        let mux = aig.mux(c.clone(), a.clone(), b.clone()).unwrap();
        for e in [and, or, xor, mux] {
            aig.add_output_edge(e).unwrap();
        }

        for k in 0..8u32 {
            let (va, vb, vc) = (k & 1 != 0, k & 2 != 0, k & 4 != 0);
            let outs = aig.evaluate(&[va, vb, vc]).unwrap();
            assert_eq!(outs, vec![va && vb, va || vb, va ^ vb, if vc { va } else { vb }]);
        }
    }

    #[test]
    fn simulate_rejects_bad_inputs_and_latches() {
        let mut aig = Aig::new();
        let a = aig.add_input().unwrap();
        assert!(matches!(
            aig.simulate(&[]),
            Err(AigError::InputCountMismatch {
                expected: 1,
                got: 0
            })
        ));

        aig.add_node(AigNode::latch(9, a, Some(false))).unwrap();
        assert!(matches!(
            aig.check_combinational(),
            Err(AigError::SequentialNetwork(1))
        ));
        assert!(aig.simulate(&[true]).is_err());
    }
}
