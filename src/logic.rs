//! Logic networks: nodes with an arbitrary number of fanins and a local function.
//!
//! This is the network kind handled by the cover-based encoder ([`crate::cnf::cover`]).
//! Each node's function is given either as a constant, a truth table, or directly as a pair of
//! on-set and off-set covers. Primary outputs are objects of their own, with their own id,
//! driven by one fanin through an optional inverter.
//!
//! A network can also be obtained from an [`Aig`] with [`LogicNetwork::from_aig`], every and
//! gate becoming a two-input node.

pub mod cover;

use std::collections::HashMap;

use crate::{Aig, AigError, AigNode, NodeId, Result};

use cover::{Cover, LocalCovers, check_partition, derive_covers, truth_table_width};

/// The local function of a logic node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFunction {
    Const(bool),
    /// Entry `m` is the node value when fanin `i` takes bit `i` of `m`.
    TruthTable(Vec<bool>),
    /// On-set and off-set covers, which must partition the fanin space.
    Sop { on: Cover, off: Cover },
}

/// An internal node of a [`LogicNetwork`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicNode {
    pub id: NodeId,
    pub fanins: Vec<NodeId>,
    pub function: NodeFunction,
}

/// A primary output of a [`LogicNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicOutput {
    pub id: NodeId,
    pub fanin: NodeId,
    pub complement: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectKind {
    Input,
    Node(usize),
    Output,
}

/// A combinational logic network.
///
/// Ids are given sequentially from 1, in creation order, to inputs, nodes and outputs alike.
/// Nodes can only use existing inputs and nodes as fanins, so the creation order is
/// topological.
///
/// ```rust
/// use satmiter::logic::{LogicNetwork, NodeFunction};
///
/// let mut network = LogicNetwork::new();
/// let a = network.add_input();
/// let b = network.add_input();
/// // a ^ b
/// let x = network
///     .add_node(vec![a, b], NodeFunction::TruthTable(vec![false, true, true, false]))
///     .unwrap();
/// network.add_output(x, false).unwrap();
/// assert_eq!(network.evaluate(&[true, false]).unwrap(), vec![true]);
/// assert!(network.add_node(vec![a], NodeFunction::TruthTable(vec![true])).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogicNetwork {
    inputs: Vec<NodeId>,
    nodes: Vec<LogicNode>,
    outputs: Vec<LogicOutput>,
    kinds: HashMap<NodeId, ObjectKind>,
    next_id: NodeId,
}

impl LogicNetwork {
    pub fn new() -> Self {
        LogicNetwork {
            next_id: 1,
            ..Default::default()
        }
    }

    fn fresh_id(&mut self, kind: ObjectKind) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.kinds.insert(id, kind);
        id
    }

    fn check_signal(&self, id: NodeId) -> Result<()> {
        match self.kinds.get(&id) {
            Some(ObjectKind::Input) | Some(ObjectKind::Node(_)) => Ok(()),
            Some(ObjectKind::Output) => Err(AigError::OutputAsFanin(id)),
            None => Err(AigError::NodeDoesNotExist(id)),
        }
    }

    /// Creates a new primary input.
    pub fn add_input(&mut self) -> NodeId {
        let id = self.fresh_id(ObjectKind::Input);
        self.inputs.push(id);
        id
    }

    /// Creates a new node.
    ///
    /// Fails if a fanin is unknown or is an output, or if the function does not match the
    /// number of fanins (truth table size, cube width, covers not partitioning the space).
    pub fn add_node(&mut self, fanins: Vec<NodeId>, function: NodeFunction) -> Result<NodeId> {
        for &fanin in &fanins {
            self.check_signal(fanin)?;
        }
        match &function {
            NodeFunction::Const(_) => (),
            NodeFunction::TruthTable(truth) => {
                let width = truth_table_width(truth)?;
                if width != fanins.len() {
                    return Err(cover::CoverError::TruthTableSize {
                        fanins: fanins.len(),
                        expected: 1 << fanins.len(),
                        got: truth.len(),
                    }
                    .into());
                }
            }
            NodeFunction::Sop { on, off } => {
                if on.width() != fanins.len() {
                    return Err(cover::CoverError::WidthMismatch {
                        expected: fanins.len(),
                        got: on.width(),
                    }
                    .into());
                }
                check_partition(on, off)?;
            }
        }

        let id = self.fresh_id(ObjectKind::Node(self.nodes.len()));
        self.nodes.push(LogicNode {
            id,
            fanins,
            function,
        });
        Ok(id)
    }

    /// Creates a new primary output driven by `fanin`, inverted if `complement` is set.
    pub fn add_output(&mut self, fanin: NodeId, complement: bool) -> Result<NodeId> {
        self.check_signal(fanin)?;
        let id = self.fresh_id(ObjectKind::Output);
        self.outputs.push(LogicOutput {
            id,
            fanin,
            complement,
        });
        Ok(id)
    }

    /// Inputs in declaration order.
    pub fn get_inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Internal nodes in creation (topological) order.
    pub fn get_nodes(&self) -> &[LogicNode] {
        &self.nodes
    }

    pub fn get_node(&self, id: NodeId) -> Option<&LogicNode> {
        match self.kinds.get(&id) {
            Some(&ObjectKind::Node(k)) => Some(&self.nodes[k]),
            _ => None,
        }
    }

    pub fn get_outputs(&self) -> &[LogicOutput] {
        &self.outputs
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// The pair of covers describing the node to the cover-based encoder.
    ///
    /// Truth tables are turned into prime covers, all primes if `all_primes` is set, an
    /// irredundant subset otherwise. Given covers are used as they are.
    pub fn covers(&self, node: &LogicNode, all_primes: bool) -> Result<LocalCovers> {
        let covers = match &node.function {
            NodeFunction::Const(value) => LocalCovers::Constant(*value),
            NodeFunction::TruthTable(truth) => derive_covers(truth, all_primes)?,
            NodeFunction::Sop { on, .. } if on.is_empty() => LocalCovers::Constant(false),
            NodeFunction::Sop { off, .. } if off.is_empty() => LocalCovers::Constant(true),
            NodeFunction::Sop { on, off } => LocalCovers::Covers {
                on: on.clone(),
                off: off.clone(),
            },
        };
        Ok(covers)
    }

    /// Computes the value of every input and node for the given input values
    /// (in declaration order).
    pub fn simulate(&self, inputs: &[bool]) -> Result<HashMap<NodeId, bool>> {
        if inputs.len() != self.inputs.len() {
            return Err(AigError::InputCountMismatch {
                expected: self.inputs.len(),
                got: inputs.len(),
            });
        }

        let mut values: HashMap<NodeId, bool> = self
            .inputs
            .iter()
            .copied()
            .zip(inputs.iter().copied())
            .collect();
        for node in &self.nodes {
            let fanins = node
                .fanins
                .iter()
                .map(|id| values.get(id).copied().ok_or(AigError::NodeDoesNotExist(*id)))
                .collect::<Result<Vec<bool>>>()?;
            let value = match &node.function {
                NodeFunction::Const(value) => *value,
                NodeFunction::TruthTable(truth) => {
                    let minterm = fanins
                        .iter()
                        .enumerate()
                        .fold(0usize, |m, (i, &v)| m | (usize::from(v) << i));
                    truth[minterm]
                }
                NodeFunction::Sop { on, .. } => on.contains(&fanins),
            };
            values.insert(node.id, value);
        }
        Ok(values)
    }

    /// Computes the value of every output for the given input values (in declaration order).
    pub fn evaluate(&self, inputs: &[bool]) -> Result<Vec<bool>> {
        let values = self.simulate(inputs)?;
        self.outputs
            .iter()
            .map(|output| {
                values
                    .get(&output.fanin)
                    .map(|v| v ^ output.complement)
                    .ok_or(AigError::NodeDoesNotExist(output.fanin))
            })
            .collect()
    }

    /// Converts a combinational [`Aig`] into a logic network.
    ///
    /// Inputs keep their declaration order, every and gate becomes a two-input node with a
    /// truth table, inverters on fanins are folded into the truth tables. The constant node
    /// only shows up (as a constant node) if something uses it.
    pub fn from_aig(aig: &Aig) -> Result<LogicNetwork> {
        aig.check_combinational()?;

        let mut network = LogicNetwork::new();
        let mut map: HashMap<NodeId, NodeId> = HashMap::new();
        for id in aig.get_inputs_id() {
            map.insert(id, network.add_input());
        }

        for node in aig.get_nodes() {
            let node = node.borrow();
            let AigNode::And {
                id,
                fanin0,
                fanin1,
            } = &*node
            else {
                continue;
            };

            let mut fanins = Vec::with_capacity(2);
            for fanin in [fanin0, fanin1] {
                fanins.push(network.aig_signal(aig, &mut map, fanin.get_node_id())?);
            }
            let (c0, c1) = (fanin0.get_complement(), fanin1.get_complement());
            let truth = (0..4usize)
                .map(|m| ((m & 1 != 0) ^ c0) && ((m & 2 != 0) ^ c1))
                .collect();
            map.insert(*id, network.add_node(fanins, NodeFunction::TruthTable(truth))?);
        }

        for output in aig.get_outputs() {
            let fanin = network.aig_signal(aig, &mut map, output.get_node_id())?;
            network.add_output(fanin, output.get_complement())?;
        }
        Ok(network)
    }

    /// Id of the signal standing for an AIG node, creating the constant node on first use.
    fn aig_signal(
        &mut self,
        aig: &Aig,
        map: &mut HashMap<NodeId, NodeId>,
        id: NodeId,
    ) -> Result<NodeId> {
        if let Some(&mapped) = map.get(&id) {
            return Ok(mapped);
        }
        match aig.get_node(id).map(|n| n.borrow().is_false()) {
            Some(true) => {
                let cst = self.add_node(Vec::new(), NodeFunction::Const(false))?;
                map.insert(id, cst);
                Ok(cst)
            }
            Some(false) => Err(AigError::InvalidState(format!(
                "node {} is used before being converted",
                id
            ))),
            None => Err(AigError::NodeDoesNotExist(id)),
        }
    }
}
