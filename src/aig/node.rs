use std::{cell::RefCell, rc::Rc};

use super::AigEdge;

/// A node id.
///
/// The constant node [`AigNode::False`] has id 0 by convention. Also, id must be unique.
pub type NodeId = u64;

/// An AIG node.
///
/// Each node has an id. By convention, id for constant node `False` is 0. The id must be unique.
///
/// Fanouts are not stored in the node itself, the owning [`Aig`] counts them.
///
/// [`Aig`]: super::Aig
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AigNode {
    /// The constant low/false signal.
    False,
    /// A primary input.
    Input(NodeId),
    /// A latch (for sequential circuits).
    ///
    /// Latches can be represented but a network containing some cannot be encoded into CNF.
    Latch {
        id: NodeId,
        next: AigEdge,
        init: Option<bool>,
    },
    /// An AND gate with two ordered fanins, each carrying its own complement bit.
    And {
        id: NodeId,
        fanin0: AigEdge,
        fanin1: AigEdge,
    },
}

/// A wrapper for AIG nodes to allow multiple references to it.
pub type AigNodeRef = Rc<RefCell<AigNode>>;

impl AigNode {
    /// Returns a new and gate.
    pub fn and(id: NodeId, fanin0: AigEdge, fanin1: AigEdge) -> Self {
        if id == 0 {
            panic!(
                "Hey, you are trying to create an AND gate with id=0. \
                Id=0 is reserved for the constant node AigNode::False."
            )
        }
        AigNode::And { id, fanin0, fanin1 }
    }

    /// Returns a new latch.
    pub fn latch(id: NodeId, next: AigEdge, init: Option<bool>) -> Self {
        if id == 0 {
            panic!(
                "Hey, you are trying to create a latch with id=0. \
                Id=0 is reserved for the constant node AigNode::False."
            )
        }
        AigNode::Latch { id, next, init }
    }

    pub fn is_false(&self) -> bool {
        matches!(self, AigNode::False)
    }

    pub fn is_input(&self) -> bool {
        matches!(self, AigNode::Input(_))
    }

    pub fn is_latch(&self) -> bool {
        matches!(self, AigNode::Latch { .. })
    }

    pub fn is_and(&self) -> bool {
        matches!(self, AigNode::And { .. })
    }

    pub fn get_id(&self) -> NodeId {
        match *self {
            AigNode::False => 0,
            AigNode::Input(id) => id,
            AigNode::Latch { id, .. } => id,
            AigNode::And { id, .. } => id,
        }
    }

    pub fn get_fanins(&self) -> Vec<AigEdge> {
        match self {
            AigNode::Latch { next, .. } => vec![next.clone()],
            AigNode::And { fanin0, fanin1, .. } => vec![fanin0.clone(), fanin1.clone()],
            _ => vec![],
        }
    }

    /// Returns both fanins of an and gate, else [`None`].
    pub fn get_and_fanins(&self) -> Option<(AigEdge, AigEdge)> {
        match self {
            AigNode::And { fanin0, fanin1, .. } => Some((fanin0.clone(), fanin1.clone())),
            _ => None,
        }
    }
}
