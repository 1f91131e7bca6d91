//! An [`AigEdge`] points at an [`AigNode`] and can be complemented (indicates the presence of a NOT gate).
//!
//! Negation is a property of the edge, never of the node: `!edge` flips the bit and keeps the
//! same node handle, and [`AigEdge::regular`] strips it to get back the plain node reference.
//!
//! [`AigNode`]: crate::AigNode

use std::ops::Not;

use crate::NodeId;

use super::AigNodeRef;

/// A directed edge representing a fanin for AIG nodes.
///
/// The edge can carry an inverter according to the value of `complement`.
///
/// For example:
///
/// ```rust
/// use satmiter::{Aig, AigEdge};
/// let aig = Aig::new();
/// let fanin_false = aig.const_false();
/// let fanin_true = aig.const_true();
/// assert_eq!(fanin_false, !fanin_true);
/// assert_eq!(fanin_true.regular(), fanin_false);
/// ```
#[derive(Clone, Debug, Eq)]
pub struct AigEdge {
    /// The node the edge is refering to.
    /// It is wrapped in Rc<RefCell<_>> to allow multiple nodes refering to it.
    pub(super) node: AigNodeRef,
    /// Set to true if signal should be inverted.
    pub(super) complement: bool,
}

impl Not for AigEdge {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.complement = !self.complement;
        self
    }
}

impl PartialEq for AigEdge {
    fn eq(&self, other: &Self) -> bool {
        self.complement == other.complement && self.get_node_id() == other.get_node_id()
    }
}

impl From<&AigEdge> for (NodeId, bool) {
    fn from(edge: &AigEdge) -> Self {
        (edge.get_node_id(), edge.get_complement())
    }
}

impl AigEdge {
    pub fn new(node: AigNodeRef, complement: bool) -> Self {
        AigEdge { node, complement }
    }

    pub fn get_node(&self) -> AigNodeRef {
        self.node.clone()
    }

    pub fn get_node_id(&self) -> NodeId {
        self.node.borrow().get_id()
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }

    /// The same edge without its inverter.
    pub fn regular(&self) -> AigEdge {
        AigEdge {
            node: self.node.clone(),
            complement: false,
        }
    }

    /// Complements the edge if `complement` is set.
    pub fn not_if(self, complement: bool) -> AigEdge {
        if complement { !self } else { self }
    }

    pub fn is_cst_false(&self) -> bool {
        self.get_node_id() == 0 && !self.complement
    }

    pub fn is_cst_true(&self) -> bool {
        self.get_node_id() == 0 && self.complement
    }

    pub fn is_complement_of(&self, other: &AigEdge) -> bool {
        self.get_node_id() == other.get_node_id() && self.get_complement() ^ other.get_complement()
    }
}
