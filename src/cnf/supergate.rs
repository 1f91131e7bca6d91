//! Collection of supergates: maximal multi-input conjunctions rooted at an and gate.
//!
//! Starting from the root, the collector walks down the fanins and keeps expanding and gates
//! as long as they are reached through a regular edge and are not shared with the rest of the
//! circuit. Everything else becomes a leaf, and the root computes the conjunction of the leaves.

use std::collections::HashSet;

use crate::{Aig, AigEdge, AigNodeRef, NodeId};

/// What the collector found while gathering the leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupergateStatus {
    /// Every leaf was reached once.
    Unique,
    /// Some leaf was reached several times with the same polarity. It is kept once,
    /// the gate is still valid.
    Duplicates,
    /// A leaf was reached with both polarities: the root is constant false and the leaves
    /// have been cleared.
    Contradiction,
}

impl SupergateStatus {
    fn merge(self, other: SupergateStatus) -> SupergateStatus {
        use SupergateStatus::*;
        match (self, other) {
            (Contradiction, _) | (_, Contradiction) => Contradiction,
            (Duplicates, _) | (_, Duplicates) => Duplicates,
            _ => Unique,
        }
    }
}

/// Gathers the leaves of a supergate.
///
/// The collector owns its leaf buffer and its visited set, so it can be reused from one root
/// to the next: both are reset at the start of [`SupergateCollector::collect`], and the
/// visited set is emptied again before it returns.
#[derive(Debug, Default)]
pub struct SupergateCollector {
    leaves: Vec<AigEdge>,
    marked: HashSet<NodeId>,
}

impl SupergateCollector {
    pub fn new() -> Self {
        SupergateCollector::default()
    }

    /// Leaves of the last collected supergate, in discovery order.
    ///
    /// Empty after a [`SupergateStatus::Contradiction`].
    pub fn leaves(&self) -> &[AigEdge] {
        &self.leaves
    }

    /// Collects the supergate rooted at `root`.
    ///
    /// A node stops the expansion (and becomes a leaf) when it is reached through a
    /// complemented edge, is not an and gate, has more than one fanout, or, if `stop_at_mux`
    /// is set, is multiplexer-shaped.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not an and gate.
    pub fn collect(&mut self, aig: &Aig, root: &AigNodeRef, stop_at_mux: bool) -> SupergateStatus {
        assert!(
            root.borrow().is_and(),
            "supergates are rooted at and gates, got {:?}",
            root.borrow()
        );

        self.leaves.clear();
        self.marked.clear();
        let status = self.collect_rec(aig, &AigEdge::new(root.clone(), false), true, stop_at_mux);
        self.marked.clear();

        if status == SupergateStatus::Contradiction {
            self.leaves.clear();
        }
        log::trace!(
            "supergate of node {}: {} leaves ({:?})",
            root.borrow().get_id(),
            self.leaves.len(),
            status
        );
        status
    }

    fn collect_rec(
        &mut self,
        aig: &Aig,
        edge: &AigEdge,
        first: bool,
        stop_at_mux: bool,
    ) -> SupergateStatus {
        let id = edge.get_node_id();

        // Only leaves are marked, so the node is already a leaf in one polarity or the other
        if self.marked.contains(&id) {
            return if self.leaves.contains(edge) {
                SupergateStatus::Duplicates
            } else {
                SupergateStatus::Contradiction
            };
        }

        let node = edge.get_node();
        if !first {
            let is_leaf = {
                let n = node.borrow();
                edge.get_complement()
                    || !n.is_and()
                    || aig.fanout_count(id) > 1
                    || (stop_at_mux && n.is_mux_type())
            };
            if is_leaf {
                self.leaves.push(edge.clone());
                self.marked.insert(id);
                return SupergateStatus::Unique;
            }
        }

        let Some((fanin0, fanin1)) = node.borrow().get_and_fanins() else {
            unreachable!("only and gates are expanded");
        };
        let status0 = self.collect_rec(aig, &fanin0, false, stop_at_mux);
        let status1 = self.collect_rec(aig, &fanin1, false, stop_at_mux);
        status0.merge(status1)
    }
}
