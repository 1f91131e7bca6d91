//! The variable table: which SAT variable stands for which network node.

use std::collections::HashMap;

use crate::NodeId;

use super::Var;

/// Assigns SAT variables to network nodes, lazily.
///
/// A node gets its variable the first time an encoder needs it, whichever encoder that is.
/// Variables are numbered from 1 in allocation order, and the allocation order is kept: the
/// structural encoder uses it as its work list.
#[derive(Debug, Clone, Default)]
pub struct VarMap {
    vars: HashMap<NodeId, Var>,
    order: Vec<NodeId>,
}

impl VarMap {
    pub fn new() -> Self {
        VarMap::default()
    }

    /// The variable of the node, if it has one.
    pub fn get(&self, id: NodeId) -> Option<Var> {
        self.vars.get(&id).copied()
    }

    /// The variable of the node, allocating a fresh one on first use.
    pub fn get_or_alloc(&mut self, id: NodeId) -> Var {
        if let Some(&var) = self.vars.get(&id) {
            return var;
        }
        let var = Var::new(self.order.len() as u32 + 1);
        self.vars.insert(id, var);
        self.order.push(id);
        log::trace!("node {} -> var {}", id, var.index());
        var
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.vars.contains_key(&id)
    }

    /// Number of allocated variables.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The node which received the `k`-th variable (0-based).
    pub fn node_at(&self, k: usize) -> Option<NodeId> {
        self.order.get(k).copied()
    }

    /// Nodes in allocation order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }
}
