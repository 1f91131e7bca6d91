//! Multiplexer queries on and gates.
//!
//! A node is multiplexer-shaped when it reads `!(x & t') & !(!x & e')`, that is:
//! - both its fanins are complemented and point at and gates
//! - one fanin of the first gate is the complement of one fanin of the second gate.
//!
//! The check only looks at the node, its fanins and their own fanins, so it is O(1).

use super::{AigEdge, AigNode};

/// The operands of a recognized multiplexer: `node = if condition { then } else { else }`.
///
/// The condition is always a regular (non complemented) edge, polarities are carried by
/// the two data operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxOperands {
    pub condition: AigEdge,
    pub then_edge: AigEdge,
    pub else_edge: AigEdge,
}

impl AigNode {
    /// Finds the complementary pair of the multiplexer pattern.
    ///
    /// Returns `(x, a, b)` such that the node computes `!(x & a) & !(!x & b)`.
    fn mux_parts(&self) -> Option<(AigEdge, AigEdge, AigEdge)> {
        let (f0, f1) = self.get_and_fanins()?;
        if !f0.get_complement() || !f1.get_complement() {
            return None;
        }
        let (p00, p01) = f0.node.borrow().get_and_fanins()?;
        let (p10, p11) = f1.node.borrow().get_and_fanins()?;

        for (x, a) in [(&p00, &p01), (&p01, &p00)] {
            for (y, b) in [(&p10, &p11), (&p11, &p10)] {
                if x.is_complement_of(y) {
                    return Some((x.clone(), a.clone(), b.clone()));
                }
            }
        }
        None
    }

    /// Returns true if the node is an and gate implementing a 2-to-1 multiplexer.
    pub fn is_mux_type(&self) -> bool {
        self.mux_parts().is_some()
    }

    /// Extracts condition, then and else operands of a multiplexer-shaped node.
    ///
    /// # Panics
    ///
    /// Panics if the node is not multiplexer-shaped, check [`AigNode::is_mux_type`] first.
    pub fn recognize_mux(&self) -> MuxOperands {
        let (x, a, b) = self.mux_parts().unwrap_or_else(|| {
            panic!(
                "node {} is not a multiplexer, check is_mux_type before recognizing it",
                self.get_id()
            )
        });

        // node = !(x & a) & !(!x & b) = ite(x, !a, !b)
        let (then_edge, else_edge) = if x.get_complement() {
            (!b, !a)
        } else {
            (!a, !b)
        };
        MuxOperands {
            condition: x.regular(),
            then_edge,
            else_edge,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{Aig, AigEdge};

    fn value(values: &std::collections::HashMap<u64, bool>, edge: &AigEdge) -> bool {
        values[&edge.get_node_id()] ^ edge.get_complement()
    }

    #[test]
    fn recognize_built_mux() {
        let mut aig = Aig::new();
        let c = aig.add_input().unwrap();
        let t = aig.add_input().unwrap();
        let e = aig.add_input().unwrap();
        let m = aig.mux(c.clone(), t.clone(), !e.clone()).unwrap();
        aig.add_output_edge(m.clone()).unwrap();

        let root = m.get_node();
        assert!(root.borrow().is_mux_type());
        let ops = root.borrow().recognize_mux();
        assert!(!ops.condition.get_complement());

        for k in 0..8u32 {
            let inputs = [k & 1 != 0, k & 2 != 0, k & 4 != 0];
            let values = aig.simulate(&inputs).unwrap();
            let expected = if value(&values, &ops.condition) {
                value(&values, &ops.then_edge)
            } else {
                value(&values, &ops.else_edge)
            };
            assert_eq!(values[&m.get_node_id()], expected);
        }
    }

    #[test]
    fn recognize_complemented_condition() {
        let mut aig = Aig::new();
        let c = aig.add_input().unwrap();
        let t = aig.add_input().unwrap();
        let e = aig.add_input().unwrap();
        // Condition shows up complemented in the first gate
        let m = aig.mux(!c.clone(), t.clone(), e.clone()).unwrap();
        let root = m.get_node();
        let ops = root.borrow().recognize_mux();
        assert_eq!(ops.condition, c);

        for k in 0..8u32 {
            let inputs = [k & 1 != 0, k & 2 != 0, k & 4 != 0];
            let values = aig.simulate(&inputs).unwrap();
            let expected = if value(&values, &ops.condition) {
                value(&values, &ops.then_edge)
            } else {
                value(&values, &ops.else_edge)
            };
            assert_eq!(values[&m.get_node_id()], expected);
        }
    }

    #[test]
    fn xor_is_mux_shaped() {
        let mut aig = Aig::new();
        let a = aig.add_input().unwrap();
        let b = aig.add_input().unwrap();
        let x = aig.xor(a.clone(), b.clone()).unwrap();
        let root = x.get_node();
        assert!(root.borrow().is_mux_type());
        let ops = root.borrow().recognize_mux();
        // Both data operands are the same variable with opposite polarities
        assert!(ops.then_edge.is_complement_of(&ops.else_edge));
    }

    #[test]
    fn plain_gates_are_not_mux() {
        let mut aig = Aig::new();
        let a = aig.add_input().unwrap();
        let b = aig.add_input().unwrap();
        let c = aig.add_input().unwrap();
        let ab = aig.and(a.clone(), b.clone()).unwrap();
        let abc = aig.and(ab.clone(), c.clone()).unwrap();
        let or = aig.or(ab.clone(), c.clone()).unwrap();
        assert!(!ab.get_node().borrow().is_mux_type());
        assert!(!abc.get_node().borrow().is_mux_type());
        assert!(!or.get_node().borrow().is_mux_type());
        assert!(!a.get_node().borrow().is_mux_type());
    }

    #[test]
    #[should_panic]
    fn recognize_non_mux_panics() {
        let mut aig = Aig::new();
        let a = aig.add_input().unwrap();
        let b = aig.add_input().unwrap();
        let ab = aig.and(a, b).unwrap();
        let _ = ab.get_node().borrow().recognize_mux();
    }
}
