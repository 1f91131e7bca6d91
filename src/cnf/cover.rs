//! Cover-based encoding of a [`LogicNetwork`].
//!
//! Every node is described by its on-set and off-set covers. A cube of the off-set reads
//! "when these fanin values hold, the node is false", which is one clause: the cube's literals
//! negated, plus the negative node literal. The on-set gives the same clauses with the positive
//! node literal.
//!
//! Each primary output gets its own variable, bound to its (possibly inverted) fanin and
//! asserted true by a unit clause. Every output is asserted on its own, unlike the structural
//! path which asserts their disjunction.

use crate::{
    Result,
    logic::{
        LogicNetwork,
        cover::{Cover, CubeLit, LocalCovers},
    },
};

use super::{ClauseSink, Emission, Lit, Var, submit, varmap::VarMap};

/// Emits the clauses of a node whose fanins are `fanins`.
///
/// # Panics
///
/// Panics if a cube does not have one position per fanin.
pub fn emit_covers<S: ClauseSink + ?Sized>(
    sink: &mut S,
    node: Var,
    fanins: &[Var],
    covers: &LocalCovers,
) -> Emission {
    match covers {
        LocalCovers::Constant(value) => submit(sink, &[node.lit(!value)]),
        LocalCovers::Covers { on, off } => {
            emit_cover(sink, node.negative(), fanins, off)?;
            emit_cover(sink, node.positive(), fanins, on)
        }
    }
}

fn emit_cover<S: ClauseSink + ?Sized>(
    sink: &mut S,
    node: Lit,
    fanins: &[Var],
    cover: &Cover,
) -> Emission {
    assert_eq!(
        cover.width(),
        fanins.len(),
        "cover width does not match the number of fanins"
    );

    let mut clause = Vec::with_capacity(fanins.len() + 1);
    for cube in cover.cubes() {
        clause.clear();
        for (lit, fanin) in cube.lits().iter().zip(fanins) {
            match lit {
                CubeLit::Zero => clause.push(fanin.positive()),
                CubeLit::One => clause.push(fanin.negative()),
                CubeLit::DontCare => (),
            }
        }
        clause.push(node);
        submit(sink, &clause)?;
    }
    Ok(())
}

/// Emits `output = fanin` (or `output = !fanin` if `complement` is set), and asserts the
/// output.
pub fn emit_output<S: ClauseSink + ?Sized>(
    sink: &mut S,
    output: Var,
    fanin: Var,
    complement: bool,
) -> Emission {
    let (o, f) = (output.positive(), fanin.lit(complement));
    submit(sink, &[!f, o])?;
    submit(sink, &[f, !o])?;
    submit(sink, &[o])
}

/// Encodes a [`LogicNetwork`] for miter solving.
///
/// Variables are given lazily, a node receiving its own after the ones of its fanins.
///
/// ```rust
/// use satmiter::{cnf::{Cnf, cover::CoverEncoder}, logic::{LogicNetwork, NodeFunction}};
///
/// let mut network = LogicNetwork::new();
/// let a = network.add_input();
/// let b = network.add_input();
/// let and = network
///     .add_node(vec![a, b], NodeFunction::TruthTable(vec![false, false, false, true]))
///     .unwrap();
/// network.add_output(and, false).unwrap();
///
/// let mut cnf = Cnf::new();
/// assert!(CoverEncoder::new(false).encode(&network, &mut cnf).unwrap().is_ok());
/// // 2 off-set cubes, 1 on-set cube, 3 clauses for the output
/// assert_eq!(cnf.len(), 6);
/// ```
#[derive(Debug)]
pub struct CoverEncoder {
    all_primes: bool,
    vars: VarMap,
}

impl CoverEncoder {
    /// A new encoder. With `all_primes`, truth tables are turned into covers made of all their
    /// prime implicants instead of an irredundant subset.
    pub fn new(all_primes: bool) -> Self {
        CoverEncoder {
            all_primes,
            vars: VarMap::new(),
        }
    }

    /// Variable table of the last pass.
    pub fn vars(&self) -> &VarMap {
        &self.vars
    }

    /// Encodes `network` into `sink`.
    ///
    /// The covers of every node are derived before anything is emitted, so a malformed node
    /// fails the call with an empty sink. Otherwise returns the outcome of the emission.
    pub fn encode<S: ClauseSink + ?Sized>(
        &mut self,
        network: &LogicNetwork,
        sink: &mut S,
    ) -> Result<Emission> {
        let covers = network
            .get_nodes()
            .iter()
            .map(|node| network.covers(node, self.all_primes))
            .collect::<Result<Vec<_>>>()?;

        self.vars = VarMap::new();
        let emission = self.emit_network(network, &covers, sink);
        log::debug!(
            "cover encoding: {} vars, {} nodes, {} outputs{}",
            self.vars.len(),
            network.num_nodes(),
            network.num_outputs(),
            if emission.is_err() { ", trivially unsat" } else { "" }
        );
        Ok(emission)
    }

    fn emit_network<S: ClauseSink + ?Sized>(
        &mut self,
        network: &LogicNetwork,
        covers: &[LocalCovers],
        sink: &mut S,
    ) -> Emission {
        for (node, covers) in network.get_nodes().iter().zip(covers) {
            let fanins: Vec<Var> = node
                .fanins
                .iter()
                .map(|&id| self.vars.get_or_alloc(id))
                .collect();
            let var = self.vars.get_or_alloc(node.id);
            log::trace!("node {}: {:?}", node.id, covers);
            emit_covers(sink, var, &fanins, covers)?;
        }

        for output in network.get_outputs() {
            let fanin = self.vars.get_or_alloc(output.fanin);
            let var = self.vars.get_or_alloc(output.id);
            emit_output(sink, var, fanin, output.complement)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        AigError,
        cnf::{Clause, Cnf, TriviallyUnsat},
        logic::{
            NodeFunction,
            cover::{CoverError, derive_covers},
        },
    };
    use test_log::test;

    /// Checks the clauses of one node against its truth table, over every assignment of the
    /// fanins and the node.
    fn check_round_trip(truth: &[bool], all_primes: bool) {
        let width = truth.len().trailing_zeros() as usize;
        let fanins: Vec<Var> = (1..=width as u32).map(Var::new).collect();
        let node = Var::new(width as u32 + 1);

        let mut cnf = Cnf::new();
        let covers = derive_covers(truth, all_primes).unwrap();
        emit_covers(&mut cnf, node, &fanins, &covers).unwrap();

        for bits in 0..(1usize << (width + 1)) {
            let value = |v: Var| bits & (1 << (v.index() - 1)) != 0;
            let minterm = bits & ((1 << width) - 1);
            assert_eq!(
                cnf.is_satisfied_by(value),
                value(node) == truth[minterm],
                "truth table {:?}, assignment {:b}",
                truth,
                bits
            );
        }
    }

    #[test]
    fn cover_clauses() {
        let (a, b, n) = (Var::new(1), Var::new(2), Var::new(3));
        let covers = LocalCovers::Covers {
            on: Cover::parse(2, &["1-"]).unwrap(),
            off: Cover::parse(2, &["0-"]).unwrap(),
        };
        let mut cnf = Cnf::new();
        emit_covers(&mut cnf, n, &[a, b], &covers).unwrap();
        assert_eq!(
            cnf.clauses(),
            &[
                Clause::from(vec![Lit::from(1), Lit::from(-3)]),
                Clause::from(vec![Lit::from(-1), Lit::from(3)]),
            ]
        );
    }

    #[test]
    fn constant_cover() {
        let mut cnf = Cnf::new();
        emit_covers(&mut cnf, Var::new(4), &[Var::new(1)], &LocalCovers::Constant(true)).unwrap();
        emit_covers(&mut cnf, Var::new(5), &[], &LocalCovers::Constant(false)).unwrap();
        assert_eq!(
            cnf.clauses(),
            &[
                Clause::from(vec![Lit::from(4)]),
                Clause::from(vec![Lit::from(-5)]),
            ]
        );
    }

    #[test]
    #[should_panic]
    fn cover_width_must_match_fanins() {
        let covers = LocalCovers::Covers {
            on: Cover::parse(2, &["11"]).unwrap(),
            off: Cover::parse(2, &["0-", "-0"]).unwrap(),
        };
        let _ = emit_covers(&mut Cnf::new(), Var::new(3), &[Var::new(1)], &covers);
    }

    #[test]
    fn every_three_input_function_round_trips() {
        for f in 0..256usize {
            let truth: Vec<bool> = (0..8).map(|m| f & (1 << m) != 0).collect();
            check_round_trip(&truth, false);
            check_round_trip(&truth, true);
        }
    }

    #[test]
    fn output_gadget() {
        for complement in [false, true] {
            let mut cnf = Cnf::new();
            emit_output(&mut cnf, Var::new(2), Var::new(1), complement).unwrap();
            assert_eq!(cnf.len(), 3);
            for bits in 0..4u32 {
                let value = |v: Var| bits & (1 << (v.index() - 1)) != 0;
                let expected = value(Var::new(2)) && (value(Var::new(1)) ^ complement);
                assert_eq!(cnf.is_satisfied_by(value), expected);
            }
        }
    }

    #[test]
    fn network_encoding() {
        let mut network = LogicNetwork::new();
        let a = network.add_input();
        let b = network.add_input();
        let or = network
            .add_node(
                vec![a, b],
                NodeFunction::Sop {
                    on: Cover::parse(2, &["1-", "-1"]).unwrap(),
                    off: Cover::parse(2, &["00"]).unwrap(),
                },
            )
            .unwrap();
        let out = network.add_output(or, true).unwrap();

        let mut encoder = CoverEncoder::new(false);
        let mut cnf = Cnf::new();
        encoder.encode(&network, &mut cnf).unwrap().unwrap();
        assert_eq!(encoder.vars().nodes(), &[a, b, or, out]);
        // 3 cubes, 3 clauses for the output
        assert_eq!(cnf.len(), 6);

        // Satisfiable only with both inputs false
        for bits in 0..16u32 {
            let value = |v: Var| bits & (1 << (v.index() - 1)) != 0;
            let (va, vb) = (value(Var::new(1)), value(Var::new(2)));
            let consistent = value(Var::new(3)) == (va || vb) && value(Var::new(4));
            assert_eq!(cnf.is_satisfied_by(value), consistent && !va && !vb);
        }
    }

    #[test]
    fn refused_clause_stops_emission() {
        let mut network = LogicNetwork::new();
        let a = network.add_input();
        let b = network.add_input();
        let x = network
            .add_node(vec![a, b], NodeFunction::TruthTable(vec![false, true, true, false]))
            .unwrap();
        network.add_output(x, false).unwrap();

        // Accepts a fixed number of clauses, then refuses everything
        struct Budget {
            left: usize,
            calls: usize,
        }
        impl ClauseSink for Budget {
            fn add_clause(&mut self, _clause: &[Lit]) -> bool {
                self.calls += 1;
                if self.left == 0 {
                    return false;
                }
                self.left -= 1;
                true
            }
        }

        let mut sink = Budget { left: 2, calls: 0 };
        let emission = CoverEncoder::new(false).encode(&network, &mut sink).unwrap();
        assert_eq!(emission, Err(TriviallyUnsat));
        assert_eq!(sink.calls, 3);
    }

    #[test]
    fn malformed_functions_are_rejected_early() {
        let mut network = LogicNetwork::new();
        let a = network.add_input();
        network
            .add_node(vec![a], NodeFunction::TruthTable(vec![false, true]))
            .unwrap();
        assert!(CoverEncoder::new(false).encode(&network, &mut Cnf::new()).is_ok());

        // Nodes are validated when added, so a malformed function cannot get in
        assert!(matches!(
            network.add_node(vec![a], NodeFunction::TruthTable(vec![true; 3])),
            Err(AigError::CoverError(CoverError::TruthTableSize { .. }))
        ));
    }
}
