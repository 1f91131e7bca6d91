use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{
    Aig, AigEdge, AigError, AigNode, NodeId, Result,
    sat::{MiterResult, SolveParams, SolveReport, solve_miter},
};

/// Error returned when a miter cannot be built from two AIGs.
#[derive(Debug, Error)]
pub enum MiterError {
    /// The two AIGs have different inputs.
    /// We are just checking for the inputs id, they should correspond.
    #[error("AIGs have different inputs : {0:?} vs {1:?}")]
    MiterDifferentInputs(HashSet<NodeId>, HashSet<NodeId>),

    /// The two AIGs have a different number of outputs.
    /// Outputs are paired by position, so there must be as many on both sides.
    #[error("AIGs have different numbers of outputs : {0} vs {1}")]
    MiterDifferentOutputs(usize, usize),
}

/// The struct used to perform combinational equivalence checking between two AIGs.
///
/// For background on what is a miter, please check
/// [Verification of large synthesized designs](https://doi.org/10.1109/ICCAD.1993.580110) by D. Brand.
///
/// Both AIGs are copied into a single AIG sharing the inputs. Every pair of outputs (paired
/// by position) is compared with a XOR gate, which is an output of the miter. The miter is
/// satisfiable if and only if the two AIGs differ on some input values.
///
/// Gates are copied with structural hashing, so the parts which are structurally identical
/// in both AIGs are merged for free.
///
/// ```rust
/// use satmiter::{Aig, miter::Miter, sat::MiterResult};
///
/// let mut a = Aig::new();
/// let (x, y) = (a.add_input().unwrap(), a.add_input().unwrap());
/// let f = a.and(x, y).unwrap();
/// a.add_output_edge(f).unwrap();
///
/// let mut b = Aig::new();
/// let (x, y) = (b.add_input().unwrap(), b.add_input().unwrap());
/// let g = b.or(!x, !y).unwrap();
/// b.add_output_edge(!g).unwrap();
///
/// let miter = Miter::new(&a, &b).unwrap();
/// assert_eq!(miter.try_prove_eq().unwrap(), MiterResult::Unsat);
/// ```
#[derive(Debug, Clone)]
pub struct Miter {
    miter: Aig,
}

impl Miter {
    /// Create miter between two AIGs.
    ///
    /// This will fail if:
    /// - the given AIGs have different inputs (ie inputs with different ids)
    /// - they have a different number of outputs
    /// - or one of them holds latches.
    ///
    /// The miter declares its inputs in the order of `a`.
    pub fn new(a: &Aig, b: &Aig) -> Result<Self> {
        a.check_combinational()?;
        b.check_combinational()?;

        // Checking inputs
        let inputs_a: HashSet<NodeId> = a.get_inputs_id().into_iter().collect();
        let inputs_b: HashSet<NodeId> = b.get_inputs_id().into_iter().collect();
        if inputs_a != inputs_b {
            return Err(MiterError::MiterDifferentInputs(inputs_a, inputs_b).into());
        }

        // Checking outputs
        if a.num_outputs() != b.num_outputs() {
            return Err(MiterError::MiterDifferentOutputs(a.num_outputs(), b.num_outputs()).into());
        }

        let mut miter = Aig::new();
        for id in a.get_inputs_id() {
            miter.add_node(AigNode::Input(id))?;
        }

        let outputs_a = copy_into(&mut miter, a)?;
        let outputs_b = copy_into(&mut miter, b)?;
        for (fa, fb) in outputs_a.into_iter().zip(outputs_b) {
            let diff = miter.xor(fa, fb)?;
            miter.add_output_edge(diff)?;
        }

        log::debug!(
            "miter built: {} inputs, {} outputs, {} and gates",
            miter.num_inputs(),
            miter.num_outputs(),
            miter.num_ands()
        );
        Ok(Miter { miter })
    }

    /// The miter itself.
    pub fn aig(&self) -> &Aig {
        &self.miter
    }

    /// Solves the miter with the built-in solver.
    pub fn solve(&self, params: &SolveParams) -> Result<SolveReport> {
        solve_miter(&self.miter, params)
    }

    /// Tries to prove that the two AIGs are equivalent by generating one monolithic SAT query,
    /// without any search limit.
    /// - [`MiterResult::Unsat`] means they are equivalent
    /// - [`MiterResult::Sat`] comes with input values on which they differ.
    ///
    /// This is the naive implementation of combinational equivalence checking.
    /// Note that it might also just take too much time on large circuits,
    /// because the generated SAT query is too large for SAT solvers.
    /// Use [`Miter::solve`] with limits to bound the search.
    pub fn try_prove_eq(&self) -> Result<MiterResult> {
        Ok(self.solve(&SolveParams::default())?.result)
    }
}

/// Copies the gates of `src` into `dst`, whose inputs must already exist with the same ids.
/// Returns the outputs of `src` as edges of `dst`.
fn copy_into(dst: &mut Aig, src: &Aig) -> Result<Vec<AigEdge>> {
    let mut map: HashMap<NodeId, AigEdge> = HashMap::new();
    map.insert(0, dst.const_false());
    for id in src.get_inputs_id() {
        map.insert(id, dst.get_edge(id, false)?);
    }

    let translate = |map: &HashMap<NodeId, AigEdge>, edge: &AigEdge| -> Result<AigEdge> {
        let id = edge.get_node_id();
        map.get(&id)
            .cloned()
            .map(|e| e.not_if(edge.get_complement()))
            .ok_or(AigError::NodeDoesNotExist(id))
    };

    // Creation order is topological
    for node in src.get_nodes() {
        if let AigNode::And {
            id,
            fanin0,
            fanin1,
        } = &*node.borrow()
        {
            let f0 = translate(&map, fanin0)?;
            let f1 = translate(&map, fanin1)?;
            let edge = dst.and(f0, f1)?;
            map.insert(*id, edge);
        }
    }

    src.get_outputs()
        .iter()
        .map(|output| translate(&map, output))
        .collect()
}
