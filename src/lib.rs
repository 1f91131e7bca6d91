//! Miter-oriented translation of Boolean networks into CNF, and SAT-based equivalence checking.
//!
//! - [`aig`]: And-Inverter Graphs, the structural networks
//! - [`logic`]: networks of nodes described by covers
//! - [`cnf`]: the two encoders and the clause database
//! - [`solver`]: the SAT engine seam and the MiniSat adapter
//! - [`sat`]: solving a miter network down to a verdict
//! - [`miter`]: building a miter from two AIGs.

pub mod aig;
pub mod cnf;
pub mod logic;
pub mod miter;
pub mod sat;
pub mod solver;

// Re-exporting symbols and modules.
pub use aig::{Aig, AigEdge, AigError, AigNode, AigNodeRef, MuxOperands, NodeId, Result};
pub use sat::{MiterResult, SolveParams, SolveReport, solve_miter};
