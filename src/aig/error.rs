use thiserror::Error;

use crate::{logic::cover::CoverError, miter::MiterError};

use super::NodeId;

/// The result of an AIG operation.
pub type Result<T> = std::result::Result<T, AigError>;

/// Error returned when an AIG (or logic network) operation failed.
///
/// Proven unsatisfiability and exhausted search limits are never reported through this type,
/// they are ordinary outcomes, see [`MiterResult`].
///
/// [`MiterResult`]: crate::sat::MiterResult
#[derive(Debug, Error)]
pub enum AigError {
    /// A different node with the given id already exists.
    #[error("a different node with id={0} already exists")]
    DuplicateId(NodeId),

    /// The id 0 is reserved for the `False` constant node only.
    #[error("id=0 is for node False only")]
    IdZeroButNotFalse,

    /// The node with given id does not exist.
    #[error("node with id={0} does not exist")]
    NodeDoesNotExist(NodeId),

    /// Primary outputs of a logic network cannot drive other nodes.
    #[error("node with id={0} is a primary output and cannot be used as a fanin")]
    OutputAsFanin(NodeId),

    /// The network still contains sequential elements, it cannot be encoded as a
    /// combinational formula.
    #[error("the network contains {0} latch(es), only combinational networks can be encoded")]
    SequentialNetwork(usize),

    /// The number of values given for a simulation does not match the number of inputs.
    #[error("expected {expected} input values, got {got}")]
    InputCountMismatch { expected: usize, got: usize },

    /// The network has reached an invalid state. This should never happen.
    #[error("the network has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// Just forwarding a [`MiterError`].
    #[error("{0}")]
    MiterError(#[from] MiterError),

    /// Just forwarding a [`CoverError`].
    #[error("{0}")]
    CoverError(#[from] CoverError),
}
