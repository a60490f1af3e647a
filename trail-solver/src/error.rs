//! Solver error type.

use trail_core::SetupError;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// A search parameter is unusable.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    /// The interrupt flag was cleared while searching.
    #[error("search interrupted after {nodes} nodes")]
    Interrupted { nodes: u64 },

    /// The configured node budget ran out.
    #[error("node limit of {limit} reached")]
    NodeLimit { limit: u64 },
}
