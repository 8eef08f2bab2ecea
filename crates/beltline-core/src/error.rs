use crate::catalog::CatalogError;
use crate::id::WorkerId;
use crate::worker::WorkerError;

/// Errors raised while building or stepping a factory.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("belt length must be at least 1")]
    ZeroBeltLength,

    /// The number of stations must equal the number of belt positions.
    #[error("expected {expected} worker stations (one per belt position), got {actual}")]
    StationCountMismatch { expected: usize, actual: usize },

    #[error("station at belt position {position} has no workers")]
    EmptyStation { position: usize },

    #[error("belt contents have length {actual}, expected {expected}")]
    BeltLengthMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The engine called a worker outside its contract. Indicates an engine
    /// bug rather than a configuration problem.
    #[error("worker {id}: {source}")]
    Worker {
        id: WorkerId,
        #[source]
        source: WorkerError,
    },

    /// A worker could not be constructed (e.g. zero processing duration).
    #[error("invalid worker at belt position {position}: {source}")]
    InvalidWorker {
        position: usize,
        #[source]
        source: WorkerError,
    },
}
