/// Errors raised while resolving entity kinds and tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The name does not correspond to any known entity.
    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),

    /// No path segment names a catalog endpoint.
    #[error("no catalog endpoint in path: {0}")]
    UnknownEndpoint(String),

    /// The dataset type tag is neither "raw" nor "derived".
    #[error("invalid dataset type {0:?} (expected \"raw\" or \"derived\")")]
    InvalidDatasetType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
