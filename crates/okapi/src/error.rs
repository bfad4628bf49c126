#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout options: {message}")]
    InvalidOptions { message: String },
    #[error("layout config JSON error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("no hierarchical layout backend is configured")]
    HierarchicalUnavailable,
    #[error("hierarchical layout failed: {message}")]
    Hierarchical { message: String },
    #[error("hierarchical layout returned no position for node: {node_id}")]
    MissingPosition { node_id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
