pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node id must not be empty (node #{index})")]
    EmptyNodeId { index: usize },

    #[error("duplicate node id: {id}")]
    DuplicateNodeId { id: String },

    #[error("edge #{index} ({from} -> {to}) references undeclared node: {missing}")]
    DanglingEdgeReference {
        index: usize,
        from: String,
        to: String,
        missing: String,
    },

    #[error("node {id}: {message}")]
    ResultCategoryMismatch { id: String, message: &'static str },

    #[error("diagram definition JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
