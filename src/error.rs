//! Error types for bipartite-embeddings.

use thiserror::Error;

/// Errors raised while evaluating an embedding model.
#[derive(Error, Debug)]
pub enum Error {
    /// ROC-AUC needs both a classifier and an edge operator.
    #[error("ROC AUC score can only be computed when classifier and edge operator are both set")]
    MissingConfiguration,

    /// Edge operator unset or not one of concat/hadamard/average.
    #[error("Unknown edge operator: {0}")]
    UnknownEdgeOperator(String),

    /// Similarity measure not one of cosine/hamming/dot_product.
    #[error("Unknown similarity measure: {0}")]
    UnknownSimilarityMeasure(String),

    /// Sample bundle violates its alignment or label invariants.
    #[error("Invalid samples: {0}")]
    InvalidSamples(String),

    /// An edge references a node with no row in the embedding matrix.
    #[error("node {node} out of range for embedding matrix with {rows} rows")]
    NodeOutOfRange { node: usize, rows: usize },

    /// `predict_proba` returned no positive-class column.
    #[error("predict_proba returned {columns} column(s), positive class needs column 1")]
    MissingPositiveClass { columns: usize },

    /// Collaborator output length disagrees with its input.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// A classifier score is NaN or infinite.
    #[error("score at position {position} is not finite ({value})")]
    NonFiniteScore { position: usize, value: f64 },

    /// ROC-AUC is undefined when only one class is present.
    #[error("ROC AUC is undefined when only one class is present in the labels")]
    UndefinedAuc,

    /// Failure reported by the embedding model.
    #[error("embedding model error: {0}")]
    Model(String),

    /// Failure reported by the classifier.
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Failure reported by the sample splitter.
    #[error("sample splitter error: {0}")]
    Splitter(String),
}

/// Result type alias for bipartite-embeddings.
pub type Result<T> = std::result::Result<T, Error>;
