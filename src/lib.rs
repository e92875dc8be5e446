// Allow minor clippy style warnings at crate level
// These are mostly style preferences, not bugs
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

//! Link-prediction evaluation for graph node embeddings.
//!
//! An embedding model maps every node of a graph to a vector. This crate
//! measures how well those vectors predict edges, with two protocols:
//!
//! | Protocol | Entry point | Metric |
//! |----------|-------------|--------|
//! | Supervised edge classification | [`Evaluator::roc_auc_score`] | ROC-AUC |
//! | Unsupervised pair ranking | [`Evaluator::precision_at_100`] | precision@100 |
//!
//! # Collaborators
//!
//! Embedding algorithms, classifiers and train/test splitting live outside
//! this crate. They plug in through small traits:
//!
//! - [`EmbeddingModel`] - `fit(graph)` then `embedding()`
//! - [`Classifier`] - `fit`, `predict`, `predict_proba`
//! - [`SampleSplitter`] - `split(graph) -> SampleBundle`
//!
//! # Edge Operators
//!
//! Edge embeddings for the classifier are built from node pairs:
//!
//! | Operator | Edge vector | Width |
//! |----------|-------------|-------|
//! | [`EdgeOperator::Concat`] | `[u, v]` | 2d |
//! | [`EdgeOperator::Hadamard`] | `u * v` | d |
//! | [`EdgeOperator::Average`] | `(u + v) / 2` | d |
//!
//! # Similarity Measures
//!
//! Precision@100 ranks node pairs by [`SimilarityMeasure`]: cosine, dot
//! product, or `Hamming` (the default), which counts equal components.
//!
//! # Example
//!
//! ```rust
//! use bipartite_embeddings::{
//!     EmbeddingModel, Evaluator, FixedSamples, Graph, Result, SampleBundle, SimilarityMeasure,
//! };
//! use ndarray::Array2;
//!
//! /// One-hot of the node's neighbor set, so linked nodes agree a lot.
//! struct Adjacency(Array2<f64>);
//!
//! impl EmbeddingModel for Adjacency {
//!     fn fit(&mut self, graph: &Graph) -> Result<()> {
//!         let n = graph.node_count();
//!         self.0 = Array2::from_shape_fn((n, n), |(i, j)| {
//!             if i == j || graph.has_edge(i, j) { 1.0 } else { 0.0 }
//!         });
//!         Ok(())
//!     }
//!
//!     fn embedding(&self) -> Result<Array2<f64>> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let graph = Graph::from_edges(4, [(0, 1), (2, 3)]);
//! let samples = SampleBundle::new(
//!     graph.clone(), graph.clone(), vec![], vec![], vec![], vec![],
//! )?;
//!
//! let mut eval = Evaluator::new(graph, Adjacency(Array2::zeros((0, 0))), FixedSamples(samples));
//! let p = eval.precision_at_100(SimilarityMeasure::Hamming)?;
//! assert_eq!(p, 0.02);
//! # Ok(())
//! # }
//! ```

pub mod auc;
mod error;
pub mod evaluation;
mod graph;
mod model;
pub mod operators;
mod samples;
pub mod similarity;
pub mod timing;

pub use auc::roc_auc_score;
pub use error::{Error, Result};
pub use evaluation::{EvalConfig, Evaluator, PrecisionReport, PRECISION_K};
pub use graph::{Graph, NodeId, NodePair};
pub use model::{Classifier, EmbeddingModel};
pub use operators::EdgeOperator;
pub use samples::{FixedSamples, SampleBundle, SampleSplitter, SampleType};
pub use similarity::{RankedPair, SimilarityMeasure};

// Re-export ndarray for collaborator implementations
pub use ndarray;
