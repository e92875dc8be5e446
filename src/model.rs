//! Capability contracts for the external collaborators.
//!
//! The evaluator never implements an embedding algorithm or a classifier.
//! It drives whatever implements these traits:
//!
//! | Trait | Required | Provided |
//! |-------|----------|----------|
//! | [`EmbeddingModel`] | `fit`, `embedding` | `embed` |
//! | [`Classifier`] | `fit`, `predict`, `predict_proba` | - |

use ndarray::{Array1, Array2, ArrayView2};

use crate::error::Result;
use crate::graph::Graph;

/// A node-embedding model.
///
/// One instance is reused for the train, test and full graph. Each `fit`
/// overwrites the previous state, so a read is only valid right after the
/// fit it depends on. [`EmbeddingModel::embed`] does both in one call.
pub trait EmbeddingModel {
    /// Fit the model on `graph`, replacing any previous state.
    fn fit(&mut self, graph: &Graph) -> Result<()>;

    /// Embedding matrix of the current fit. Row `i` is node `i`.
    fn embedding(&self) -> Result<Array2<f64>>;

    /// Fit on `graph` and read the embedding.
    fn embed(&mut self, graph: &Graph) -> Result<Array2<f64>> {
        self.fit(graph)?;
        self.embedding()
    }
}

impl<M: EmbeddingModel + ?Sized> EmbeddingModel for Box<M> {
    fn fit(&mut self, graph: &Graph) -> Result<()> {
        (**self).fit(graph)
    }

    fn embedding(&self) -> Result<Array2<f64>> {
        (**self).embedding()
    }

    fn embed(&mut self, graph: &Graph) -> Result<Array2<f64>> {
        (**self).embed(graph)
    }
}

/// A binary classifier over edge embeddings.
///
/// Rows of `x` are samples. Labels are 0 or 1.
pub trait Classifier {
    /// Fit on edge embeddings and their labels.
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[u8]) -> Result<()>;

    /// Predicted labels.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<u8>>;

    /// Class probabilities. Column 1 is the positive class.
    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[u8]) -> Result<()> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<u8>> {
        (**self).predict(x)
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        (**self).predict_proba(x)
    }
}

impl<C: Classifier + ?Sized> Classifier for &mut C {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[u8]) -> Result<()> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<u8>> {
        (**self).predict(x)
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        (**self).predict_proba(x)
    }
}
