//! Train/test sample bundles and the splitter contract.
//!
//! Splitting a graph into train and test edges is done by an external
//! splitter. This module only fixes the shape of its output: two subgraphs
//! plus labeled edge-id sequences, with labels aligned to edges by position.

use crate::error::{Error, Result};
use crate::graph::{Graph, NodePair};

/// Which half of the split to embed.
///
/// An unset discriminator (`None` where an `Option<SampleType>` is taken)
/// means the full, unsplit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    /// Training subgraph and edges.
    Train,
    /// Test subgraph and edges.
    Test,
}

/// Output of a train/test split.
#[derive(Debug, Clone)]
pub struct SampleBundle {
    /// Graph the model is fit on for training edges.
    pub train_graph: Graph,
    /// Graph the model is fit on for test edges.
    pub test_graph: Graph,
    /// Training node pairs, aligned with `edge_labels_train`.
    pub edge_ids_train: Vec<NodePair>,
    /// Test node pairs, aligned with `edge_labels_test`.
    pub edge_ids_test: Vec<NodePair>,
    /// 1 = edge exists, 0 = negative sample.
    pub edge_labels_train: Vec<u8>,
    /// 1 = edge exists, 0 = negative sample.
    pub edge_labels_test: Vec<u8>,
}

impl SampleBundle {
    /// Build a bundle, checking label alignment and that labels are binary.
    pub fn new(
        train_graph: Graph,
        test_graph: Graph,
        edge_ids_train: Vec<NodePair>,
        edge_labels_train: Vec<u8>,
        edge_ids_test: Vec<NodePair>,
        edge_labels_test: Vec<u8>,
    ) -> Result<Self> {
        check_aligned("train", &edge_ids_train, &edge_labels_train)?;
        check_aligned("test", &edge_ids_test, &edge_labels_test)?;

        Ok(Self {
            train_graph,
            test_graph,
            edge_ids_train,
            edge_ids_test,
            edge_labels_train,
            edge_labels_test,
        })
    }

    /// Subgraph for a sample type.
    pub fn graph(&self, sample_type: SampleType) -> &Graph {
        match sample_type {
            SampleType::Train => &self.train_graph,
            SampleType::Test => &self.test_graph,
        }
    }

    /// Edge ids for a sample type.
    pub fn edge_ids(&self, sample_type: SampleType) -> &[NodePair] {
        match sample_type {
            SampleType::Train => &self.edge_ids_train,
            SampleType::Test => &self.edge_ids_test,
        }
    }

    /// Edge labels for a sample type.
    pub fn edge_labels(&self, sample_type: SampleType) -> &[u8] {
        match sample_type {
            SampleType::Train => &self.edge_labels_train,
            SampleType::Test => &self.edge_labels_test,
        }
    }
}

fn check_aligned(name: &str, ids: &[NodePair], labels: &[u8]) -> Result<()> {
    if ids.len() != labels.len() {
        return Err(Error::InvalidSamples(format!(
            "{name}: {} edge ids but {} labels",
            ids.len(),
            labels.len()
        )));
    }
    if let Some(pos) = labels.iter().position(|&l| l > 1) {
        return Err(Error::InvalidSamples(format!(
            "{name}: label {} at position {pos} is not 0 or 1",
            labels[pos]
        )));
    }
    Ok(())
}

/// Produces a [`SampleBundle`] from a graph.
///
/// Implemented for closures `Fn(&Graph) -> Result<SampleBundle>`, so any
/// splitting routine can be plugged in directly.
pub trait SampleSplitter {
    /// Split `graph` into train and test samples.
    fn split(&self, graph: &Graph) -> Result<SampleBundle>;
}

impl<F> SampleSplitter for F
where
    F: Fn(&Graph) -> Result<SampleBundle>,
{
    fn split(&self, graph: &Graph) -> Result<SampleBundle> {
        self(graph)
    }
}

/// A splitter that hands back a bundle computed ahead of time.
#[derive(Debug, Clone)]
pub struct FixedSamples(pub SampleBundle);

impl SampleSplitter for FixedSamples {
    fn split(&self, _graph: &Graph) -> Result<SampleBundle> {
        Ok(self.0.clone())
    }
}
