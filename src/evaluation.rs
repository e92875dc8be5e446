//! Link-prediction evaluation of node embeddings.
//!
//! # Two Protocols
//!
//! | Protocol | Embeds | Needs | Metric |
//! |----------|--------|-------|--------|
//! | Supervised | train + test subgraphs | classifier, edge operator | ROC-AUC |
//! | Unsupervised | full graph | similarity measure | precision@k |
//!
//! **Supervised**: the model is fit on the train subgraph, train edges are
//! turned into edge embeddings, and a classifier learns edge existence. The
//! model is then refit on the test subgraph and the classifier scores the
//! test edges. ROC-AUC compares those scores with the test labels.
//!
//! **Unsupervised**: the model is fit on the whole graph. Every unordered
//! node pair is scored by similarity, the top k pairs are taken, and the
//! fraction that are real edges is the precision.
//!
//! # Shared State
//!
//! The embedding model and classifier are refit destructively on every call.
//! The train/test split is computed once, on first use, and cached for the
//! evaluator's lifetime. Build a new evaluator to get fresh samples.
//!
//! # Example
//!
//! ```rust,ignore
//! use bipartite_embeddings::{EdgeOperator, Evaluator, SimilarityMeasure};
//!
//! let mut eval = Evaluator::new(graph, model, splitter)
//!     .with_classifier(logistic)
//!     .with_edge_operator(EdgeOperator::Hadamard);
//!
//! let auc = eval.roc_auc_score()?;
//! let p100 = eval.precision_at_100(SimilarityMeasure::Cosine)?;
//! ```

use ndarray::Array2;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::auc::roc_auc_score;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::model::{Classifier, EmbeddingModel};
use crate::operators::{self, EdgeOperator};
use crate::samples::{SampleBundle, SampleSplitter, SampleType};
use crate::similarity::{mask_strict_lower, similarity_matrix, top_pairs, RankedPair, SimilarityMeasure};
use crate::timing::performance_measuring;

/// Number of ranked pairs scored by [`Evaluator::precision_at_100`].
pub const PRECISION_K: usize = 100;

/// Evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Emit a debug event per ranked pair with both embedding vectors
    /// (default: false).
    pub trace_pairs: bool,
    /// Time full-graph embedding in precision@k (default: true).
    pub timing: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            trace_pairs: false,
            timing: true,
        }
    }
}

impl EvalConfig {
    pub fn with_trace_pairs(mut self, trace_pairs: bool) -> Self {
        self.trace_pairs = trace_pairs;
        self
    }

    pub fn with_timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }
}

/// Outcome of a precision@k run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecisionReport {
    /// Measure used to rank pairs.
    pub measure: SimilarityMeasure,
    /// Requested k. Also the precision denominator.
    pub k: usize,
    /// Ranked pairs that are edges of the graph.
    pub true_positives: usize,
    /// `true_positives / k`
    pub precision: f64,
    /// Pairs in rank order. Fewer than k when the graph has fewer pairs.
    pub ranked: Vec<RankedPair>,
}

impl PrecisionReport {
    /// Format as summary string.
    pub fn summary(&self) -> String {
        format!(
            "P@{}: {:.2} | TP: {} | ranked: {} ({})",
            self.k,
            self.precision,
            self.true_positives,
            self.ranked.len(),
            self.measure
        )
    }
}

/// Evaluates an embedding model on one graph.
///
/// Generic over the embedding model `M`, the sample splitter `S` and the
/// classifier `C`. [`Evaluator::new`] starts with no classifier and
/// `C = Box<dyn Classifier>`; [`Evaluator::with_classifier`] swaps in any
/// classifier type, including a `&mut` borrow.
///
/// Not meant for concurrent use: every scoring call takes `&mut self`, and
/// the sample cache is single-threaded.
pub struct Evaluator<M, S, C = Box<dyn Classifier>> {
    graph: Graph,
    embedding_model: M,
    classifier: Option<C>,
    edge_operator: Option<EdgeOperator>,
    splitter: S,
    samples: OnceCell<SampleBundle>,
    config: EvalConfig,
}

impl<M, S> Evaluator<M, S>
where
    M: EmbeddingModel,
    S: SampleSplitter,
{
    /// Create an evaluator with no classifier and no edge operator.
    pub fn new(graph: Graph, embedding_model: M, splitter: S) -> Self {
        Self {
            graph,
            embedding_model,
            classifier: None,
            edge_operator: None,
            splitter,
            samples: OnceCell::new(),
            config: EvalConfig::default(),
        }
    }
}

impl<M, S, C> Evaluator<M, S, C>
where
    M: EmbeddingModel,
    S: SampleSplitter,
    C: Classifier,
{
    /// Set the classifier used for ROC-AUC, replacing any previous one.
    ///
    /// Cached samples carry over.
    pub fn with_classifier<K: Classifier>(self, classifier: K) -> Evaluator<M, S, K> {
        Evaluator {
            graph: self.graph,
            embedding_model: self.embedding_model,
            classifier: Some(classifier),
            edge_operator: self.edge_operator,
            splitter: self.splitter,
            samples: self.samples,
            config: self.config,
        }
    }

    /// Set the edge operator used to build edge embeddings.
    pub fn with_edge_operator(mut self, op: EdgeOperator) -> Self {
        self.edge_operator = Some(op);
        self
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn embedding_model(&self) -> &M {
        &self.embedding_model
    }

    pub fn classifier(&self) -> Option<&C> {
        self.classifier.as_ref()
    }

    pub fn edge_operator(&self) -> Option<EdgeOperator> {
        self.edge_operator
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Train/test samples, split on first access and cached after.
    ///
    /// A failed split caches nothing.
    pub fn samples(&self) -> Result<&SampleBundle> {
        load_samples(&self.samples, &self.splitter, &self.graph)
    }

    /// Fit the model on the chosen graph and return its node embeddings.
    ///
    /// `None` selects the full graph.
    pub fn node_embeddings(&mut self, sample_type: Option<SampleType>) -> Result<Array2<f64>> {
        let graph = match sample_type {
            Some(st) => load_samples(&self.samples, &self.splitter, &self.graph)?.graph(st),
            None => &self.graph,
        };
        trace!(?sample_type, nodes = graph.node_count(), "fitting embedding model");
        self.embedding_model.embed(graph)
    }

    pub fn train_node_embeddings(&mut self) -> Result<Array2<f64>> {
        self.node_embeddings(Some(SampleType::Train))
    }

    pub fn test_node_embeddings(&mut self) -> Result<Array2<f64>> {
        self.node_embeddings(Some(SampleType::Test))
    }

    /// Edge embeddings for the train or test edges, one row per edge.
    ///
    /// Refits the model on the matching subgraph. Rows follow the order of
    /// the sample's edge ids, and so line up with its labels.
    pub fn edge_embeddings(&mut self, sample_type: SampleType) -> Result<Array2<f64>> {
        let op = self
            .edge_operator
            .ok_or_else(|| Error::UnknownEdgeOperator("None".to_string()))?;

        let nodes = self.node_embeddings(Some(sample_type))?;
        let edges = self.samples()?.edge_ids(sample_type);
        operators::edge_embeddings(nodes.view(), edges, op)
    }

    /// ROC-AUC of the classifier on the test edges.
    ///
    /// Fits the classifier on train edge embeddings, then scores test edge
    /// embeddings with the positive-class column of `predict_proba`.
    pub fn roc_auc_score(&mut self) -> Result<f64> {
        if self.classifier.is_none() || self.edge_operator.is_none() {
            return Err(Error::MissingConfiguration);
        }

        let train = self.edge_embeddings(SampleType::Train)?;
        {
            let samples = load_samples(&self.samples, &self.splitter, &self.graph)?;
            let classifier = self.classifier.as_mut().ok_or(Error::MissingConfiguration)?;
            classifier.fit(train.view(), &samples.edge_labels_train)?;
        }

        let test = self.edge_embeddings(SampleType::Test)?;
        let classifier = self.classifier.as_ref().ok_or(Error::MissingConfiguration)?;
        let proba = classifier.predict_proba(test.view())?;
        if proba.ncols() < 2 {
            return Err(Error::MissingPositiveClass {
                columns: proba.ncols(),
            });
        }
        if proba.nrows() != test.nrows() {
            return Err(Error::LengthMismatch {
                expected: test.nrows(),
                got: proba.nrows(),
            });
        }
        let scores = proba.column(1).to_vec();

        let samples = self.samples()?;
        let auc = roc_auc_score(&samples.edge_labels_test, &scores)?;
        info!(
            auc,
            train_edges = train.nrows(),
            test_edges = test.nrows(),
            "computed ROC AUC"
        );
        Ok(auc)
    }

    /// Precision of the 100 most similar node pairs.
    pub fn precision_at_100(&mut self, measure: SimilarityMeasure) -> Result<f64> {
        Ok(self.precision_at_k(measure, PRECISION_K)?.precision)
    }

    /// Precision of the `k` most similar node pairs of the full graph.
    ///
    /// Pairs are ranked over the strict lower triangle of the similarity
    /// matrix. The denominator is always `k`, even when the graph has fewer
    /// than `k` pairs.
    pub fn precision_at_k(&mut self, measure: SimilarityMeasure, k: usize) -> Result<PrecisionReport> {
        let embeddings = if self.config.timing {
            performance_measuring("Node embeddings calculation", || self.node_embeddings(None))?
        } else {
            self.node_embeddings(None)?
        };

        let mut similarities = similarity_matrix(embeddings.view(), measure);
        mask_strict_lower(&mut similarities);
        let ranked = top_pairs(similarities.view(), k);

        let mut true_positives = 0;
        for pair in &ranked {
            if self.config.trace_pairs {
                debug!(
                    %measure,
                    row = pair.row,
                    col = pair.col,
                    similarity = pair.similarity,
                    row_embedding = ?embeddings.row(pair.row),
                    col_embedding = ?embeddings.row(pair.col),
                    "ranked pair"
                );
            }
            if self.graph.has_edge(pair.row, pair.col) {
                true_positives += 1;
                debug!(row = pair.row, col = pair.col, true_positives, "edge exists");
            }
        }

        let precision = if k == 0 {
            0.0
        } else {
            true_positives as f64 / k as f64
        };

        let report = PrecisionReport {
            measure,
            k,
            true_positives,
            precision,
            ranked,
        };
        info!("{}", report.summary());
        Ok(report)
    }
}

fn load_samples<'a, S: SampleSplitter>(
    cell: &'a OnceCell<SampleBundle>,
    splitter: &S,
    graph: &Graph,
) -> Result<&'a SampleBundle> {
    cell.get_or_try_init(|| {
        let bundle = splitter.split(graph)?;
        debug!(
            train_edges = bundle.edge_ids_train.len(),
            test_edges = bundle.edge_ids_test.len(),
            "computed train/test samples"
        );
        Ok(bundle)
    })
}
