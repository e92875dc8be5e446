//! Integration tests for the evaluator.
//!
//! Tests the full pipelines with stub collaborators:
//! split -> embed -> edge embeddings -> classifier -> ROC-AUC, and
//! embed -> similarity -> ranking -> precision@100.

use bipartite_embeddings::ndarray::{array, Array1, Array2, ArrayView2, Axis};
use bipartite_embeddings::{
    Classifier, EdgeOperator, EmbeddingModel, Error, EvalConfig, Evaluator, FixedSamples, Graph,
    Result, SampleBundle, SimilarityMeasure,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Returns the same matrix whatever it is fit on.
struct FixedModel {
    matrix: Array2<f64>,
    fits: usize,
}

impl FixedModel {
    fn new(matrix: Array2<f64>) -> Self {
        Self { matrix, fits: 0 }
    }
}

impl EmbeddingModel for FixedModel {
    fn fit(&mut self, _graph: &Graph) -> Result<()> {
        self.fits += 1;
        Ok(())
    }

    fn embedding(&self) -> Result<Array2<f64>> {
        Ok(self.matrix.clone())
    }
}

/// Node i -> [side, edges in graph], side = +1 for i < 4 else -1.
///
/// The second component differs between train and test graphs, so the two
/// embeddings are distinguishable while the side stays informative.
struct SideModel {
    nodes: usize,
    offset: f64,
    fitted_on: Rc<RefCell<Vec<usize>>>,
}

impl EmbeddingModel for SideModel {
    fn fit(&mut self, graph: &Graph) -> Result<()> {
        self.nodes = graph.node_count();
        self.offset = graph.edge_count() as f64;
        self.fitted_on.borrow_mut().push(graph.edge_count());
        Ok(())
    }

    fn embedding(&self) -> Result<Array2<f64>> {
        Ok(Array2::from_shape_fn((self.nodes, 2), |(i, j)| match j {
            0 if i < 4 => 1.0,
            0 => -1.0,
            _ => self.offset,
        }))
    }
}

/// Nearest-centroid classifier on edge embeddings.
struct CentroidClassifier {
    centroids: Option<(Array1<f64>, Array1<f64>)>,
    fits: Rc<Cell<usize>>,
}

impl CentroidClassifier {
    fn new(fits: Rc<Cell<usize>>) -> Self {
        Self { centroids: None, fits }
    }

    fn distances(&self, x: ArrayView2<'_, f64>) -> Result<Vec<(f64, f64)>> {
        let (c0, c1) = self
            .centroids
            .as_ref()
            .ok_or_else(|| Error::Classifier("not fitted".to_string()))?;
        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let d0 = (&row - c0).mapv(|v| v * v).sum().sqrt();
                let d1 = (&row - c1).mapv(|v| v * v).sum().sqrt();
                (d0, d1)
            })
            .collect())
    }
}

impl Classifier for CentroidClassifier {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: &[u8]) -> Result<()> {
        self.fits.set(self.fits.get() + 1);
        let mean_of = |label: u8| {
            let rows: Vec<usize> = (0..y.len()).filter(|&i| y[i] == label).collect();
            x.select(Axis(0), &rows)
                .mean_axis(Axis(0))
                .ok_or_else(|| Error::Classifier(format!("no samples with label {label}")))
        };
        self.centroids = Some((mean_of(0)?, mean_of(1)?));
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<u8>> {
        Ok(self
            .distances(x)?
            .into_iter()
            .map(|(d0, d1)| u8::from(d1 < d0))
            .collect())
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let d = self.distances(x)?;
        Ok(Array2::from_shape_fn((d.len(), 2), |(i, j)| {
            let (d0, d1) = d[i];
            let p1 = if d0 + d1 == 0.0 { 0.5 } else { d0 / (d0 + d1) };
            if j == 1 {
                p1
            } else {
                1.0 - p1
            }
        }))
    }
}

/// Always 50/50.
struct ConstantClassifier;

impl Classifier for ConstantClassifier {
    fn fit(&mut self, _x: ArrayView2<'_, f64>, _y: &[u8]) -> Result<()> {
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<u8>> {
        Ok(Array1::zeros(x.nrows()))
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(Array2::from_elem((x.nrows(), 2), 0.5))
    }
}

/// 8 nodes: positives join two nodes on the same side, negatives cross sides.
fn side_samples() -> SampleBundle {
    let train_graph = Graph::from_edges(8, [(0, 1), (2, 3), (4, 5), (6, 7)]);
    let test_graph = Graph::from_edges(8, [(0, 2), (5, 7)]);
    SampleBundle::new(
        train_graph,
        test_graph,
        vec![(0, 1), (4, 5), (0, 4), (3, 7), (2, 3), (1, 6)],
        vec![1, 1, 0, 0, 1, 0],
        vec![(0, 2), (5, 7), (1, 5), (2, 6)],
        vec![1, 1, 0, 0],
    )
    .unwrap()
}

fn side_model(fitted_on: Rc<RefCell<Vec<usize>>>) -> SideModel {
    SideModel {
        nodes: 0,
        offset: 0.0,
        fitted_on,
    }
}

fn empty_samples(n: usize) -> FixedSamples {
    let g = Graph::with_nodes(n);
    FixedSamples(SampleBundle::new(g.clone(), g, vec![], vec![], vec![], vec![]).unwrap())
}

#[test]
fn test_roc_auc_perfect_separation() {
    init_tracing();
    let fitted_on = Rc::new(RefCell::new(Vec::new()));
    let classifier_fits = Rc::new(Cell::new(0));

    let graph = Graph::from_edges(8, [(0, 1), (2, 3), (4, 5), (6, 7), (0, 2), (5, 7)]);
    let mut eval = Evaluator::new(graph, side_model(fitted_on.clone()), FixedSamples(side_samples()))
        .with_classifier(CentroidClassifier::new(classifier_fits.clone()))
        .with_edge_operator(EdgeOperator::Concat);

    let auc = eval.roc_auc_score().unwrap();
    assert_eq!(auc, 1.0);

    // fit on train (4 edges) then test (2 edges), classifier once
    assert_eq!(*fitted_on.borrow(), vec![4, 2]);
    assert_eq!(classifier_fits.get(), 1);

    // a second call refits everything
    let again = eval.roc_auc_score().unwrap();
    assert_eq!(again, 1.0);
    assert_eq!(*fitted_on.borrow(), vec![4, 2, 4, 2]);
    assert_eq!(classifier_fits.get(), 2);
}

#[test]
fn test_roc_auc_constant_classifier() {
    let mut eval = Evaluator::new(
        Graph::with_nodes(8),
        side_model(Rc::new(RefCell::new(Vec::new()))),
        FixedSamples(side_samples()),
    )
    .with_classifier(ConstantClassifier)
    .with_edge_operator(EdgeOperator::Concat);

    assert_eq!(eval.roc_auc_score().unwrap(), 0.5);
}

#[test]
fn test_roc_auc_every_operator_separates() {
    for op in EdgeOperator::ALL {
        let mut eval = Evaluator::new(
            Graph::with_nodes(8),
            side_model(Rc::new(RefCell::new(Vec::new()))),
            FixedSamples(side_samples()),
        )
        .with_classifier(CentroidClassifier::new(Rc::new(Cell::new(0))))
        .with_edge_operator(op);

        let auc = eval.roc_auc_score().unwrap();
        assert!((0.0..=1.0).contains(&auc), "{op}: {auc}");
    }
}

#[test]
fn test_roc_auc_missing_configuration_message() {
    let mut eval = Evaluator::new(
        Graph::with_nodes(8),
        side_model(Rc::new(RefCell::new(Vec::new()))),
        FixedSamples(side_samples()),
    )
    .with_edge_operator(EdgeOperator::Hadamard);

    let err = eval.roc_auc_score().unwrap_err();
    assert!(err.to_string().contains("classifier and edge operator"));
}

#[test]
fn test_roc_auc_single_class_test_labels() {
    let g = Graph::with_nodes(8);
    let samples = SampleBundle::new(
        g.clone(),
        g.clone(),
        vec![(0, 1), (0, 4)],
        vec![1, 0],
        vec![(2, 3)],
        vec![1],
    )
    .unwrap();
    let mut eval = Evaluator::new(g, side_model(Rc::new(RefCell::new(Vec::new()))), FixedSamples(samples))
        .with_classifier(ConstantClassifier)
        .with_edge_operator(EdgeOperator::Average);

    assert!(matches!(eval.roc_auc_score(), Err(Error::UndefinedAuc)));
}

#[test]
fn test_precision_ten_nodes_clamps_to_45_pairs() {
    init_tracing();
    // 10 x 4 matrix with a few repeated components
    let matrix = Array2::from_shape_fn((10, 4), |(i, j)| ((i * (j + 1)) % 3) as f64);
    let graph = Graph::from_edges(10, [(1, 0), (5, 2), (9, 8)]);
    let mut eval = Evaluator::new(graph, FixedModel::new(matrix), empty_samples(10))
        .with_config(EvalConfig::default().with_trace_pairs(true));

    let report = eval.precision_at_k(SimilarityMeasure::Hamming, 100).unwrap();
    assert_eq!(report.ranked.len(), 45);
    assert!(report.ranked.iter().all(|p| p.col < p.row));
    assert!(report
        .ranked
        .windows(2)
        .all(|w| w[0].similarity >= w[1].similarity));

    // every pair is ranked, so all 3 edges are found
    assert_eq!(report.true_positives, 3);
    assert_eq!(report.precision, 0.03);
    assert_eq!(eval.embedding_model().fits, 1);
}

#[test]
fn test_precision_identical_pair_ranks_first() {
    let matrix = array![
        [1.0, 0.0, 2.0, 5.0],
        [3.0, 1.0, 4.0, 0.0],
        [2.0, 2.0, 0.0, 1.0],
        [3.0, 1.0, 4.0, 0.0],
        [0.0, 4.0, 1.0, 2.0],
    ];
    let graph = Graph::from_edges(5, [(1, 3), (0, 4)]);
    let mut eval = Evaluator::new(graph, FixedModel::new(matrix), empty_samples(5));

    let report = eval.precision_at_k(SimilarityMeasure::Hamming, 100).unwrap();
    let first = report.ranked[0];
    assert_eq!((first.row, first.col), (3, 1));
    assert_eq!(first.similarity, 4.0);
    assert_eq!(report.true_positives, 2);

    let p = eval.precision_at_100(SimilarityMeasure::Hamming).unwrap();
    assert_eq!(p, 0.02);
}

#[test]
fn test_precision_over_100_pairs() {
    // 20 nodes -> 190 pairs; nodes 2k and 2k+1 share an embedding and an edge
    let matrix = Array2::from_shape_fn((20, 3), |(i, j)| ((i / 2) * 10 + j) as f64);
    let edges: Vec<_> = (0..10).map(|k| (2 * k, 2 * k + 1)).collect();
    let graph = Graph::from_edges(20, edges);
    let mut eval = Evaluator::new(graph, FixedModel::new(matrix), empty_samples(20))
        .with_config(EvalConfig::default().with_timing(false));

    let report = eval.precision_at_k(SimilarityMeasure::Hamming, 100).unwrap();
    assert_eq!(report.ranked.len(), 100);
    assert_eq!(report.true_positives, 10);
    assert!(report.ranked[..10].iter().all(|p| p.similarity == 3.0));
    assert_eq!(report.precision, 0.1);
}

#[test]
fn test_precision_cosine_and_dot_product() {
    let matrix = array![[1.0, 0.0], [0.9, 0.1], [0.0, 1.0], [-1.0, 0.0]];
    let graph = Graph::from_edges(4, [(0, 1)]);

    let mut eval = Evaluator::new(graph.clone(), FixedModel::new(matrix.clone()), empty_samples(4));
    let report = eval.precision_at_k(SimilarityMeasure::Cosine, 100).unwrap();
    assert_eq!((report.ranked[0].row, report.ranked[0].col), (1, 0));
    assert_eq!(report.true_positives, 1);

    let mut eval = Evaluator::new(graph, FixedModel::new(matrix), empty_samples(4));
    let report = eval.precision_at_k(SimilarityMeasure::DotProduct, 2).unwrap();
    assert_eq!(report.ranked.len(), 2);
    assert_eq!((report.ranked[0].row, report.ranked[0].col), (1, 0));
    assert_eq!(report.precision, 0.5);
}

#[test]
fn test_unknown_names_rejected() {
    assert!(matches!(
        "euclidean".parse::<SimilarityMeasure>(),
        Err(Error::UnknownSimilarityMeasure(_))
    ));
    assert!(matches!(
        "sum".parse::<EdgeOperator>(),
        Err(Error::UnknownEdgeOperator(_))
    ));
}

#[test]
fn test_config_and_enums_serde() {
    let config: EvalConfig = serde_json::from_str(r#"{"trace_pairs": true}"#).unwrap();
    assert!(config.trace_pairs);
    assert!(config.timing);

    let measure: SimilarityMeasure = serde_json::from_str(r#""dot_product""#).unwrap();
    assert_eq!(measure, SimilarityMeasure::DotProduct);
    assert_eq!(serde_json::to_string(&EdgeOperator::Hadamard).unwrap(), r#""hadamard""#);
}

#[test]
fn test_samples_reference_is_stable() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let splitter = move |g: &Graph| {
        counter.set(counter.get() + 1);
        SampleBundle::new(g.clone(), g.clone(), vec![(0, 1)], vec![1], vec![], vec![])
    };
    let mut eval = Evaluator::new(
        Graph::from_edges(2, [(0, 1)]),
        FixedModel::new(Array2::zeros((2, 2))),
        splitter,
    );

    let first: *const SampleBundle = eval.samples().unwrap();
    eval.train_node_embeddings().unwrap();
    eval.test_node_embeddings().unwrap();
    let second: *const SampleBundle = eval.samples().unwrap();

    assert!(std::ptr::eq(first, second));
    assert_eq!(calls.get(), 1);
    assert_eq!(eval.embedding_model().fits, 2);
}
