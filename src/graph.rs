use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Node identifier. Doubles as the row index into an embedding matrix.
pub type NodeId = usize;

/// An unordered node pair, `(u, v)`.
pub type NodePair = (NodeId, NodeId);

/// An undirected graph over dense node ids `0..n`.
///
/// Uses petgraph's undirected graph internally. Node `i` is always
/// `NodeIndex::new(i)`, so ids index embedding rows with no remapping.
///
/// # Example
///
/// ```rust
/// use bipartite_embeddings::Graph;
///
/// let mut g = Graph::with_nodes(3);
/// g.add_edge(0, 2);
///
/// assert!(g.has_edge(2, 0));
/// assert!(!g.has_edge(0, 1));
/// assert_eq!(g.node_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    graph: UnGraph<(), ()>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
        }
    }

    /// Create a graph with `n` isolated nodes.
    pub fn with_nodes(n: usize) -> Self {
        let mut graph = UnGraph::with_capacity(n, 0);
        for _ in 0..n {
            graph.add_node(());
        }
        Self { graph }
    }

    /// Create a graph with `n` nodes and the given edges.
    ///
    /// Edges referencing ids `>= n` grow the node set.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = NodePair>) -> Self {
        let mut g = Self::with_nodes(n);
        for (u, v) in edges {
            g.add_edge(u, v);
        }
        g
    }

    /// Add an isolated node, returning its id.
    pub fn add_node(&mut self) -> NodeId {
        self.graph.add_node(()).index()
    }

    /// Add an undirected edge, growing the node set to cover both endpoints.
    ///
    /// Adding an edge that already exists is a no-op.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) {
        self.ensure_node(u.max(v));
        if !self.has_edge(u, v) {
            self.graph
                .add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
        }
    }

    fn ensure_node(&mut self, id: NodeId) {
        while self.graph.node_count() <= id {
            self.graph.add_node(());
        }
    }

    /// Whether an edge joins `u` and `v` (in either direction).
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        if u >= self.node_count() || v >= self.node_count() {
            return false;
        }
        self.graph
            .find_edge(NodeIndex::new(u), NodeIndex::new(v))
            .is_some()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().map(|idx| idx.index())
    }

    /// Iterate edges as `(u, v)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = NodePair> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }

    /// Neighbors of `u`. Empty for unknown nodes.
    pub fn neighbors(&self, u: NodeId) -> Vec<NodeId> {
        if u >= self.node_count() {
            return Vec::new();
        }
        self.graph
            .neighbors(NodeIndex::new(u))
            .map(|n| n.index())
            .collect()
    }

    /// Degree of `u`. Zero for unknown nodes.
    pub fn degree(&self, u: NodeId) -> usize {
        self.neighbors(u).len()
    }

    /// Get the underlying petgraph graph.
    pub fn as_petgraph(&self) -> &UnGraph<(), ()> {
        &self.graph
    }
}
