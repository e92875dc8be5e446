//! Edge operators: combining two node vectors into one edge vector.
//!
//! | Operator | Output width | Commutative |
//! |----------|--------------|-------------|
//! | `Concat` | 2d | no (u first) |
//! | `Hadamard` | d | yes |
//! | `Average` | d | yes |

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::NodePair;

/// How an edge embedding is built from its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOperator {
    /// `[emb(u), emb(v)]`
    Concat,
    /// `emb(u) * emb(v)` element-wise
    Hadamard,
    /// `(emb(u) + emb(v)) / 2`
    Average,
}

impl EdgeOperator {
    /// All operators, in declaration order.
    pub const ALL: [Self; 3] = [Self::Concat, Self::Hadamard, Self::Average];

    /// Lowercase name, as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concat => "concat",
            Self::Hadamard => "hadamard",
            Self::Average => "average",
        }
    }

    /// Edge embedding width for node embeddings of width `dim`.
    pub fn output_dim(&self, dim: usize) -> usize {
        match self {
            Self::Concat => 2 * dim,
            Self::Hadamard | Self::Average => dim,
        }
    }

    /// Write the combination of `u` and `v` into `out`.
    ///
    /// `out` must have length [`EdgeOperator::output_dim`].
    pub fn combine_into(
        &self,
        u: ArrayView1<'_, f64>,
        v: ArrayView1<'_, f64>,
        mut out: ArrayViewMut1<'_, f64>,
    ) {
        match self {
            Self::Concat => {
                for (o, &x) in out.iter_mut().zip(u.iter().chain(v.iter())) {
                    *o = x;
                }
            }
            Self::Hadamard => {
                ndarray::Zip::from(&mut out)
                    .and(&u)
                    .and(&v)
                    .for_each(|o, &a, &b| *o = a * b);
            }
            Self::Average => {
                ndarray::Zip::from(&mut out)
                    .and(&u)
                    .and(&v)
                    .for_each(|o, &a, &b| *o = (a + b) / 2.0);
            }
        }
    }
}

impl fmt::Display for EdgeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "concat" => Ok(Self::Concat),
            "hadamard" => Ok(Self::Hadamard),
            "average" => Ok(Self::Average),
            _ => Err(Error::UnknownEdgeOperator(s.to_string())),
        }
    }
}

/// Build one edge embedding per pair in `edges`, in order.
///
/// Row `i` of the result is `op(nodes[u_i], nodes[v_i])`. Fails if a pair
/// references a node with no row in `nodes`.
pub fn edge_embeddings(
    nodes: ArrayView2<'_, f64>,
    edges: &[NodePair],
    op: EdgeOperator,
) -> Result<Array2<f64>> {
    let rows = nodes.nrows();
    let mut out = Array2::zeros((edges.len(), op.output_dim(nodes.ncols())));

    for (mut row, &(u, v)) in out.rows_mut().into_iter().zip(edges) {
        for node in [u, v] {
            if node >= rows {
                return Err(Error::NodeOutOfRange { node, rows });
            }
        }
        op.combine_into(nodes.row(u), nodes.row(v), row.view_mut());
    }

    Ok(out)
}
