//! Pairwise node similarity and top-k pair ranking.
//!
//! # Pipeline
//!
//! 1. [`similarity_matrix`]: n x n scores for every node pair
//! 2. [`mask_strict_lower`]: keep entries strictly below the diagonal, so
//!    each unordered pair appears once and self-pairs drop out
//! 3. [`top_pairs`]: partial selection of the k best pairs, then a sort of
//!    just those k
//!
//! # Measures
//!
//! | Measure | Score | Range |
//! |---------|-------|-------|
//! | Cosine | <a, b> / (\|a\| \|b\|) | [-1, 1] |
//! | Hamming | #{i : a_i == b_i} | [0, d] |
//! | DotProduct | <a, b> | unbounded |
//!
//! `Hamming` is an agreement count, not a distance: identical vectors score
//! `d`. It suits discrete (sketch-style) embeddings where components are ids.
//!
//! # Ranking ties
//!
//! Equal scores are ordered by ascending row-major index of the pair in the
//! n x n matrix. The order is arbitrary but deterministic. NaN ranks last,
//! below every number, so non-finite embeddings never count as close pairs.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::NodeId;

/// Similarity between two node embeddings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMeasure {
    /// Cosine similarity.
    Cosine,
    /// Count of equal components.
    #[default]
    Hamming,
    /// Raw dot product.
    DotProduct,
}

impl SimilarityMeasure {
    /// All measures, in declaration order.
    pub const ALL: [Self; 3] = [Self::Cosine, Self::Hamming, Self::DotProduct];

    /// Lowercase name, as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Hamming => "hamming",
            Self::DotProduct => "dot_product",
        }
    }
}

impl fmt::Display for SimilarityMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMeasure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "hamming" => Ok(Self::Hamming),
            "dot_product" => Ok(Self::DotProduct),
            _ => Err(Error::UnknownSimilarityMeasure(s.to_string())),
        }
    }
}

/// Pairwise similarity of the rows of `embeddings`.
pub fn similarity_matrix(embeddings: ArrayView2<'_, f64>, measure: SimilarityMeasure) -> Array2<f64> {
    match measure {
        SimilarityMeasure::DotProduct => embeddings.dot(&embeddings.t()),
        SimilarityMeasure::Cosine => {
            let mut unit = embeddings.to_owned();
            for mut row in unit.axis_iter_mut(Axis(0)) {
                let norm = row.dot(&row).sqrt();
                // zero rows stay zero and score 0 against everything
                if norm > 0.0 {
                    row /= norm;
                }
            }
            unit.dot(&unit.t())
        }
        SimilarityMeasure::Hamming => {
            let n = embeddings.nrows();
            let mut out = Array2::zeros((n, n));
            for i in 0..n {
                let a = embeddings.row(i);
                for j in 0..=i {
                    let b = embeddings.row(j);
                    let agree = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count() as f64;
                    out[[i, j]] = agree;
                    out[[j, i]] = agree;
                }
            }
            out
        }
    }
}

/// Zero the diagonal and everything above it.
pub fn mask_strict_lower(matrix: &mut Array2<f64>) {
    for ((row, col), value) in matrix.indexed_iter_mut() {
        if col >= row {
            *value = 0.0;
        }
    }
}

/// Number of strictly-lower positions in an n x n matrix, `n(n-1)/2`.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// A node pair picked by [`top_pairs`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedPair {
    /// Row node (the larger id).
    pub row: NodeId,
    /// Column node (the smaller id).
    pub col: NodeId,
    /// Masked similarity value.
    pub similarity: f64,
}

/// The `k` highest-scoring strictly-lower pairs of `masked`, best first.
///
/// Only positions below the diagonal are candidates, so at most
/// `n(n-1)/2` pairs come back even when `k` is larger.
pub fn top_pairs(masked: ArrayView2<'_, f64>, k: usize) -> Vec<RankedPair> {
    let ncols = masked.ncols();

    // (row-major flat index, value)
    let mut candidates: Vec<(usize, f64)> = masked
        .indexed_iter()
        .filter(|((row, col), _)| col < row)
        .map(|((row, col), &value)| (row * ncols + col, value))
        .collect();

    let k = k.min(candidates.len());
    if k == 0 {
        return Vec::new();
    }
    if k < candidates.len() {
        candidates.select_nth_unstable_by(k - 1, rank_order);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(rank_order);

    candidates
        .into_iter()
        .map(|(flat, similarity)| RankedPair {
            row: flat / ncols,
            col: flat % ncols,
            similarity,
        })
        .collect()
}

/// Higher value first, then lower flat index.
fn rank_order(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    descending(a.1, b.1).then(a.0.cmp(&b.0))
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
