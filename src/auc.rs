//! ROC-AUC via the Wilcoxon-Mann-Whitney U statistic.
//!
//! AUC equals the probability that a random positive outscores a random
//! negative, with ties counted as one half. Sorting once and summing the
//! positive ranks gives it in O(N log N):
//!
//! ```text
//! U   = R_pos - P(P + 1) / 2
//! AUC = U / (P * N)
//! ```

use crate::error::{Error, Result};

/// Area under the ROC curve of `scores` against binary `labels`.
///
/// Higher scores should mean "more likely label 1". Fails when the lengths
/// differ, when a score is NaN or infinite, or when only one class is
/// present.
pub fn roc_auc_score(labels: &[u8], scores: &[f64]) -> Result<f64> {
    if labels.len() != scores.len() {
        return Err(Error::LengthMismatch {
            expected: labels.len(),
            got: scores.len(),
        });
    }

    if let Some(position) = scores.iter().position(|s| !s.is_finite()) {
        return Err(Error::NonFiniteScore {
            position,
            value: scores[position],
        });
    }

    let positives = labels.iter().filter(|&&l| l == 1).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(Error::UndefinedAuc);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Tied groups share their average 1-based rank.
    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && scores[order[j]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        let pos_in_group = order[i..j].iter().filter(|&&idx| labels[idx] == 1).count();
        rank_sum_pos += avg_rank * pos_in_group as f64;
        i = j;
    }

    let p = positives as f64;
    let n = negatives as f64;
    let u = rank_sum_pos - p * (p + 1.0) / 2.0;
    Ok((u / (p * n)).clamp(0.0, 1.0))
}
