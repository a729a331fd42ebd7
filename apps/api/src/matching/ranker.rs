//! Similarity Ranker: cosine similarity of the student vector against every
//! posting vector, sorted descending with catalog order breaking ties.

use serde::{Deserialize, Serialize};

use crate::matching::feature_space::SparseVector;
use crate::models::internship::InternshipPosting;

/// A posting annotated with its similarity to the current student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPosting {
    #[serde(flatten)]
    pub posting: InternshipPosting,
    pub match_score: f64,     // 0.0 – 1.0
    pub match_percentage: f64, // 0 – 100, 2 decimals
}

/// Cosine similarity clamped to [0, 1]. Zero when either vector is all-zero.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Rounds a [0, 1] score to a percentage with two decimals.
pub fn to_percentage(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}

/// Scores every posting independently and returns them best-first.
///
/// `postings` and `posting_vectors` are parallel slices in catalog order.
pub fn rank(
    student: &SparseVector,
    postings: &[InternshipPosting],
    posting_vectors: &[SparseVector],
) -> Vec<ScoredPosting> {
    debug_assert_eq!(postings.len(), posting_vectors.len());

    let mut scored: Vec<ScoredPosting> = postings
        .iter()
        .zip(posting_vectors)
        .map(|(posting, vector)| {
            let match_score = cosine_similarity(student, vector);
            ScoredPosting {
                posting: posting.clone(),
                match_score,
                match_percentage: to_percentage(match_score),
            }
        })
        .collect();

    // `sort_by` is stable, so equal scores keep catalog order.
    scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    scored
}
