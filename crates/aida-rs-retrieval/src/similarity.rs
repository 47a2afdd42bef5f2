//! Cosine similarity and top-k ranking.

use crate::model::{IndexEntry, SearchHit};
use std::cmp::Ordering;

/// Cosine similarity of two equal-length vectors.
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Score every entry against `query` and keep the best `top_k`.
///
/// Entries must already share the query's dimensionality. Ordering is by
/// descending score; equal scores keep insertion order.
pub fn rank(entries: &[IndexEntry], query: &[f32], top_k: usize) -> Vec<SearchHit> {
    let mut scored: Vec<(usize, f32)> = entries
        .iter()
        .enumerate()
        .map(|(position, entry)| (position, cosine_similarity(&entry.embedding, query)))
        .collect();
    scored.sort_by(|(pos_a, score_a), (pos_b, score_b)| {
        match score_b.total_cmp(score_a) {
            Ordering::Equal => pos_a.cmp(pos_b),
            other => other,
        }
    });
    scored
        .into_iter()
        .take(top_k)
        .map(|(position, score)| {
            let entry = &entries[position];
            SearchHit {
                id: entry.id.clone(),
                content: entry.content.clone(),
                metadata: entry.metadata.clone(),
                score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{cosine_similarity, rank};
    use crate::model::IndexEntry;
    use aida_rs_protocol::Metadata;
    use pretty_assertions::assert_eq;

    fn entry(id: &str, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            content: format!("content {id}"),
            metadata: Metadata::new(),
            embedding,
        }
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let score = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn rank_orders_by_descending_score() {
        let entries = vec![
            entry("low", vec![0.0, 1.0]),
            entry("high", vec![1.0, 0.0]),
            entry("mid", vec![1.0, 1.0]),
        ];
        let hits = rank(&entries, &[1.0, 0.0], 3);
        let ids: Vec<&str> = hits.iter().map(|hit| hit.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
        assert!(hits.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn rank_breaks_ties_by_insertion_order() {
        let entries = vec![
            entry("doc_10", vec![1.0, 0.0]),
            entry("doc_2", vec![1.0, 0.0]),
            entry("doc_1", vec![1.0, 0.0]),
        ];
        let hits = rank(&entries, &[1.0, 0.0], 2);
        let ids: Vec<&str> = hits.iter().map(|hit| hit.id.as_str()).collect();
        assert_eq!(ids, vec!["doc_10", "doc_2"]);
    }

    #[test]
    fn rank_truncates_to_top_k() {
        let entries = vec![entry("a", vec![1.0]), entry("b", vec![1.0])];
        assert_eq!(rank(&entries, &[1.0], 1).len(), 1);
        assert_eq!(rank(&entries, &[1.0], 10).len(), 2);
    }
}
