//! Cosine scoring shared by the in-memory store and the Elasticsearch query
//!
//! Elasticsearch ranks with `cosineSimilarity(query, doc) + 1.0` so that
//! scores are never negative. The same transform is applied locally so the
//! two backends produce comparable scores.

use crate::types::RetrievedPassage;

/// Highest score the `cosine + 1.0` transform can produce
pub const MAX_SCORE: f32 = 2.0;

/// Cosine similarity in [-1, 1]; 0.0 when either vector has zero norm, the
/// lengths differ, or a component is not finite
///
/// Accumulates in `f64` so large-magnitude components do not overflow.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 || !denominator.is_finite() || !dot.is_finite() {
        return 0.0;
    }

    (dot / denominator).clamp(-1.0, 1.0) as f32
}

/// Non-negative ranking score, mirroring the Elasticsearch script
pub fn script_score(query: &[f32], doc: &[f32]) -> f32 {
    cosine_similarity(query, doc) + 1.0
}

/// Sort by descending score (stable, so ties keep store order) and keep `top_k`
///
/// Non-finite scores sink below every real score.
pub fn rank_passages(mut passages: Vec<RetrievedPassage>, top_k: usize) -> Vec<RetrievedPassage> {
    passages.sort_by(|a, b| rank_key(b.score).total_cmp(&rank_key(a.score)));
    passages.truncate(top_k);
    passages
}

fn rank_key(score: f32) -> f32 {
    if score.is_finite() {
        score
    } else {
        f32::NEG_INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_max() {
        let v = vec![0.3, -0.2, 0.9, 0.1];
        assert!((script_score(&v, &v) - MAX_SCORE).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors_score_zero() {
        let a = vec![1.0, 2.0, 3.0];
        let b: Vec<f32> = a.iter().map(|x| -x).collect();
        assert!(script_score(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((cosine_similarity(&a, &b)).abs() < 1e-6);
        assert!((script_score(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_large_magnitude_vectors_do_not_overflow() {
        let v = vec![1e30, 1e30];
        assert_eq!(script_score(&v, &v), MAX_SCORE);

        let w = vec![3e25, -4e25, 1e20];
        assert!((script_score(&w, &w) - MAX_SCORE).abs() < 1e-6);
        assert!(script_score(&w, &[-3e25, 4e25, -1e20]).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_components_score_neutral() {
        assert_eq!(cosine_similarity(&[f32::INFINITY, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
        assert!((script_score(&[f32::MAX, f32::MAX], &[1.0, 1.0]) - MAX_SCORE).abs() < 1e-6);
    }

    #[test]
    fn test_rank_sinks_nan_scores() {
        let passages: Vec<RetrievedPassage> = (0..40)
            .map(|i| {
                let score = if i % 3 == 0 { f32::NAN } else { i as f32 / 40.0 };
                RetrievedPassage::new(format!("Destination {}", i), score)
            })
            .collect();

        let ranked = rank_passages(passages, 3);
        let texts: Vec<&str> = ranked.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["Destination 38", "Destination 37", "Destination 35"]);

        let all = rank_passages(
            vec![
                RetrievedPassage::new("Ziro.", f32::NAN),
                RetrievedPassage::new("Majuli.", 0.5),
                RetrievedPassage::new("Hampi.", f32::INFINITY),
            ],
            3,
        );
        assert_eq!(all[0].text, "Majuli.");
        assert!(all[1..].iter().all(|p| !p.score.is_finite()));
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let ranked = rank_passages(
            vec![
                RetrievedPassage::new("Chitkul last village.", 1.2),
                RetrievedPassage::new("Parvati Valley hidden villages.", 1.9),
                RetrievedPassage::new("Spiti monasteries.", 0.4),
                RetrievedPassage::new("Tirthan Valley trout fishing.", 1.5),
            ],
            3,
        );

        let texts: Vec<&str> = ranked.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Parvati Valley hidden villages.",
                "Tirthan Valley trout fishing.",
                "Chitkul last village.",
            ]
        );
    }
}
