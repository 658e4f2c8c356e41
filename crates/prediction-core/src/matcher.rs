//! Template scoring and top-K selection.
//!
//! Scoring is elastic and asymmetric: the live signature is compared
//! element-wise against the template's valid region, and any part of the
//! live signature that runs past the end of that region is charged as if
//! the template had come to rest. Lower scores are better.

use cursorcast_trace_model::library::TemplateLibrary;
use cursorcast_trace_model::template::{Signature, Template};

use crate::mode::Projection;

/// A selected template and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Position of the template in the library.
    pub index: usize,
    pub score: f64,
}

/// Scores a live signature against a library and keeps the best `k`.
#[derive(Debug, Clone, Copy)]
pub struct TemplateMatcher {
    k: usize,
    projection: Projection,
}

impl TemplateMatcher {
    pub fn new(k: usize, projection: Projection) -> Self {
        Self { k, projection }
    }

    /// The profile compared under this matcher's projection.
    pub fn key<'a>(&self, signature: &'a Signature) -> &'a [f64] {
        match self.projection {
            Projection::Planar => &signature.vap,
            Projection::Axis { .. } => &signature.vp,
        }
    }

    /// Score one template against the live signature.
    pub fn score(&self, current: &Signature, template: &Template) -> f64 {
        score(
            self.key(current),
            self.key(&template.signature),
            template.lbos,
        )
    }

    /// Score every template and return the best `k`, best first.
    pub fn find_matches(&self, current: &Signature, library: &TemplateLibrary) -> Vec<Match> {
        let scores: Vec<f64> = library
            .iter()
            .map(|template| self.score(current, template))
            .collect();
        select_top_k(&scores, self.k)
    }
}

/// Elastic distance between a live key and a template key.
///
/// The template's valid length is `max(lbos - 2, 1)` when bounded, otherwise
/// its full key length. Entries of the live key beyond that length are
/// compared against zero. The result is the mean absolute difference over
/// the live key, so it is never negative; an empty live key scores 0.
pub fn score(current: &[f64], template: &[f64], lbos: Option<usize>) -> f64 {
    if current.is_empty() {
        return 0.0;
    }

    let valid = match lbos {
        Some(bound) => bound.saturating_sub(2).max(1),
        None => template.len(),
    };
    let matched = valid.min(template.len());

    let total: f64 = current
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if i < matched {
                (c - template[i]).abs()
            } else {
                c.abs()
            }
        })
        .sum();

    total / current.len() as f64
}

/// Keep the `k` lowest scores, in ascending order.
///
/// Scores are visited in input order and inserted into a fixed-size sorted
/// list; a score only displaces entries it strictly beats, so among equal
/// scores the earlier index wins. Unfilled slots (fewer than `k` scores, or
/// scores that never beat the sentinel such as NaN) are dropped from the
/// result.
pub fn select_top_k(scores: &[f64], k: usize) -> Vec<Match> {
    let mut best = vec![f64::INFINITY; k];
    let mut slots: Vec<Option<usize>> = vec![None; k];

    for (index, &score) in scores.iter().enumerate() {
        if let Some(j) = best.iter().position(|&b| score < b) {
            best[j..].rotate_right(1);
            slots[j..].rotate_right(1);
            best[j] = score;
            slots[j] = Some(index);
        }
    }

    slots
        .into_iter()
        .zip(best)
        .filter_map(|(slot, score)| slot.map(|index| Match { index, score }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identical_keys_score_zero() {
        let key = [1.0, -2.0, 3.5];
        assert_eq!(score(&key, &key, None), 0.0);
    }

    #[test]
    fn test_prefix_mean_when_template_is_longer() {
        let current = [1.0, 2.0];
        let template = [2.0, 4.0, 9.0, 9.0];
        assert!((score(&current, &template, None) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_tail_penalized_when_template_ends_early() {
        let current = [1.0, 1.0, 3.0, -5.0];
        let template = [1.0, 1.0];
        // (0 + 0 + |3| + |-5|) / 4
        assert!((score(&current, &template, None) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_lbos_bounds_valid_length() {
        let current = [1.0, 1.0, 1.0];
        let template = [1.0, 1.0, 1.0, 1.0];
        // lbos = 3 leaves one valid entry; the remaining two are charged in full.
        assert!((score(&current, &template, Some(3)) - 2.0 / 3.0).abs() < 1e-12);
        // Tiny bounds still keep one entry.
        assert_eq!(score(&current, &template, Some(0)), score(&current, &template, Some(3)));
    }

    #[test]
    fn test_lbos_past_key_end_treated_as_zero() {
        let current = [1.0, 1.0, 1.0];
        let template = [1.0];
        assert!((score(&current, &template, Some(50)) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_current_scores_zero() {
        assert_eq!(score(&[], &[1.0], None), 0.0);
    }

    #[test]
    fn test_top_k_ascending_with_stable_ties() {
        let scores = [0.5, 0.2, 0.5, 0.1, 0.2];
        let picked = select_top_k(&scores, 3);
        let indices: Vec<usize> = picked.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![3, 1, 4]);
    }

    #[test]
    fn test_top_k_with_fewer_scores_than_k() {
        let picked = select_top_k(&[0.3, 0.1], 5);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0], Match { index: 1, score: 0.1 });
    }

    #[test]
    fn test_top_k_ignores_nan() {
        let picked = select_top_k(&[f64::NAN, 0.4], 2);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].index, 1);
    }

    #[test]
    fn test_key_follows_projection() {
        let sig = Signature {
            vp: vec![1.0],
            ap: vec![-0.5],
            vap: vec![-1.0],
        };
        assert_eq!(TemplateMatcher::new(1, Projection::Planar).key(&sig), &[-1.0]);
        assert_eq!(
            TemplateMatcher::new(1, Projection::Axis { ux: 1.0, uy: 0.0 }).key(&sig),
            &[1.0]
        );
    }

    proptest! {
        #[test]
        fn prop_score_is_non_negative(
            current in prop::collection::vec(-10.0..10.0f64, 0..20),
            template in prop::collection::vec(-10.0..10.0f64, 0..20),
            lbos in prop::option::of(0usize..25),
        ) {
            prop_assert!(score(&current, &template, lbos) >= 0.0);
        }

        #[test]
        fn prop_self_score_is_zero(key in prop::collection::vec(-10.0..10.0f64, 1..20)) {
            prop_assert_eq!(score(&key, &key, None), 0.0);
        }

        #[test]
        fn prop_top_k_matches_stable_sort(
            scores in prop::collection::vec(0u8..6, 0..30),
            k in 1usize..8,
        ) {
            let scores: Vec<f64> = scores.into_iter().map(f64::from).collect();
            let picked: Vec<usize> = select_top_k(&scores, k).iter().map(|m| m.index).collect();

            let mut expected: Vec<usize> = (0..scores.len()).collect();
            expected.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
            expected.truncate(k);

            prop_assert_eq!(picked.len(), k.min(scores.len()));
            prop_assert_eq!(picked, expected);
        }
    }
}
