#![allow(clippy::implicit_hasher)]

use crate::error::ErrorKind;
use controller::Review;
use num_traits::float::Float;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

type MinHeap<T> = BinaryHeap<Reverse<T>>;

/// Lowercase a single word and strip everything that isn't alphanumeric.
pub fn normalize_word(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Normalized token set of a text: lowercased, punctuation stripped,
/// split on whitespace. A set, not a multiset: repeating a word doesn't
/// multiply-count it.
pub fn token_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(normalize_word)
        .filter(|word| !word.is_empty())
        .collect()
}

/// Jaccard index over two token sets.
pub fn jaccard_index<V>(a: &HashSet<String>, b: &HashSet<String>) -> Result<V, ErrorKind>
where
    V: Float,
{
    match (a.is_empty(), b.is_empty()) {
        // An empty text is never similar to anything, not even another
        // empty text
        (true, _) | (_, true) => Ok(V::zero()),

        // Both have at least one token, proceed
        _ => {
            let union = a.union(b).count();
            let inter = a.intersection(b).count();

            let inter = V::from(inter).ok_or(ErrorKind::ConvertType)?;
            let union = V::from(union).ok_or(ErrorKind::ConvertType)?;

            Ok(inter / union)
        }
    }
}

/// Similarity of two raw texts in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard_index(&token_set(a), &token_set(b)).unwrap_or(0.0)
}

/// Whether `new_text` is a near-duplicate of any prior text. The
/// threshold is inclusive: a similarity exactly at it already counts.
pub fn is_near_duplicate<'a, I>(new_text: &str, priors: I, threshold: f64) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let target = token_set(new_text);
    if target.is_empty() {
        return false;
    }

    priors.into_iter().any(|prior| {
        let sim: f64 = jaccard_index(&target, &token_set(prior)).unwrap_or(0.0);
        sim >= threshold
    })
}

/// A review id paired with its similarity to some target.
#[derive(Debug, Clone)]
pub struct ScoredReview(pub String, pub f64);

impl ScoredReview {
    pub fn score(&self) -> f64 {
        self.1
    }
}

impl PartialEq for ScoredReview {
    fn eq(&self, other: &Self) -> bool {
        self.score().eq(&other.score())
    }
}

impl Eq for ScoredReview {}

impl PartialOrd for ScoredReview {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.score().partial_cmp(&other.score())
    }
}

impl Ord for ScoredReview {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score().partial_cmp(&other.score()).unwrap()
    }
}

/// Top-k reviews most similar to `target`, keeping only candidates at or
/// above `threshold`, most similar first. A bounded min-heap keeps the k
/// best seen so far, so candidates can stream through.
pub fn rank_similar(
    target: &Review,
    candidates: &[Review],
    k: usize,
    threshold: f64,
) -> Vec<ScoredReview> {
    let target_tokens = token_set(&target.text);
    if k == 0 || target_tokens.is_empty() {
        return Vec::new();
    }

    let mut min_heap: MinHeap<ScoredReview> = Default::default();
    for candidate in candidates {
        if candidate.id == target.id {
            continue;
        }

        let sim: f64 = jaccard_index(&target_tokens, &token_set(&candidate.text)).unwrap_or(0.0);
        if sim < threshold {
            continue;
        }

        let scored = ScoredReview(candidate.id.clone(), sim);
        if min_heap.len() < k {
            min_heap.push(Reverse(scored));
        } else {
            let minimum = min_heap.peek().unwrap();
            if sim > (minimum.0).score() {
                min_heap.pop();
                min_heap.push(Reverse(scored));
            }
        }
    }

    min_heap.into_sorted_vec().into_iter().map(|r| r.0).collect()
}
