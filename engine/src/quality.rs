use crate::helpfulness;
use crate::text::normalize_word;
use crate::utils::round2;
use controller::Review;
use std::collections::HashSet;

/// Strongly subjective adjectives, both extremes. Every occurrence of
/// one of these costs objectivity points.
const SUBJECTIVE_WORDS: &[&str] = &[
    "amazing",
    "awesome",
    "fantastic",
    "incredible",
    "wonderful",
    "perfect",
    "best",
    "terrible",
    "horrible",
    "awful",
    "disgusting",
    "miserable",
    "unbearable",
    "worst",
    "useless",
    "pathetic",
];

const WEIGHT_LENGTH: f64 = 0.2;
const WEIGHT_DETAIL: f64 = 0.3;
const WEIGHT_OBJECTIVITY: f64 = 0.2;
const WEIGHT_HELPFULNESS: f64 = 0.3;

/// Threshold under which a component earns an improvement suggestion.
const SUGGESTION_CUTOFF: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub length_score: f64,
    pub detail_score: f64,
    pub objectivity_score: f64,
    pub helpfulness_score: f64,
    pub overall_score: f64,
    pub suggestions: Vec<String>,
}

/// Composite quality of a review, reproducible from the review snapshot
/// alone. Components are in [0, 100].
pub fn quality(review: &Review) -> QualityReport {
    let length_score = length_score(&review.text);
    let detail_score = detail_score(&review.text);
    let objectivity_score = objectivity_score(&review.text);
    let helpfulness_score = helpfulness::score(
        review.upvotes,
        review.downvotes,
        review.is_document_verified,
    );

    let overall_score = round2(
        WEIGHT_LENGTH * length_score
            + WEIGHT_DETAIL * detail_score
            + WEIGHT_OBJECTIVITY * objectivity_score
            + WEIGHT_HELPFULNESS * helpfulness_score,
    );

    let mut suggestions = Vec::new();
    if length_score < SUGGESTION_CUTOFF {
        suggestions
            .push("Reviews between 200 and 1000 characters are the most useful".to_owned());
    }
    if detail_score < SUGGESTION_CUTOFF {
        suggestions.push(
            "Describe concrete situations in a few more sentences".to_owned(),
        );
    }
    if objectivity_score < SUGGESTION_CUTOFF {
        suggestions.push(
            "Swap extreme adjectives for specific, verifiable facts".to_owned(),
        );
    }
    if helpfulness_score < SUGGESTION_CUTOFF {
        suggestions.push(
            "Verify your employment documents so readers can trust this review".to_owned(),
        );
    }

    QualityReport {
        length_score,
        detail_score,
        objectivity_score,
        helpfulness_score,
        overall_score,
        suggestions,
    }
}

fn length_score(text: &str) -> f64 {
    let length = text.chars().count();
    match length {
        200..=1000 => 100.0,
        100..=2000 => 80.0,
        length if length >= 50 => 60.0,
        _ => 30.0,
    }
}

fn detail_score(text: &str) -> f64 {
    let sentences = text
        .split(|c| c == '.' || c == '!' || c == '?')
        .filter(|sentence| !sentence.trim().is_empty())
        .count();

    let unique_words: HashSet<String> = text
        .split_whitespace()
        .map(normalize_word)
        .filter(|word| !word.is_empty())
        .collect();

    (sentences as f64 * 10.0 + unique_words.len() as f64 * 2.0).min(100.0)
}

fn objectivity_score(text: &str) -> f64 {
    let hits = text
        .split_whitespace()
        .map(normalize_word)
        .filter(|word| SUBJECTIVE_WORDS.contains(&word.as_str()))
        .count();

    (100.0 - 20.0 * hits as f64).max(0.0)
}
