use crate::utils::{clamp, round2};
use chrono::{DateTime, Utc};
use config::AggregationConfig;
use controller::{Category, CompanyRatingSnapshot, Review};
use std::collections::HashMap;

/// Trust weight of a single review inside the company average:
/// document-verified reviews count double, and helpfulness adds up to
/// `helpfulness_boost` on top.
pub fn review_weight(review: &Review, config: &AggregationConfig) -> f64 {
    let base = if review.is_document_verified {
        config.verified_weight
    } else {
        1.0
    };

    base * (1.0 + config.helpfulness_boost * clamp(review.helpfulness_score, 0.0, 100.0) / 100.0)
}

/// Weighted company rating over its active reviews, plus plain
/// per-category means. The category breakdown is deliberately
/// unweighted: it answers "what do people say about X", the overall
/// answers "how trustworthy-weighted is this company".
///
/// No reviews is a valid zero state, never an error. Idempotent: the
/// same review list and `computed_at` produce a bit-identical snapshot.
pub fn aggregate(
    active_reviews: &[Review],
    computed_at: DateTime<Utc>,
    config: &AggregationConfig,
) -> CompanyRatingSnapshot {
    if active_reviews.is_empty() {
        return CompanyRatingSnapshot {
            average_rating: 0.0,
            total_review_count: 0,
            category_averages: HashMap::new(),
            computed_at,
        };
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut per_category: HashMap<Category, (f64, usize)> = HashMap::new();

    for review in active_reviews {
        let rating = clamp(review.overall_rating, 0.0, 5.0);
        let weight = review_weight(review, config);

        weighted_sum += rating * weight;
        weight_total += weight;

        let entry = per_category.entry(review.category).or_insert((0.0, 0));
        entry.0 += rating;
        entry.1 += 1;
    }

    let average_rating = if weight_total == 0.0 {
        0.0
    } else {
        clamp(round2(weighted_sum / weight_total), 0.0, 5.0)
    };

    let category_averages = per_category
        .into_iter()
        .map(|(category, (sum, count))| (category, round2(sum / count as f64)))
        .collect();

    CompanyRatingSnapshot {
        average_rating,
        total_review_count: active_reviews.len(),
        category_averages,
        computed_at,
    }
}
