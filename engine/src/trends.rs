use crate::text::token_set;
use crate::utils::{clamp, round2};
use chrono::{Datelike, NaiveDate};
use controller::{Category, Review};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Terms whose presence in a review reads as a positive signal.
const POSITIVE_KEYWORDS: &[&str] = &[
    "balance",
    "benefits",
    "culture",
    "flexible",
    "friendly",
    "growth",
    "learning",
    "opportunity",
    "supportive",
    "transparent",
];

/// Terms whose presence reads as a negative signal.
const NEGATIVE_KEYWORDS: &[&str] = &[
    "burnout",
    "favoritism",
    "layoffs",
    "micromanagement",
    "overtime",
    "pressure",
    "stress",
    "toxic",
    "turnover",
    "underpaid",
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendReport {
    pub category_averages: HashMap<Category, f64>,
    pub review_count_by_date: BTreeMap<NaiveDate, usize>,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    pub sentiment_trend: f64,
}

/// Streaming accumulator behind the trend report. Reviews arrive in
/// chunks (so a scan over a long date range can stop between chunks) and
/// `finish` folds the partial sums into the report.
#[derive(Debug, Default)]
pub struct TrendScan {
    per_category: HashMap<Category, (f64, usize)>,
    count_by_date: BTreeMap<NaiveDate, usize>,
    per_month: BTreeMap<(i32, u32), (f64, usize)>,
    positive: BTreeSet<String>,
    negative: BTreeSet<String>,
}

impl TrendScan {
    pub fn push(&mut self, review: &Review) {
        let rating = clamp(review.overall_rating, 0.0, 5.0);

        let entry = self.per_category.entry(review.category).or_insert((0.0, 0));
        entry.0 += rating;
        entry.1 += 1;

        let date = review.created_at.date_naive();
        *self.count_by_date.entry(date).or_insert(0) += 1;

        let month = (date.year(), date.month());
        let entry = self.per_month.entry(month).or_insert((0.0, 0));
        entry.0 += rating;
        entry.1 += 1;

        let tokens = token_set(&review.text);
        for keyword in POSITIVE_KEYWORDS {
            if tokens.contains(*keyword) {
                self.positive.insert((*keyword).to_owned());
            }
        }
        for keyword in NEGATIVE_KEYWORDS {
            if tokens.contains(*keyword) {
                self.negative.insert((*keyword).to_owned());
            }
        }
    }

    pub fn update(&mut self, reviews: &[Review]) {
        for review in reviews {
            self.push(review);
        }
    }

    pub fn finish(self) -> TrendReport {
        let category_averages = self
            .per_category
            .into_iter()
            .map(|(category, (sum, count))| (category, round2(sum / count as f64)))
            .collect();

        // Relative rating change between the earliest and the latest
        // month in range; undefined slopes collapse to zero
        let sentiment_trend = if self.per_month.len() < 2 {
            0.0
        } else {
            let (first_sum, first_count) = self.per_month.values().next().unwrap();
            let (last_sum, last_count) = self.per_month.values().last().unwrap();

            let first_avg = first_sum / *first_count as f64;
            let last_avg = last_sum / *last_count as f64;

            if first_avg == 0.0 {
                0.0
            } else {
                round2((last_avg - first_avg) / first_avg)
            }
        };

        TrendReport {
            category_averages,
            review_count_by_date: self.count_by_date,
            positive_keywords: self.positive.into_iter().collect(),
            negative_keywords: self.negative.into_iter().collect(),
            sentiment_trend,
        }
    }
}

/// Trend report over a fully materialized review list.
pub fn trends(reviews: &[Review]) -> TrendReport {
    let mut scan = TrendScan::default();
    scan.update(reviews);
    scan.finish()
}
