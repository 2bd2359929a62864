// Copyright (C) 2020 Kevin Del Castillo Ramírez
//
// This file is part of review-system.
//
// review-system is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// review-system is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with review-system.  If not, see <http://www.gnu.org/licenses/>.

pub mod aggregate;
pub mod cancel;
pub mod error;
pub mod helpfulness;
pub mod manipulation;
pub mod quality;
pub mod text;
pub mod trends;
pub mod utils;

use crate::cancel::CancelToken;
use crate::quality::QualityReport;
use crate::text::ScoredReview;
use crate::trends::{TrendReport, TrendScan};
use anyhow::Error;
use chrono::{DateTime, Duration, Utc};
use config::Config;
use controller::{error::ErrorKind, CompanyRatingSnapshot, Controller, Review, SearchBy};
use std::collections::HashSet;

/// Review text bounds enforced at creation.
pub const MIN_REVIEW_CHARS: usize = 50;
pub const MAX_REVIEW_CHARS: usize = 5000;

const TREND_CHUNK_SIZE: usize = 256;

/// Outcome of the submission gate. Advisory: the calling workflow
/// decides whether a rejection reason blocks, quarantines or just logs.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionCheck {
    Accepted,
    TooShort,
    TooLong,
    NearDuplicate { review_id: String, similarity: f64 },
}

impl SubmissionCheck {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionCheck::Accepted)
    }
}

/// Facade over the scoring functions, wired to a read-only controller.
/// Every method takes an immutable snapshot of the data and computes a
/// fresh value; nothing here mutates or caches.
pub struct Engine<'a, C>
where
    C: Controller,
{
    controller: &'a C,
    config: Config,
}

impl<'a, C> Engine<'a, C>
where
    C: Controller,
{
    pub fn with_controller(controller: &'a C) -> Self {
        Self {
            controller,
            config: Config::default(),
        }
    }

    pub fn with_config(controller: &'a C, config: Config) -> Self {
        Self { controller, config }
    }

    fn review(&self, review_id: &str) -> Result<Review, Error> {
        self.controller
            .reviews_by(&SearchBy::id(review_id))?
            .into_iter()
            .next()
            .ok_or_else(|| ErrorKind::NotFoundById(review_id.into()).into())
    }

    /// Recompute a review's helpfulness from its current vote counters.
    pub fn review_helpfulness(
        &self,
        review_id: &str,
        cancel: &CancelToken,
    ) -> Result<f64, Error> {
        cancel.err_if_cancelled()?;
        let review = self.review(review_id)?;

        Ok(helpfulness::score(
            review.upvotes,
            review.downvotes,
            review.is_document_verified,
        ))
    }

    /// Full quality report for a review.
    pub fn review_quality(
        &self,
        review_id: &str,
        cancel: &CancelToken,
    ) -> Result<QualityReport, Error> {
        cancel.err_if_cancelled()?;
        let review = self.review(review_id)?;
        Ok(quality::quality(&review))
    }

    /// Weighted rating snapshot over a company's active reviews.
    pub fn company_rating(
        &self,
        company_id: &str,
        cancel: &CancelToken,
    ) -> Result<CompanyRatingSnapshot, Error> {
        cancel.err_if_cancelled()?;
        let reviews = self.controller.active_reviews_of(company_id)?;
        log::debug!(
            "aggregating {} active reviews for company({})",
            reviews.len(),
            company_id
        );

        Ok(aggregate::aggregate(
            &reviews,
            Utc::now(),
            &self.config.aggregation,
        ))
    }

    /// Gate a new review text before it is persisted: basic length
    /// bounds plus a near-duplicate scan over the author's recent
    /// reviews.
    pub fn check_submission(
        &self,
        user_id: &str,
        text: &str,
        now: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<SubmissionCheck, Error> {
        cancel.err_if_cancelled()?;

        let length = text.chars().count();
        if length < MIN_REVIEW_CHARS {
            return Ok(SubmissionCheck::TooShort);
        }
        if length > MAX_REVIEW_CHARS {
            return Ok(SubmissionCheck::TooLong);
        }

        let window = Duration::days(self.config.similarity.resubmission_window_days);
        let priors = self.controller.reviews_of_user_since(user_id, now - window)?;

        let threshold = self.config.similarity.near_duplicate_threshold;
        for prior in &priors {
            let similarity = text::similarity(text, &prior.text);
            if similarity >= threshold {
                log::debug!(
                    "submission by user({}) is {:.0}% similar to review({})",
                    user_id,
                    similarity * 100.0,
                    prior.id
                );
                return Ok(SubmissionCheck::NearDuplicate {
                    review_id: prior.id.clone(),
                    similarity,
                });
            }
        }

        Ok(SubmissionCheck::Accepted)
    }

    /// The k reviews of the same company most similar to the given one,
    /// at or above the configured relatedness threshold.
    pub fn similar_reviews(
        &self,
        review_id: &str,
        k: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<ScoredReview>, Error> {
        cancel.err_if_cancelled()?;
        let review = self.review(review_id)?;
        let candidates = self.controller.active_reviews_of(&review.company_id)?;

        Ok(text::rank_similar(
            &review,
            &candidates,
            k,
            self.config.similarity.related_threshold,
        ))
    }

    /// Whether the recent vote pattern on a review looks manipulated.
    /// Advisory, recomputed from the ledger on every call.
    pub fn vote_suspicion(
        &self,
        review_id: &str,
        now: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<bool, Error> {
        cancel.err_if_cancelled()?;

        let window = Duration::minutes(self.config.manipulation.burst_window_minutes);
        let votes = self.controller.votes_for_since(review_id, now - window)?;

        let voters: Vec<String> = votes
            .iter()
            .map(|vote| vote.user_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let ages = self.controller.account_ages(&voters, now)?;

        Ok(manipulation::is_suspicious(
            &votes,
            &ages,
            now,
            &self.config.manipulation,
        ))
    }

    /// Time-bucketed trend report over a company's reviews in
    /// [start, end]. Scans in chunks and honors cancellation between
    /// them, long ranges are the one place a caller may want out.
    pub fn company_trends(
        &self,
        company_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<TrendReport, Error> {
        let mut scan = TrendScan::default();

        let chunks = self
            .controller
            .reviews_by_chunks(company_id, start, end, TREND_CHUNK_SIZE);
        for chunk in chunks {
            cancel.err_if_cancelled()?;
            scan.update(&chunk);
        }

        Ok(scan.finish())
    }
}
