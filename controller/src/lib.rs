// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod entity;
pub mod error;
pub mod lazy;
pub mod review;
pub mod searchby;

use anyhow::Error;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

pub use entity::{Entity, ToTable};
pub use lazy::LazyReviewChunks;
pub use review::{Category, Company, CompanyRatingSnapshot, Review, UserAccount, Vote};
pub use searchby::SearchBy;

pub type Result<T> = std::result::Result<T, Error>;

/// Account ages keyed by user id, relative to some reference instant.
pub type AccountAges<Id = String> = HashMap<Id, Duration>;

pub trait Controller {
    /// Get all companies
    fn companies(&self) -> Result<Vec<Company>>;

    /// Get companies that matched the search criteria by id, name or custom (if implemented)
    fn companies_by(&self, by: &SearchBy) -> Result<Vec<Company>>;

    /// Get user accounts that matched the search criteria by id, name or custom (if implemented)
    fn users_by(&self, by: &SearchBy) -> Result<Vec<UserAccount>>;

    /// Get reviews that matched the search criteria by id or custom (if implemented)
    fn reviews_by(&self, by: &SearchBy) -> Result<Vec<Review>>;

    /// Get the active reviews of a company, the only ones aggregates may see
    fn active_reviews_of(&self, company_id: &str) -> Result<Vec<Review>>;

    /// Get the reviews a user wrote since the given instant (active or not)
    fn reviews_of_user_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<Vec<Review>>;

    /// Get a chunk of a company's active reviews created in [start, end],
    /// ordered by creation time, specified by certain offset and limit
    fn reviews_offset_limit(
        &self,
        company_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Review>>;

    /// Build an iterator that returns a company's active reviews by chunks
    fn reviews_by_chunks<'a>(
        &'a self,
        company_id: &'a str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        chunk_size: usize,
    ) -> LazyReviewChunks<'a>
    where
        Self: Sized,
    {
        LazyReviewChunks {
            curr_offset: 0,
            chunk_size,
            company_id,
            start,
            end,
            controller: self,
        }
    }

    /// Get every vote currently recorded for a review
    fn votes_for(&self, review_id: &str) -> Result<Vec<Vote>>;

    /// Get the votes cast on a review since the given instant
    fn votes_for_since(&self, review_id: &str, since: DateTime<Utc>) -> Result<Vec<Vote>>;

    /// Get the account age of each given user, measured back from `now`
    fn account_ages(&self, user_ids: &[String], now: DateTime<Utc>) -> Result<AccountAges>;

    /// Record a vote by a user on a review. At most one vote per
    /// (user, review) may exist: casting again replaces the previous
    /// record (upsert, not append). Self-votes are rejected.
    fn cast_vote(&self, user_id: &str, review_id: &str, is_upvote: bool) -> Result<Vote>;

    /// Remove a user's vote on a review, returning the removed record
    fn retract_vote(&self, user_id: &str, review_id: &str) -> Result<Vote>;

    /// Store a freshly recomputed helpfulness score for a review. The
    /// stored value is derived state, callers must never hand-set it from
    /// anything but the scorer's output.
    fn update_helpfulness(&self, review_id: &str, score: f64) -> Result<()>;

    /// Activate or deactivate a review (moderation). Deactivated reviews
    /// are excluded from every aggregate but never hard-deleted.
    fn set_review_active(&self, review_id: &str, active: bool) -> Result<()>;
}
