// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::{Controller, Review};
use chrono::{DateTime, Utc};

/// Iterator over a company's active reviews in a date range, fetched in
/// chunks through `reviews_offset_limit`. Long trend scans pull chunks
/// one at a time so callers can stop between them.
pub struct LazyReviewChunks<'a> {
    pub(crate) curr_offset: usize,
    pub(crate) chunk_size: usize,
    pub(crate) company_id: &'a str,
    pub(crate) start: DateTime<Utc>,
    pub(crate) end: DateTime<Utc>,
    pub(crate) controller: &'a dyn Controller,
}

impl<'a> Iterator for LazyReviewChunks<'a> {
    type Item = Vec<Review>;

    fn next(&mut self) -> Option<Self::Item> {
        let reviews = self
            .controller
            .reviews_offset_limit(
                self.company_id,
                self.start,
                self.end,
                self.curr_offset,
                self.chunk_size,
            )
            .ok();

        self.curr_offset += self.chunk_size;
        match reviews {
            Some(reviews) => {
                if reviews.is_empty() {
                    None
                } else {
                    Some(reviews)
                }
            }
            None => None,
        }
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.curr_offset = n * self.chunk_size;
        self.next()
    }
}
