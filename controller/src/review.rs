// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::entity::Entity;
use crate::error::ErrorKind;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Category {
    Salary,
    WorkEnvironment,
    Management,
    CareerGrowth,
    Benefits,
    Culture,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::WorkEnvironment => "work-environment",
            Category::Management => "management",
            Category::CareerGrowth => "career-growth",
            Category::Benefits => "benefits",
            Category::Culture => "culture",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s {
            "salary" => Category::Salary,
            "work-environment" => Category::WorkEnvironment,
            "management" => Category::Management,
            "career-growth" => Category::CareerGrowth,
            "benefits" => Category::Benefits,
            "culture" => Category::Culture,
            other => return Err(ErrorKind::InvalidCategory(other.to_owned())),
        };

        Ok(category)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: String,
    pub name: String,
}

impl Entity for Company {
    type Id = String;

    fn get_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn get_data(&self) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert("name".into(), self.name.clone());
        data
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for UserAccount {
    type Id = String;

    fn get_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn get_data(&self) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert("name".into(), self.name.clone());
        data.insert("created_at".into(), self.created_at.to_rfc3339());
        data
    }
}

/// Immutable snapshot of a review, as the scoring engine consumes it. The
/// vote counters and `helpfulness_score` are derived state maintained by
/// the ledger and the recompute flow, never set by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: String,
    pub company_id: String,
    pub user_id: String,
    pub category: Category,
    pub overall_rating: f64,
    pub text: String,
    pub is_document_verified: bool,
    pub upvotes: u32,
    pub downvotes: u32,
    pub helpfulness_score: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn total_votes(&self) -> u32 {
        self.upvotes + self.downvotes
    }
}

impl Entity for Review {
    type Id = String;

    fn get_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn get_data(&self) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert("company".into(), self.company_id.clone());
        data.insert("author".into(), self.user_id.clone());
        data.insert("category".into(), self.category.to_string());
        data.insert("rating".into(), format!("{:.1}", self.overall_rating));
        data.insert("verified".into(), self.is_document_verified.to_string());
        data.insert(
            "votes".into(),
            format!("+{} / -{}", self.upvotes, self.downvotes),
        );
        data.insert("helpfulness".into(), format!("{:.2}", self.helpfulness_score));
        data.insert("active".into(), self.is_active.to_string());
        data.insert("created_at".into(), self.created_at.to_rfc3339());
        data
    }
}

/// A single vote by a user on a review. The (user, review) pair is the
/// key: re-casting replaces the whole record.
#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    pub user_id: String,
    pub review_id: String,
    pub is_upvote: bool,
    pub cast_at: DateTime<Utc>,
}

/// Aggregated company rating produced by the aggregator, a plain value
/// detached from any entity lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRatingSnapshot {
    pub average_rating: f64,
    pub total_review_count: usize,
    pub category_averages: HashMap<Category, f64>,
    pub computed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        let all = [
            Category::Salary,
            Category::WorkEnvironment,
            Category::Management,
            Category::CareerGrowth,
            Category::Benefits,
            Category::Culture,
        ];

        for category in &all {
            assert_eq!(Ok(*category), category.as_str().parse());
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let parsed: Result<Category, _> = "free-snacks".parse();
        assert!(parsed.is_err());
    }
}
