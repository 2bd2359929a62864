pub mod fixtures;

use chrono::{DateTime, Duration, Utc};
use controller::error::ErrorKind;
use controller::{
    AccountAges, Company, Controller, Entity, Result, Review, SearchBy, UserAccount, Vote,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type VoteSlot = Arc<Mutex<HashMap<String, Vote>>>;

// A poisoned lock only means another thread panicked mid-write; the data
// here is plain values, so recover the guard and move on
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory data source: companies, user accounts, reviews and the vote
/// ledger. The ledger keeps one `Mutex` per review so vote upserts are
/// single-writer per (user, review) pair; everything else sits behind
/// plain `RwLock`s.
///
/// Review vote counters and helpfulness are derived state: `push_review`
/// zeroes them, the ledger maintains the counters, and the orchestration
/// layer writes helpfulness back through `update_helpfulness`.
#[derive(Default)]
pub struct MemoryController {
    companies: RwLock<Vec<Company>>,
    users: RwLock<Vec<UserAccount>>,
    reviews: RwLock<Vec<Review>>,
    ledger: RwLock<HashMap<String, VoteSlot>>,
}

impl MemoryController {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push_company(&self, company: Company) -> Result<()> {
        let mut companies = write(&self.companies);
        if companies.iter().any(|c| c.id == company.id) {
            return Err(ErrorKind::DuplicateEntity(company.id).into());
        }

        companies.push(company);
        Ok(())
    }

    pub fn push_user(&self, user: UserAccount) -> Result<()> {
        let mut users = write(&self.users);
        if users.iter().any(|u| u.id == user.id) {
            return Err(ErrorKind::DuplicateEntity(user.id).into());
        }

        users.push(user);
        Ok(())
    }

    pub fn push_review(&self, mut review: Review) -> Result<()> {
        if !(0.0..=5.0).contains(&review.overall_rating) {
            return Err(ErrorKind::RatingOutOfRange(review.overall_rating).into());
        }

        if !read(&self.companies).iter().any(|c| c.id == review.company_id) {
            return Err(ErrorKind::NotFoundById(review.company_id).into());
        }
        if !read(&self.users).iter().any(|u| u.id == review.user_id) {
            return Err(ErrorKind::NotFoundById(review.user_id).into());
        }

        let mut reviews = write(&self.reviews);
        if reviews.iter().any(|r| r.id == review.id) {
            return Err(ErrorKind::DuplicateEntity(review.id).into());
        }

        review.upvotes = 0;
        review.downvotes = 0;
        review.helpfulness_score = 0.0;
        reviews.push(review);

        Ok(())
    }

    pub fn review_ids(&self) -> Vec<String> {
        read(&self.reviews).iter().map(Entity::get_id).collect()
    }

    /// Record a vote with an explicit timestamp, the fixture loader and
    /// tests need deterministic clocks.
    pub fn cast_vote_at(
        &self,
        user_id: &str,
        review_id: &str,
        is_upvote: bool,
        cast_at: DateTime<Utc>,
    ) -> Result<Vote> {
        if !read(&self.users).iter().any(|u| u.id == user_id) {
            return Err(ErrorKind::NotFoundById(user_id.into()).into());
        }

        {
            let reviews = read(&self.reviews);
            let review = reviews
                .iter()
                .find(|r| r.id == review_id)
                .ok_or_else(|| ErrorKind::NotFoundById(review_id.into()))?;

            if review.user_id == user_id {
                return Err(ErrorKind::SelfVote.into());
            }
        }

        let slot = {
            let mut ledger = write(&self.ledger);
            Arc::clone(ledger.entry(review_id.to_owned()).or_default())
        };

        let vote = Vote {
            user_id: user_id.into(),
            review_id: review_id.into(),
            is_upvote,
            cast_at,
        };

        // Upsert under the review's own mutex: a flip replaces the
        // record, it never appends a second one for the same user
        let mut votes = lock(&slot);
        votes.insert(user_id.to_owned(), vote.clone());
        self.refresh_counters(review_id, &votes)?;

        Ok(vote)
    }

    // Keeps `upvotes + downvotes` equal to the ledger count for the
    // review; called with its vote slot still locked
    fn refresh_counters(&self, review_id: &str, votes: &HashMap<String, Vote>) -> Result<()> {
        let upvotes = votes.values().filter(|vote| vote.is_upvote).count() as u32;
        let downvotes = votes.len() as u32 - upvotes;

        let mut reviews = write(&self.reviews);
        let review = reviews
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| ErrorKind::NotFoundById(review_id.into()))?;

        review.upvotes = upvotes;
        review.downvotes = downvotes;

        Ok(())
    }
}

impl Controller for MemoryController {
    fn companies(&self) -> Result<Vec<Company>> {
        Ok(read(&self.companies).clone())
    }

    fn companies_by(&self, by: &SearchBy) -> Result<Vec<Company>> {
        let companies: Vec<Company> = read(&self.companies)
            .iter()
            .filter(|c| by.matches(&c.id, &c.name))
            .cloned()
            .collect();

        if companies.is_empty() {
            Err(not_found(by))
        } else {
            Ok(companies)
        }
    }

    fn users_by(&self, by: &SearchBy) -> Result<Vec<UserAccount>> {
        let users: Vec<UserAccount> = read(&self.users)
            .iter()
            .filter(|u| by.matches(&u.id, &u.name))
            .cloned()
            .collect();

        if users.is_empty() {
            Err(not_found(by))
        } else {
            Ok(users)
        }
    }

    fn reviews_by(&self, by: &SearchBy) -> Result<Vec<Review>> {
        let reviews = read(&self.reviews);

        // Reviews have no name; `company` and `author` are the custom
        // criteria moderation tooling asks for
        let matched: Vec<Review> = match by {
            SearchBy::Custom(key, val) if key == "company" => reviews
                .iter()
                .filter(|r| &r.company_id == val)
                .cloned()
                .collect(),

            SearchBy::Custom(key, val) if key == "author" => reviews
                .iter()
                .filter(|r| &r.user_id == val)
                .cloned()
                .collect(),

            by => reviews
                .iter()
                .filter(|r| by.matches(&r.id, ""))
                .cloned()
                .collect(),
        };

        if matched.is_empty() {
            Err(not_found(by))
        } else {
            Ok(matched)
        }
    }

    fn active_reviews_of(&self, company_id: &str) -> Result<Vec<Review>> {
        // An unknown company simply has no reviews: a valid zero state
        Ok(read(&self.reviews)
            .iter()
            .filter(|r| r.company_id == company_id && r.is_active)
            .cloned()
            .collect())
    }

    fn reviews_of_user_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<Vec<Review>> {
        Ok(read(&self.reviews)
            .iter()
            .filter(|r| r.user_id == user_id && r.created_at >= since)
            .cloned()
            .collect())
    }

    fn reviews_offset_limit(
        &self,
        company_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Review>> {
        let mut in_range: Vec<Review> = read(&self.reviews)
            .iter()
            .filter(|r| {
                r.company_id == company_id
                    && r.is_active
                    && r.created_at >= start
                    && r.created_at <= end
            })
            .cloned()
            .collect();

        in_range.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(in_range.into_iter().skip(offset).take(limit).collect())
    }

    fn votes_for(&self, review_id: &str) -> Result<Vec<Vote>> {
        if !read(&self.reviews).iter().any(|r| r.id == review_id) {
            return Err(ErrorKind::NotFoundById(review_id.into()).into());
        }

        let ledger = read(&self.ledger);
        let votes = match ledger.get(review_id) {
            Some(slot) => lock(slot).values().cloned().collect(),
            None => Vec::new(),
        };

        Ok(votes)
    }

    fn votes_for_since(&self, review_id: &str, since: DateTime<Utc>) -> Result<Vec<Vote>> {
        let votes = self
            .votes_for(review_id)?
            .into_iter()
            .filter(|vote| vote.cast_at >= since)
            .collect();

        Ok(votes)
    }

    fn account_ages(&self, user_ids: &[String], now: DateTime<Utc>) -> Result<AccountAges> {
        let users = read(&self.users);

        let mut ages = AccountAges::new();
        for user_id in user_ids {
            match users.iter().find(|u| &u.id == user_id) {
                Some(user) => {
                    let age = (now - user.created_at).max(Duration::zero());
                    ages.insert(user_id.clone(), age);
                }
                None => log::warn!("no account found for voter({})", user_id),
            }
        }

        Ok(ages)
    }

    fn cast_vote(&self, user_id: &str, review_id: &str, is_upvote: bool) -> Result<Vote> {
        self.cast_vote_at(user_id, review_id, is_upvote, Utc::now())
    }

    fn retract_vote(&self, user_id: &str, review_id: &str) -> Result<Vote> {
        let slot = {
            let ledger = read(&self.ledger);
            ledger.get(review_id).map(Arc::clone)
        };

        let slot = slot
            .ok_or_else(|| ErrorKind::VoteNotFound(user_id.into(), review_id.into()))?;

        let mut votes = lock(&slot);
        let removed = votes
            .remove(user_id)
            .ok_or_else(|| ErrorKind::VoteNotFound(user_id.into(), review_id.into()))?;
        self.refresh_counters(review_id, &votes)?;

        Ok(removed)
    }

    fn update_helpfulness(&self, review_id: &str, score: f64) -> Result<()> {
        let mut reviews = write(&self.reviews);
        let review = reviews
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| ErrorKind::NotFoundById(review_id.into()))?;

        review.helpfulness_score = score;
        Ok(())
    }

    fn set_review_active(&self, review_id: &str, active: bool) -> Result<()> {
        let mut reviews = write(&self.reviews);
        let review = reviews
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| ErrorKind::NotFoundById(review_id.into()))?;

        review.is_active = active;
        Ok(())
    }
}

fn not_found(by: &SearchBy) -> anyhow::Error {
    match by {
        SearchBy::Id(id) => ErrorKind::NotFoundById(id.clone()).into(),
        SearchBy::Name(name) => ErrorKind::NotFoundByName(name.clone()).into(),
        SearchBy::Custom(key, val) => ErrorKind::NotFoundByCustom(key.clone(), val.clone()).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use controller::Category;

    fn instant(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    fn controller() -> MemoryController {
        let controller = MemoryController::new();

        controller
            .push_company(Company {
                id: "acme".into(),
                name: "Acme".into(),
            })
            .unwrap();

        for (id, name) in &[("u1", "Ana"), ("u2", "Bruno"), ("u3", "Carla")] {
            controller
                .push_user(UserAccount {
                    id: (*id).into(),
                    name: (*name).into(),
                    created_at: instant(1, 0),
                })
                .unwrap();
        }

        controller
            .push_review(Review {
                id: "r1".into(),
                company_id: "acme".into(),
                user_id: "u1".into(),
                category: Category::Salary,
                overall_rating: 4.0,
                text: "A fixture review body comfortably over fifty characters long".into(),
                is_document_verified: false,
                upvotes: 0,
                downvotes: 0,
                helpfulness_score: 0.0,
                is_active: true,
                created_at: instant(2, 9),
            })
            .unwrap();

        controller
    }

    #[test]
    fn vote_upsert_keeps_one_record_per_user() -> Result<()> {
        let controller = controller();

        controller.cast_vote_at("u2", "r1", true, instant(3, 10))?;
        controller.cast_vote_at("u2", "r1", false, instant(3, 11))?;
        controller.cast_vote_at("u3", "r1", true, instant(3, 12))?;

        let votes = controller.votes_for("r1")?;
        assert_eq!(2, votes.len());

        let review = controller.reviews_by(&SearchBy::id("r1"))?.remove(0);
        assert_eq!(1, review.upvotes);
        assert_eq!(1, review.downvotes);
        assert_eq!(review.total_votes() as usize, votes.len());

        Ok(())
    }

    #[test]
    fn self_votes_are_rejected() {
        let controller = controller();
        let result = controller.cast_vote_at("u1", "r1", true, instant(3, 10));
        assert!(result.is_err());
        assert!(controller.votes_for("r1").unwrap().is_empty());
    }

    #[test]
    fn retraction_removes_the_record_and_counter() -> Result<()> {
        let controller = controller();

        controller.cast_vote_at("u2", "r1", true, instant(3, 10))?;
        let removed = controller.retract_vote("u2", "r1")?;
        assert!(removed.is_upvote);

        assert!(controller.votes_for("r1")?.is_empty());
        let review = controller.reviews_by(&SearchBy::id("r1"))?.remove(0);
        assert_eq!(0, review.total_votes());

        // Retracting twice fails
        assert!(controller.retract_vote("u2", "r1").is_err());

        Ok(())
    }

    #[test]
    fn push_review_zeroes_derived_state() -> Result<()> {
        let controller = controller();

        controller.push_review(Review {
            id: "r2".into(),
            company_id: "acme".into(),
            user_id: "u2".into(),
            category: Category::Culture,
            overall_rating: 3.0,
            text: "Another fixture review body comfortably over fifty characters".into(),
            is_document_verified: true,
            upvotes: 9,
            downvotes: 9,
            helpfulness_score: 50.0,
            is_active: true,
            created_at: instant(4, 9),
        })?;

        let review = controller.reviews_by(&SearchBy::id("r2"))?.remove(0);
        assert_eq!(0, review.total_votes());
        assert_eq!(0.0, review.helpfulness_score);

        Ok(())
    }

    #[test]
    fn duplicate_and_out_of_range_reviews_are_rejected() {
        let controller = controller();

        let mut dup = controller.reviews_by(&SearchBy::id("r1")).unwrap().remove(0);
        assert!(controller.push_review(dup.clone()).is_err());

        dup.id = "r9".into();
        dup.overall_rating = 5.5;
        assert!(controller.push_review(dup).is_err());
    }

    #[test]
    fn offset_limit_orders_by_creation() -> Result<()> {
        let controller = controller();

        for (id, day) in &[("r2", 5), ("r3", 3), ("r4", 4)] {
            controller.push_review(Review {
                id: (*id).into(),
                company_id: "acme".into(),
                user_id: "u2".into(),
                category: Category::Benefits,
                overall_rating: 3.0,
                text: "Another fixture review body comfortably over fifty characters".into(),
                is_document_verified: false,
                upvotes: 0,
                downvotes: 0,
                helpfulness_score: 0.0,
                is_active: true,
                created_at: instant(*day, 9),
            })?;
        }

        let page = controller.reviews_offset_limit(
            "acme",
            instant(1, 0),
            instant(30, 0),
            1,
            2,
        )?;

        let ids: Vec<&str> = page.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(vec!["r3", "r4"], ids);

        Ok(())
    }

    #[test]
    fn chunked_iteration_covers_everything_once() -> Result<()> {
        let controller = controller();

        for i in 2..9 {
            controller.push_review(Review {
                id: format!("r{}", i),
                company_id: "acme".into(),
                user_id: "u2".into(),
                category: Category::Benefits,
                overall_rating: 3.0,
                text: "Another fixture review body comfortably over fifty characters".into(),
                is_document_verified: false,
                upvotes: 0,
                downvotes: 0,
                helpfulness_score: 0.0,
                is_active: true,
                created_at: instant(i as u32, 9),
            })?;
        }

        let mut seen = Vec::new();
        for chunk in controller.reviews_by_chunks("acme", instant(1, 0), instant(30, 0), 3) {
            seen.extend(chunk.into_iter().map(|r| r.id));
        }

        assert_eq!(8, seen.len());
        seen.sort();
        seen.dedup();
        assert_eq!(8, seen.len());

        Ok(())
    }

    #[test]
    fn account_ages_measured_back_from_now() -> Result<()> {
        let controller = controller();

        let ages = controller.account_ages(
            &["u1".into(), "ghost".into()],
            instant(8, 0),
        )?;

        assert_eq!(1, ages.len());
        assert_eq!(Duration::days(7), ages["u1"]);

        Ok(())
    }
}
