use chrono::{DateTime, Duration, Utc};
use config::ManipulationConfig;
use controller::{AccountAges, Vote};
use std::collections::HashSet;

/// Heuristic gate over a review's recent votes. Any heuristic firing
/// makes the pattern suspicious:
///
/// - more than `burst_votes` votes landed inside the trailing window, or
/// - of the distinct voters inside the window, more than
///   `new_account_ratio` have accounts younger than `new_account_age_days`.
///
/// Advisory only: callers decide whether suspicious means freezing the
/// counters, opening a report or just logging. Re-evaluate after every
/// vote mutation, the result must never be cached.
pub fn is_suspicious(
    votes: &[Vote],
    account_ages: &AccountAges,
    now: DateTime<Utc>,
    config: &ManipulationConfig,
) -> bool {
    let window_start = now - Duration::minutes(config.burst_window_minutes);
    let recent: Vec<&Vote> = votes
        .iter()
        .filter(|vote| vote.cast_at >= window_start && vote.cast_at <= now)
        .collect();

    if recent.len() > config.burst_votes {
        return true;
    }

    let voters: HashSet<&str> = recent.iter().map(|vote| vote.user_id.as_str()).collect();
    if voters.is_empty() {
        return false;
    }

    let age_limit = Duration::days(config.new_account_age_days);
    let fresh_voters = voters
        .iter()
        .filter(|user_id| {
            account_ages
                .get(**user_id)
                .map_or(false, |age| *age < age_limit)
        })
        .count();

    fresh_voters as f64 / voters.len() as f64 > config.new_account_ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn vote(user_id: &str, cast_at: DateTime<Utc>) -> Vote {
        Vote {
            user_id: user_id.into(),
            review_id: "r1".into(),
            is_upvote: true,
            cast_at,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn calm_review_is_not_suspicious() {
        let config = ManipulationConfig::default();
        let votes: Vec<Vote> = (0..5)
            .map(|i| vote(&format!("u{}", i), now() - Duration::minutes(i * 10)))
            .collect();
        let ages: AccountAges = votes
            .iter()
            .map(|v| (v.user_id.clone(), Duration::days(400)))
            .collect();

        assert!(!is_suspicious(&votes, &ages, now(), &config));
    }

    #[test]
    fn vote_burst_fires() {
        let config = ManipulationConfig::default();
        // 25 votes within 10 minutes from old accounts
        let votes: Vec<Vote> = (0..25)
            .map(|i| vote(&format!("u{}", i), now() - Duration::minutes(i % 10)))
            .collect();
        let ages: AccountAges = votes
            .iter()
            .map(|v| (v.user_id.clone(), Duration::days(400)))
            .collect();

        assert!(is_suspicious(&votes, &ages, now(), &config));
    }

    #[test]
    fn fresh_account_swarm_fires() {
        let config = ManipulationConfig::default();
        // Only 10 votes (below the burst limit), but 9 of the 10 voters
        // registered yesterday
        let votes: Vec<Vote> = (0..10)
            .map(|i| vote(&format!("u{}", i), now() - Duration::minutes(i)))
            .collect();
        let ages: AccountAges = votes
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let age = if i == 0 {
                    Duration::days(300)
                } else {
                    Duration::days(1)
                };
                (v.user_id.clone(), age)
            })
            .collect();

        assert!(is_suspicious(&votes, &ages, now(), &config));
    }

    #[test]
    fn spec_example_burst_of_fresh_accounts() {
        let config = ManipulationConfig::default();
        // 25 votes on one review within 10 minutes, 22 of them from
        // accounts created within the last 2 days
        let votes: Vec<Vote> = (0..25)
            .map(|i| vote(&format!("u{}", i), now() - Duration::minutes(i % 10)))
            .collect();
        let ages: AccountAges = votes
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let age = if i < 22 {
                    Duration::days(2) - Duration::hours(1)
                } else {
                    Duration::days(90)
                };
                (v.user_id.clone(), age)
            })
            .collect();

        assert!(is_suspicious(&votes, &ages, now(), &config));
    }

    #[test]
    fn votes_outside_the_window_are_ignored() {
        let config = ManipulationConfig::default();
        // A pile of ancient votes and a couple of recent ones
        let mut votes: Vec<Vote> = (0..40)
            .map(|i| vote(&format!("old{}", i), now() - Duration::hours(5)))
            .collect();
        votes.push(vote("recent1", now() - Duration::minutes(1)));
        votes.push(vote("recent2", now() - Duration::minutes(2)));

        let ages: AccountAges = votes
            .iter()
            .map(|v| (v.user_id.clone(), Duration::days(100)))
            .collect();

        assert!(!is_suspicious(&votes, &ages, now(), &config));
    }

    #[test]
    fn unknown_voters_count_as_old_accounts() {
        use common_macros::hash_map;

        let config = ManipulationConfig::default();
        let votes: Vec<Vote> = (0..6)
            .map(|i| vote(&format!("u{}", i), now() - Duration::minutes(i)))
            .collect();

        // Only one voter has a known, fresh account; the rest resolve to
        // no age at all and must not count toward the fresh ratio
        let ages = hash_map! { "u0".to_owned() => Duration::days(1) };

        assert!(!is_suspicious(&votes, &ages, now(), &config));
    }

    #[test]
    fn no_votes_is_never_suspicious() {
        let config = ManipulationConfig::default();
        assert!(!is_suspicious(&[], &AccountAges::new(), now(), &config));
    }

    #[test]
    fn ratio_boundary_is_exclusive() {
        let config = ManipulationConfig::default();
        // Exactly 80% fresh voters doesn't fire, the heuristic wants more
        let votes: Vec<Vote> = (0..10)
            .map(|i| vote(&format!("u{}", i), now() - Duration::minutes(i)))
            .collect();
        let ages: AccountAges = votes
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let age = if i < 8 {
                    Duration::days(1)
                } else {
                    Duration::days(365)
                };
                (v.user_id.clone(), age)
            })
            .collect();

        assert!(!is_suspicious(&votes, &ages, now(), &config));
    }
}
