use crate::MemoryController;
use anyhow::{anyhow, Error};
use chrono::{DateTime, Utc};
use controller::{Company, Result, Review, UserAccount};
use csv::StringRecord;
use std::path::Path;

/// Load a fixture dataset from a directory holding `companies.csv`,
/// `users.csv`, `reviews.csv` and `votes.csv` (all with a header row).
///
/// Votes replay through the ledger, so the loaded reviews come out with
/// counters that already satisfy the one-vote-per-user invariant; the
/// helpfulness scores start at zero until the caller recomputes them.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<MemoryController> {
    let dir = dir.as_ref();
    let controller = MemoryController::new();

    load_companies(&controller, &dir.join("companies.csv"))?;
    load_users(&controller, &dir.join("users.csv"))?;
    load_reviews(&controller, &dir.join("reviews.csv"))?;
    load_votes(&controller, &dir.join("votes.csv"))?;

    Ok(controller)
}

fn load_companies(controller: &MemoryController, path: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)?;
    for record in reader.records() {
        let record = record?;

        controller.push_company(Company {
            id: field(&record, 0, path)?.to_owned(),
            name: field(&record, 1, path)?.to_owned(),
        })?;
    }

    Ok(())
}

fn load_users(controller: &MemoryController, path: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)?;
    for record in reader.records() {
        let record = record?;

        controller.push_user(UserAccount {
            id: field(&record, 0, path)?.to_owned(),
            name: field(&record, 1, path)?.to_owned(),
            created_at: timestamp(field(&record, 2, path)?)?,
        })?;
    }

    Ok(())
}

fn load_reviews(controller: &MemoryController, path: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)?;
    for record in reader.records() {
        let record = record?;

        controller.push_review(Review {
            id: field(&record, 0, path)?.to_owned(),
            company_id: field(&record, 1, path)?.to_owned(),
            user_id: field(&record, 2, path)?.to_owned(),
            category: field(&record, 3, path)?.parse()?,
            overall_rating: field(&record, 4, path)?.parse()?,
            is_document_verified: field(&record, 5, path)?.parse()?,
            is_active: field(&record, 6, path)?.parse()?,
            created_at: timestamp(field(&record, 7, path)?)?,
            text: field(&record, 8, path)?.to_owned(),
            upvotes: 0,
            downvotes: 0,
            helpfulness_score: 0.0,
        })?;
    }

    Ok(())
}

fn load_votes(controller: &MemoryController, path: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)?;
    for record in reader.records() {
        let record = record?;

        controller.cast_vote_at(
            field(&record, 0, path)?,
            field(&record, 1, path)?,
            field(&record, 2, path)?.parse()?,
            timestamp(field(&record, 3, path)?)?,
        )?;
    }

    Ok(())
}

fn field<'r>(record: &'r StringRecord, index: usize, path: &Path) -> Result<&'r str> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| anyhow!("missing column {} in {}", index, path.display()))
}

fn timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, Error> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
