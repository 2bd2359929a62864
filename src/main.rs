pub mod parser;

use anyhow::Error;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{App, Arg};
use controller::{Controller, SearchBy, ToTable};
use engine::cancel::CancelToken;
use engine::{helpfulness, Engine, SubmissionCheck};
use memory::MemoryController;
use parser::Statement;
use simplelog::{Config as LogConfig, LevelFilter, TermLogger, TerminalMode};

macro_rules! prompt {
    ($ed:ident) => {{
        use rustyline::error::ReadlineError;

        match $ed.readline(PROMPT) {
            Ok(line) => {
                $ed.add_history_entry(line.as_str());
                Ok(line)
            }

            Err(ReadlineError::Interrupted) => {
                continue;
            }

            Err(ReadlineError::Eof) => {
                println!("Exiting...Good bye!");
                break;
            }

            Err(e) => Err(e),
        }
    }};
}

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = ">> ";

fn print_help() {
    println!("Statements:");
    println!("query_company(id(acme) | name(Acme Analytics))");
    println!("query_user(id(u1) | name(Ana))");
    println!("query_review(id(r1))");
    println!("reviews(id(acme))                      List a company's reviews");
    println!("rating(id(acme))                       Weighted rating snapshot");
    println!("quality(id(r1))                        Quality report for a review");
    println!("helpfulness(12, 3, true)               Score raw vote counts");
    println!("similar(id(r1), 5)                     Most similar reviews");
    println!("suspicious(id(r1))                     Vote manipulation check");
    println!("check(id(u1), <new review text>)       Submission gate");
    println!("trends(id(acme), 2025-01-01, 2025-06-30)");
    println!("vote(id(u1), id(r1), up | down)        Cast or flip a vote");
    println!("unvote(id(u1), id(r1))                 Retract a vote");
    println!("deactivate(id(r1)) / reactivate(id(r1))");
}

fn day_bounds(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    // Midnight bounds always exist for a valid date
    let start = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap());
    let end = Utc.from_utc_datetime(&end.and_hms_opt(23, 59, 59).unwrap());
    (start, end)
}

/// Recompute every review's helpfulness from its ledger counters and
/// write the scores back; the stored values are never authoritative.
fn refresh_helpfulness(
    controller: &MemoryController,
    engine: &Engine<MemoryController>,
    cancel: &CancelToken,
) -> Result<(), Error> {
    for review_id in controller.review_ids() {
        let score = engine.review_helpfulness(&review_id, cancel)?;
        controller.update_helpfulness(&review_id, score)?;
    }

    Ok(())
}

/// The vote control flow: ledger mutation, then manipulation check, then
/// helpfulness recompute and write-back, then a fresh company snapshot.
fn after_vote_mutation(
    review_id: &str,
    controller: &MemoryController,
    engine: &Engine<MemoryController>,
    cancel: &CancelToken,
) -> Result<(), Error> {
    if engine.vote_suspicion(review_id, Utc::now(), cancel)? {
        log::warn!("suspicious vote pattern on review({})", review_id);
    }

    let score = engine.review_helpfulness(review_id, cancel)?;
    controller.update_helpfulness(review_id, score)?;
    println!("Helpfulness of id({}) is now {:.2}", review_id, score);

    let reviews = controller.reviews_by(&SearchBy::id(review_id))?;
    let review = &reviews[0];
    let snapshot = engine.company_rating(&review.company_id, cancel)?;
    println!(
        "Company id({}) averages {:.2} over {} active reviews",
        review.company_id, snapshot.average_rating, snapshot.total_review_count
    );

    Ok(())
}

fn run_statement(
    statement: Statement,
    controller: &MemoryController,
    engine: &Engine<MemoryController>,
    cancel: &CancelToken,
) -> Result<(), Error> {
    match statement {
        Statement::QueryCompany(by) => {
            for company in controller.companies_by(&by)? {
                println!("{}", company.to_table());
            }
        }

        Statement::QueryUser(by) => {
            for user in controller.users_by(&by)? {
                println!("{}", user.to_table());
            }
        }

        Statement::QueryReview(review_id) => {
            for review in controller.reviews_by(&SearchBy::id(&review_id))? {
                println!("{}", review.to_table());
                println!("{}", review.text);
            }
        }

        Statement::Reviews(by) => {
            for company in controller.companies_by(&by)? {
                let reviews = controller.reviews_by(&SearchBy::custom("company", &company.id))?;
                println!("Reviews of {}:", company.name);
                for review in reviews {
                    println!(
                        "id({})  {:16}  {:.1}  +{}/-{}  helpfulness {:.2}{}",
                        review.id,
                        review.category.to_string(),
                        review.overall_rating,
                        review.upvotes,
                        review.downvotes,
                        review.helpfulness_score,
                        if review.is_active { "" } else { "  [inactive]" },
                    );
                }
            }
        }

        Statement::Rating(by) => {
            for company in controller.companies_by(&by)? {
                let snapshot = engine.company_rating(&company.id, cancel)?;
                println!("{}", snapshot.to_table());
            }
        }

        Statement::Quality(review_id) => {
            let report = engine.review_quality(&review_id, cancel)?;
            println!("length      {:6.2}", report.length_score);
            println!("detail      {:6.2}", report.detail_score);
            println!("objectivity {:6.2}", report.objectivity_score);
            println!("helpfulness {:6.2}", report.helpfulness_score);
            println!("overall     {:6.2}", report.overall_score);
            for suggestion in &report.suggestions {
                println!("hint: {}", suggestion);
            }
        }

        Statement::Helpfulness(upvotes, downvotes, verified) => {
            println!(
                "Helpfulness is {:.2}",
                helpfulness::score(upvotes, downvotes, verified)
            );
        }

        Statement::Similar(review_id, k) => {
            let ranked = engine.similar_reviews(&review_id, k, cancel)?;
            if ranked.is_empty() {
                println!("No similar review found");
            }
            for scored in ranked {
                println!("Similarity with id({}) is {:.2}", scored.0, scored.score());
            }
        }

        Statement::Suspicious(review_id) => {
            if engine.vote_suspicion(&review_id, Utc::now(), cancel)? {
                println!("The recent vote pattern on id({}) looks manipulated", review_id);
            } else {
                println!("Nothing unusual on id({})", review_id);
            }
        }

        Statement::Check(user_id, text) => match engine
            .check_submission(&user_id, &text, Utc::now(), cancel)?
        {
            SubmissionCheck::Accepted => println!("Accepted"),
            SubmissionCheck::TooShort => println!("Rejected: the text is too short"),
            SubmissionCheck::TooLong => println!("Rejected: the text is too long"),
            SubmissionCheck::NearDuplicate { review_id, similarity } => println!(
                "Rejected: {:.0}% similar to the author's review id({})",
                similarity * 100.0,
                review_id
            ),
        },

        Statement::Trends(by, start, end) => {
            let (start, end) = day_bounds(start, end);
            for company in controller.companies_by(&by)? {
                let report = engine.company_trends(&company.id, start, end, cancel)?;

                println!("Trends for {}:", company.name);
                for (date, count) in &report.review_count_by_date {
                    println!("{}  {} review(s)", date, count);
                }
                println!("{}", report.category_averages.to_table());
                println!("positive keywords: {}", report.positive_keywords.join(", "));
                println!("negative keywords: {}", report.negative_keywords.join(", "));
                println!("sentiment trend: {:+.2}", report.sentiment_trend);
            }
        }

        Statement::Vote(user_id, review_id, is_upvote) => {
            controller.cast_vote(&user_id, &review_id, is_upvote)?;
            after_vote_mutation(&review_id, controller, engine, cancel)?;
        }

        Statement::Unvote(user_id, review_id) => {
            controller.retract_vote(&user_id, &review_id)?;
            after_vote_mutation(&review_id, controller, engine, cancel)?;
        }

        Statement::Deactivate(review_id) => {
            controller.set_review_active(&review_id, false)?;
            after_vote_mutation(&review_id, controller, engine, cancel)?;
        }

        Statement::Reactivate(review_id) => {
            controller.set_review_active(&review_id, true)?;
            after_vote_mutation(&review_id, controller, engine, cancel)?;
        }
    }

    Ok(())
}

fn main() -> Result<(), Error> {
    let matches = App::new("review-system")
        .version(VERSION)
        .about("Interactive console for the review credibility engine")
        .arg(
            Arg::with_name("data")
                .long("data")
                .takes_value(true)
                .default_value("data")
                .help("Directory with the csv fixture dataset"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .help("Thresholds file (toml), defaults apply if missing"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase log verbosity"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, LogConfig::default(), TerminalMode::Mixed)?;

    let config = match matches.value_of("config") {
        Some(path) => config::Config::load(path)?,
        None => config::Config::default(),
    };

    let data_dir = matches.value_of("data").unwrap_or("data");
    let controller = memory::fixtures::load_dir(data_dir)?;
    let engine = Engine::with_config(&controller, config);
    let cancel = CancelToken::new();

    refresh_helpfulness(&controller, &engine, &cancel)?;
    log::info!("loaded {} reviews from {}", controller.review_ids().len(), data_dir);

    println!("Welcome to review-system {}", VERSION);
    let mut rl = rustyline::Editor::<()>::new();

    loop {
        let line: String = prompt!(rl)?;

        match line.trim() {
            "?" | "h" | "help" => print_help(),

            "q" | "quit" => {
                println!("Bye!");
                break;
            }

            "v" | "version" => {
                println!("version: {}", VERSION);
            }

            empty if empty.is_empty() => {}

            line => match parser::parse_line(line) {
                Some(statement) => {
                    if let Err(e) = run_statement(statement, &controller, &engine, &cancel) {
                        println!("{}", e);
                    }
                }
                None => println!("Invalid syntax!"),
            },
        }
    }

    Ok(())
}
