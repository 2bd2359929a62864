use chrono::NaiveDate;
use controller::SearchBy;
use nom::{alt, char, delimited, tag, take_while, take_while1, tuple, IResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    QueryCompany(SearchBy),
    QueryUser(SearchBy),
    QueryReview(String),
    Reviews(SearchBy),
    Rating(SearchBy),
    Quality(String),
    Helpfulness(u32, u32, bool),
    Similar(String, usize),
    Suspicious(String),
    Check(String, String),
    Trends(SearchBy, NaiveDate, NaiveDate),
    Vote(String, String, bool),
    Unvote(String, String),
    Deactivate(String),
    Reactivate(String),
}

#[inline(always)]
fn ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == ' '
}

fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1!(input, ident)
}

fn parse_number(input: &str) -> IResult<&str, &str> {
    take_while1!(input, |c: char| c.is_ascii_digit())
}

fn parse_free_text(input: &str) -> IResult<&str, &str> {
    take_while1!(input, |c: char| c != ')')
}

fn parse_separator(input: &str) -> IResult<&str, &str> {
    delimited!(
        input,
        take_while!(|c: char| c == ' '),
        tag!(","),
        take_while!(|c: char| c == ' ')
    )
}

fn parse_searchby(input: &str) -> IResult<&str, SearchBy> {
    let (input, index_type) = alt! {
        input,
        tag!("id") |
        tag!("name")
    }?;

    let (input, index) = delimited!(input, char!('('), parse_ident, char!(')'))?;

    let searchby = match index_type {
        "id" => SearchBy::id(index),
        "name" => SearchBy::name(index),
        _ => unreachable!(),
    };

    Ok((input, searchby))
}

// References to a concrete review or user are always written id(...)
fn parse_id_ref(input: &str) -> IResult<&str, String> {
    let (input, _) = tag!(input, "id")?;
    let (input, id) = delimited!(input, char!('('), parse_ident, char!(')'))?;

    Ok((input, id.into()))
}

fn parse_bool(input: &str) -> IResult<&str, bool> {
    let (input, raw) = alt! {
        input,
        tag!("true") |
        tag!("false")
    }?;

    Ok((input, raw == "true"))
}

fn parse_direction(input: &str) -> IResult<&str, bool> {
    let (input, raw) = alt! {
        input,
        tag!("up") |
        tag!("down")
    }?;

    Ok((input, raw == "up"))
}

fn parse_date(input: &str) -> IResult<&str, NaiveDate> {
    let (input, raw) = take_while1!(input, |c: char| c.is_ascii_digit() || c == '-')?;

    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Ok((input, date)),
        Err(_) => Err(nom::Err::Error((input, nom::error::ErrorKind::Verify))),
    }
}

fn parse_statement(input: &str) -> IResult<&str, Statement> {
    let (input, statement_type) = alt! {
        input,
        tag!("query_company") |
        tag!("query_user")    |
        tag!("query_review")  |
        tag!("reviews")       |
        tag!("rating")        |
        tag!("quality")       |
        tag!("helpfulness")   |
        tag!("similar")       |
        tag!("suspicious")    |
        tag!("check")         |
        tag!("trends")        |
        tag!("unvote")        |
        tag!("vote")          |
        tag!("deactivate")    |
        tag!("reactivate")
    }?;

    let (input, statement) = match statement_type {
        "query_company" => {
            let (input, searchby) = delimited!(input, char!('('), parse_searchby, char!(')'))?;
            (input, Statement::QueryCompany(searchby))
        }

        "query_user" => {
            let (input, searchby) = delimited!(input, char!('('), parse_searchby, char!(')'))?;
            (input, Statement::QueryUser(searchby))
        }

        "query_review" => {
            let (input, id) = delimited!(input, char!('('), parse_id_ref, char!(')'))?;
            (input, Statement::QueryReview(id))
        }

        "reviews" => {
            let (input, searchby) = delimited!(input, char!('('), parse_searchby, char!(')'))?;
            (input, Statement::Reviews(searchby))
        }

        "rating" => {
            let (input, searchby) = delimited!(input, char!('('), parse_searchby, char!(')'))?;
            (input, Statement::Rating(searchby))
        }

        "quality" => {
            let (input, id) = delimited!(input, char!('('), parse_id_ref, char!(')'))?;
            (input, Statement::Quality(id))
        }

        "helpfulness" => {
            let (input, (upvotes, _, downvotes, _, verified)) = delimited!(
                input,
                char!('('),
                tuple!(
                    parse_number,
                    parse_separator,
                    parse_number,
                    parse_separator,
                    parse_bool
                ),
                char!(')')
            )?;

            (
                input,
                Statement::Helpfulness(
                    upvotes.parse().expect("Parsing a number should not fail"),
                    downvotes.parse().expect("Parsing a number should not fail"),
                    verified,
                ),
            )
        }

        "similar" => {
            let (input, (id, _, k)) = delimited!(
                input,
                char!('('),
                tuple!(parse_id_ref, parse_separator, parse_number),
                char!(')')
            )?;

            (
                input,
                Statement::Similar(id, k.parse().expect("Parsing a number should not fail")),
            )
        }

        "suspicious" => {
            let (input, id) = delimited!(input, char!('('), parse_id_ref, char!(')'))?;
            (input, Statement::Suspicious(id))
        }

        "check" => {
            let (input, (user_id, _, text)) = delimited!(
                input,
                char!('('),
                tuple!(parse_id_ref, parse_separator, parse_free_text),
                char!(')')
            )?;

            (input, Statement::Check(user_id, text.into()))
        }

        "trends" => {
            let (input, (searchby, _, start, _, end)) = delimited!(
                input,
                char!('('),
                tuple!(
                    parse_searchby,
                    parse_separator,
                    parse_date,
                    parse_separator,
                    parse_date
                ),
                char!(')')
            )?;

            (input, Statement::Trends(searchby, start, end))
        }

        "vote" => {
            let (input, (user_id, _, review_id, _, is_upvote)) = delimited!(
                input,
                char!('('),
                tuple!(
                    parse_id_ref,
                    parse_separator,
                    parse_id_ref,
                    parse_separator,
                    parse_direction
                ),
                char!(')')
            )?;

            (input, Statement::Vote(user_id, review_id, is_upvote))
        }

        "unvote" => {
            let (input, (user_id, _, review_id)) = delimited!(
                input,
                char!('('),
                tuple!(parse_id_ref, parse_separator, parse_id_ref),
                char!(')')
            )?;

            (input, Statement::Unvote(user_id, review_id))
        }

        "deactivate" => {
            let (input, id) = delimited!(input, char!('('), parse_id_ref, char!(')'))?;
            (input, Statement::Deactivate(id))
        }

        "reactivate" => {
            let (input, id) = delimited!(input, char!('('), parse_id_ref, char!(')'))?;
            (input, Statement::Reactivate(id))
        }

        _ => unreachable!(),
    };

    Ok((input, statement))
}

pub fn parse_line(input: &str) -> Option<Statement> {
    let input = input.trim();
    let (rest, statement) = parse_statement(input).ok()?;

    if rest.is_empty() {
        Some(statement)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_company_statement() {
        let parsed = parse_statement("query_company(id(acme))");
        let expected = ("", Statement::QueryCompany(SearchBy::id("acme")));

        assert_eq!(parsed, Ok(expected));

        let parsed = parse_statement("query_company(name(Acme Analytics))");
        let expected = ("", Statement::QueryCompany(SearchBy::name("Acme Analytics")));

        assert_eq!(parsed, Ok(expected));
    }

    #[test]
    fn rating_statement() {
        let parsed = parse_statement("rating(id(acme))");
        let expected = ("", Statement::Rating(SearchBy::id("acme")));

        assert_eq!(parsed, Ok(expected));
    }

    #[test]
    fn helpfulness_statement() {
        let parsed = parse_statement("helpfulness(12, 3, true)");
        let expected = ("", Statement::Helpfulness(12, 3, true));

        assert_eq!(parsed, Ok(expected));
    }

    #[test]
    fn similar_statement() {
        let parsed = parse_statement("similar(id(r1), 5)");
        let expected = ("", Statement::Similar("r1".into(), 5));

        assert_eq!(parsed, Ok(expected));
    }

    #[test]
    fn check_statement_takes_free_text() {
        let parsed = parse_statement("check(id(u1), Great culture and good pay here)");
        let expected = (
            "",
            Statement::Check("u1".into(), "Great culture and good pay here".into()),
        );

        assert_eq!(parsed, Ok(expected));
    }

    #[test]
    fn trends_statement() {
        let parsed = parse_statement("trends(id(acme), 2025-01-01, 2025-06-30)");
        let expected = (
            "",
            Statement::Trends(
                SearchBy::id("acme"),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            ),
        );

        assert_eq!(parsed, Ok(expected));
    }

    #[test]
    fn vote_statements() {
        let parsed = parse_statement("vote(id(u1), id(r2), up)");
        let expected = ("", Statement::Vote("u1".into(), "r2".into(), true));
        assert_eq!(parsed, Ok(expected));

        let parsed = parse_statement("vote(id(u1), id(r2), down)");
        let expected = ("", Statement::Vote("u1".into(), "r2".into(), false));
        assert_eq!(parsed, Ok(expected));

        let parsed = parse_statement("unvote(id(u1), id(r2))");
        let expected = ("", Statement::Unvote("u1".into(), "r2".into()));
        assert_eq!(parsed, Ok(expected));
    }

    #[test]
    fn moderation_statements() {
        let parsed = parse_statement("deactivate(id(r5))");
        assert_eq!(parsed, Ok(("", Statement::Deactivate("r5".into()))));

        let parsed = parse_statement("reactivate(id(r5))");
        assert_eq!(parsed, Ok(("", Statement::Reactivate("r5".into()))));
    }

    #[test]
    fn parse_invalid_line() {
        assert!(parse_line("quality(id())").is_none());
        assert!(parse_line("trends(id(acme), 2025-13-99, 2025-06-30)").is_none());
        assert!(parse_line("vote(id(u1), id(r2), sideways)").is_none());
    }

    #[test]
    fn parse_valid_line() {
        let parsed = parse_line("  suspicious(id(r1))  ");
        assert_eq!(parsed, Some(Statement::Suspicious("r1".into())));
    }
}
