// src/domain/availability.rs

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};
use std::sync::LazyLock;

const MONTHS: &str = "january|february|march|april|june|july|august|september|october|november|december|jan|feb|mar|apr|may|jun|jul|aug|sept|sep|oct|nov|dec";

static YEAR_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b").expect("year-first date regex"));

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/.-](\d{1,2})(?:[/.-](\d{4}|\d{2}))?\b").expect("numeric date regex")
});

static MONTH_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(\d{{4}})\b)?"
    ))
    .expect("month-first date regex")
});

static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTHS})\b\.?(?:,?\s+(\d{{4}})\b)?"
    ))
    .expect("day-first date regex")
});

/// Turn an availability phrase into a move-in date.
///
/// `"now"` and `"soon"` mean `today`. Otherwise the recognizable date that starts earliest
/// in the phrase wins; a missing year is taken from `today`. `None` means unknown.
pub fn parse_availability(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let value = raw.trim();
    let lowered = value.to_lowercase();
    if lowered == "now" || lowered == "soon" {
        return Some(today);
    }

    // on equal offsets the earlier pattern in this list wins
    [
        parse_year_first(value),
        parse_numeric(value, today),
        parse_month_first(value, today),
        parse_day_first(value, today),
    ]
    .into_iter()
    .flatten()
    .min_by_key(|(start, _)| *start)
    .map(|(_, date)| date)
}

/// Offset and date of the first valid match of `re`.
fn first_match(
    re: &Regex,
    value: &str,
    build: impl Fn(&Captures) -> Option<NaiveDate>,
) -> Option<(usize, NaiveDate)> {
    re.captures_iter(value)
        .find_map(|c| Some((c.get(0)?.start(), build(&c)?)))
}

fn parse_year_first(value: &str) -> Option<(usize, NaiveDate)> {
    first_match(&YEAR_FIRST, value, |c| {
        NaiveDate::from_ymd_opt(num(c, 1)?, num(c, 2)?, num(c, 3)?)
    })
}

fn parse_numeric(value: &str, today: NaiveDate) -> Option<(usize, NaiveDate)> {
    first_match(&NUMERIC, value, |c| {
        let year = match c.get(3) {
            Some(y) if y.as_str().len() == 2 => 2000 + y.as_str().parse::<i32>().ok()?,
            Some(y) => y.as_str().parse().ok()?,
            None => today.year(),
        };
        NaiveDate::from_ymd_opt(year, num(c, 1)?, num(c, 2)?)
    })
}

fn parse_month_first(value: &str, today: NaiveDate) -> Option<(usize, NaiveDate)> {
    first_match(&MONTH_FIRST, value, |c| {
        let month = month_number(c.get(1)?.as_str())?;
        let year = num(c, 3).unwrap_or(today.year());
        NaiveDate::from_ymd_opt(year, month, num(c, 2)?)
    })
}

fn parse_day_first(value: &str, today: NaiveDate) -> Option<(usize, NaiveDate)> {
    first_match(&DAY_FIRST, value, |c| {
        let month = month_number(c.get(2)?.as_str())?;
        let year = num(c, 3).unwrap_or(today.year());
        NaiveDate::from_ymd_opt(year, month, num(c, 1)?)
    })
}

fn num<T: std::str::FromStr>(c: &Captures, i: usize) -> Option<T> {
    c.get(i)?.as_str().parse().ok()
}

fn month_number(name: &str) -> Option<u32> {
    let n = match name.get(..3)?.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}
