//! The shared filter / sort / pagination facade.
//!
//! Every dashboard screen produces its table through these three functions;
//! none of them mutates the source record set. Sorting prefers numeric
//! comparison, then date comparison when either value looks like a date,
//! then falls back to plain string order - the same coercion ladder the
//! legacy table code applied.

use crate::record::Record;
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

lazy_static! {
    static ref ISO_DATETIME_RE: Regex =
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})[ T](\d{2}):(\d{2})(?::(\d{2}))?").unwrap();
    static ref ISO_DATE_RE: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").unwrap();
    static ref BR_DATE_RE: Regex = Regex::new(r"^(\d{2})/(\d{2})/(\d{4})").unwrap();
    static ref SLASH_DATE_RE: Regex = Regex::new(r"^(\d{4})/(\d{2})/(\d{2})").unwrap();
}

/// One field-level predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criterion {
    /// Exact match against the raw cell text.
    Equals(String),
    /// Case-insensitive substring match.
    Contains(String),
    /// Cell must equal one of the listed values (bulk status filters).
    AnyOf(Vec<String>),
    /// Cell parses as a date falling inside the token's range.
    DateRange(DateToken),
}

/// Relative date ranges resolved against the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateToken {
    Today,
    Tomorrow,
    ThisWeek,
}

impl DateToken {
    /// Parse the query-string spelling of a token.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "today" | "hoje" => Some(Self::Today),
            "tomorrow" | "amanha" => Some(Self::Tomorrow),
            "this_week" | "semana" => Some(Self::ThisWeek),
            _ => None,
        }
    }

    /// The half-open `[start, end)` date range the token covers on `today`.
    fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Today => (today, today + Duration::days(1)),
            Self::Tomorrow => (today + Duration::days(1), today + Duration::days(2)),
            Self::ThisWeek => {
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (monday, monday + Duration::days(7))
            }
        }
    }
}

/// Sort order for [`sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Parse a cell that might hold a date in any of the formats the sheets
/// use: ISO datetime, ISO date, Brazilian `DD/MM/YYYY`, or `YYYY/MM/DD`.
pub fn parse_flex_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(c) = ISO_DATETIME_RE.captures(raw) {
        let date = NaiveDate::from_ymd_opt(c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?)?;
        let secs: u32 = c.get(6).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        return date.and_hms_opt(c[4].parse().ok()?, c[5].parse().ok()?, secs);
    }
    if let Some(c) = ISO_DATE_RE.captures(raw) {
        let date = NaiveDate::from_ymd_opt(c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?)?;
        return date.and_hms_opt(0, 0, 0);
    }
    if let Some(c) = BR_DATE_RE.captures(raw) {
        let date = NaiveDate::from_ymd_opt(c[3].parse().ok()?, c[2].parse().ok()?, c[1].parse().ok()?)?;
        return date.and_hms_opt(0, 0, 0);
    }
    if let Some(c) = SLASH_DATE_RE.captures(raw) {
        let date = NaiveDate::from_ymd_opt(c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?)?;
        return date.and_hms_opt(0, 0, 0);
    }
    None
}

fn looks_like_date(raw: &str) -> bool {
    let raw = raw.trim();
    ISO_DATE_RE.is_match(raw) || BR_DATE_RE.is_match(raw) || SLASH_DATE_RE.is_match(raw)
}

fn criterion_matches(record: &Record, field: &str, criterion: &Criterion, today: NaiveDate) -> bool {
    let value = record.get(field).unwrap_or("");
    match criterion {
        Criterion::Equals(expected) => {
            // An empty expectation filters nothing, same as a blank form input
            expected.is_empty() || value == expected
        }
        Criterion::Contains(needle) => {
            needle.is_empty() || value.to_lowercase().contains(&needle.to_lowercase())
        }
        Criterion::AnyOf(options) => {
            options.is_empty() || options.iter().any(|o| o == value)
        }
        Criterion::DateRange(token) => match parse_flex_date(value) {
            Some(dt) => {
                let (start, end) = token.range(today);
                let date = dt.date();
                date >= start && date < end
            }
            None => false,
        },
    }
}

/// Apply a set of field-level predicates to a record set.
///
/// All criteria must hold (AND). An empty criteria map returns the input
/// content unchanged. Relative date tokens resolve against the local date.
///
/// # Arguments
/// * `records` - The record set to filter (not mutated)
/// * `criteria` - Field name -> predicate
///
/// # Returns
/// * `Vec<Record>` - The matching records, in input order
pub fn filter(records: &[Record], criteria: &HashMap<String, Criterion>) -> Vec<Record> {
    filter_on(records, criteria, Local::now().date_naive())
}

/// [`filter`] with an explicit "today", so date-range behavior is testable.
pub fn filter_on(
    records: &[Record],
    criteria: &HashMap<String, Criterion>,
    today: NaiveDate,
) -> Vec<Record> {
    if criteria.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| {
            criteria
                .iter()
                .all(|(field, criterion)| criterion_matches(r, field, criterion, today))
        })
        .cloned()
        .collect()
}

fn compare_values(a: &str, b: &str) -> Ordering {
    // Numeric coercion first: "10" sorts after "2"
    if let (Ok(na), Ok(nb)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        return na.partial_cmp(&nb).unwrap_or(Ordering::Equal);
    }
    // Date coercion when either side looks like a date; unparsable sides
    // order first, like the legacy epoch-zero fallback
    if looks_like_date(a) || looks_like_date(b) {
        let da = parse_flex_date(a);
        let db = parse_flex_date(b);
        return match (da, db) {
            (Some(da), Some(db)) => da.cmp(&db),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => a.cmp(b),
        };
    }
    a.cmp(b)
}

/// Sort a record set by one key.
///
/// Comparison tries numeric coercion, then date coercion, then falls back
/// to string order. The underlying sort is stable, so ties keep their input
/// order - treat that as an implementation detail, not a contract.
///
/// # Arguments
/// * `records` - The record set to sort (not mutated)
/// * `key` - Field name to compare on; missing fields compare as empty
/// * `direction` - `Asc` or `Desc`
pub fn sort(records: &[Record], key: &str, direction: SortDirection) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let av = a.get(key).unwrap_or("");
        let bv = b.get(key).unwrap_or("");
        let ord = compare_values(av, bv);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}

/// Clamp a 1-based page number into the valid range for `total` records.
///
/// Page 0 clamps to 1; pages past the end clamp to the last non-empty page.
/// An empty set always yields page 1.
pub fn clamp_page(total: usize, page: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        return 1;
    }
    let last = (total + page_size - 1) / page_size;
    page.clamp(1, last)
}

/// Slice one page out of a record set.
///
/// Pages are 1-based; out-of-range pages clamp rather than error.
///
/// # Returns
/// * `Vec<Record>` - The records in `[(page-1)*page_size, page*page_size)`
///   after clamping
pub fn paginate(records: &[Record], page: usize, page_size: usize) -> Vec<Record> {
    if page_size == 0 {
        return Vec::new();
    }
    let page = clamp_page(records.len(), page, page_size);
    let start = (page - 1) * page_size;
    records
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect()
}
