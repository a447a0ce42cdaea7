//! Age computation from free-form birth/death strings.
//!
//! Dates are entered by hand, so parsing is lenient and total: anything that
//! cannot be read as a year simply yields no age.

use super::person::Person;
use super::time::TimeProvider;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Full-date formats accepted in addition to a bare 4-digit year.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Extract the calendar year from a birth or death value.
///
/// Accepts a bare 4-digit year (`"1950"`), a year and month (`"1950-06"`),
/// or a full date in one of the common formats. Returns `None` for anything
/// else, including the empty string.
///
/// ```rust
/// use familytree_core::models::age::parse_year;
///
/// assert_eq!(parse_year("1950"), Some(1950));
/// assert_eq!(parse_year("1950-06-01"), Some(1950));
/// assert_eq!(parse_year("abcd"), None);
/// ```
pub fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse().ok();
    }

    parse_date(value).map(|date| date.year())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.date_naive());
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    {
        return Some(date);
    }

    if let Some(date_time) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(date_time.date());
    }

    // Year-month ("1950-06")
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok()
}

/// Age in whole years, counted by calendar year.
///
/// The end year is the death year, or `current_year` when `death` is empty.
/// Only an empty `death` means the person is living; any other value,
/// whitespace included, must be readable.
///
/// Returns `None` when the birth is missing, either value is unreadable, or
/// the result is not positive.
///
/// ```rust
/// use familytree_core::models::age::age_in_year;
///
/// assert_eq!(age_in_year("1950", "", 2024), Some(74));
/// assert_eq!(age_in_year("1950-06-01", "2000-06-01", 2024), Some(50));
/// assert_eq!(age_in_year("", "2000", 2024), None);
/// ```
pub fn age_in_year(birth: &str, death: &str, current_year: i32) -> Option<u32> {
    let birth_year = parse_year(birth)?;
    let end_year = if death.is_empty() {
        current_year
    } else {
        parse_year(death)?
    };

    u32::try_from(end_year - birth_year).ok().filter(|age| *age > 0)
}

/// Age of a person using the clock for living people.
pub fn age_of(person: &Person, clock: &dyn TimeProvider) -> Option<u32> {
    age_in_year(&person.birth, &person.death, clock.current_year())
}
