//! Monthly index suffixes.
//!
//! Audit indices are sharded by month and named `<prefix><sep>YYYY.MM`. The
//! functions here turn a textual date range into the list of suffixes that
//! cover it, most recent month first.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::errors::SearchIndexError;

/// Date-time layouts with a UTC offset (`Z`, `+hh`, `+hhmm` or `+hh:mm`).
const OFFSET_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Date-time layouts without an offset.
const DATE_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Appended to a `YYYY-MM` input so it parses as the first of the month.
const FIRST_DAY: &str = "-01";

const SUFFIX_FORMAT: &str = "%Y.%m";

/// Parse an ISO-8601 style date or date-time into a calendar date.
///
/// Times may stop at minutes, and a year-month (`2022-06`) means the first of
/// that month. Inputs with an offset keep the calendar date of their own
/// offset, so `2022-06-30T23:30:00-05:00` is June 30th.
///
/// # Example
///
/// ```
/// use audit_search_repository::index_suffix::parse_date;
///
/// let date = parse_date("2022-06-30T10:15:00Z").expect("valid date");
/// assert_eq!(date.to_string(), "2022-06-30");
/// assert!(parse_date("30/06/2022").is_err());
/// ```
pub fn parse_date(text: &str) -> Result<NaiveDate, SearchIndexError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SearchIndexError::invalid_date("date is empty"));
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Ok(date_time.date_naive());
    }

    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(date_time) = DateTime::parse_from_str(text, format) {
            return Ok(date_time.date_naive());
        }
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(date_time.date());
        }
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .or_else(|e| {
            NaiveDate::parse_from_str(&format!("{}{}", text, FIRST_DAY), DATE_FORMAT)
                .map_err(|_| e)
        })
        .map_err(|e| SearchIndexError::invalid_date(format!("{}: {}", text, e)))
}

/// Months since year 0, used to compare calendar months.
fn month_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Count the months between the start of `start_date`'s month and the end of
/// `end_date`'s month, both months included.
///
/// When the end month precedes the start month the count is the rounded
/// distance between those two instants, `start_month - end_month - 1`.
///
/// # Errors
///
/// Returns `SearchIndexError::InvalidDate` if either date does not parse.
pub fn find_number_of_months(start_date: &str, end_date: &str) -> Result<u32, SearchIndexError> {
    let start = parse_date(start_date)
        .map_err(|_| SearchIndexError::invalid_date(format!("Invalid startDate: {}", start_date)))?;
    let end = parse_date(end_date)
        .map_err(|_| SearchIndexError::invalid_date(format!("Invalid endDate: {}", end_date)))?;

    let diff = month_ordinal(end) - month_ordinal(start);
    let months = if diff >= 0 { diff + 1 } else { -diff - 1 };
    let months = u32::try_from(months)
        .map_err(|_| SearchIndexError::invalid_date("date range spans too many months"))?;

    debug!(
        start_date = %start_date,
        end_date = %end_date,
        months,
        "Computed number of months in range"
    );
    Ok(months)
}

/// Format a calendar date as a monthly index suffix (`YYYY.MM`).
pub fn suffix_for(date: NaiveDate) -> String {
    date.format(SUFFIX_FORMAT).to_string()
}

/// Monthly index suffix for a single textual date, e.g. `"2022.06"`.
pub fn index_suffix_for_date(date: &str) -> Result<String, SearchIndexError> {
    parse_date(date).map(suffix_for)
}

/// Generate one suffix per month in the range, starting with the end date's
/// month and walking backwards.
///
/// # Example
///
/// ```
/// use audit_search_repository::index_suffix::generate_index_suffixes;
///
/// let suffixes = generate_index_suffixes("2022-01-01", "2022-03-31").unwrap();
/// assert_eq!(suffixes, vec!["2022.03", "2022.02", "2022.01"]);
/// ```
pub fn generate_index_suffixes(
    start_date: &str,
    end_date: &str,
) -> Result<Vec<String>, SearchIndexError> {
    let months = find_number_of_months(start_date, end_date)?;
    let end = parse_date(end_date)?;

    (0..months)
        .map(|offset| {
            end.checked_sub_months(Months::new(offset))
                .map(suffix_for)
                .ok_or_else(|| {
                    SearchIndexError::invalid_date(format!(
                        "{} minus {} months is out of range",
                        end_date, offset
                    ))
                })
        })
        .collect()
}

/// Join an index prefix and a monthly suffix.
///
/// An empty `separator` concatenates, for prefixes that already end with
/// their own delimiter (`logstash_audit-..._`).
pub fn index_name(prefix: &str, separator: &str, suffix: &str) -> String {
    format!("{}{}{}", prefix, separator, suffix)
}
