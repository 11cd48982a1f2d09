//! Text conversions shared by [`Key`](crate::Key) accessors and the struct mapper.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// Delimiter for list values.
pub const LIST_DELIMITER: char = ',';

/// Parses the boolean spellings accepted in configuration values.
///
/// ```rust
/// assert_eq!(csgo_cfg::convert::parse_bool("on"), Some(true));
/// assert_eq!(csgo_cfg::convert::parse_bool("F"), Some(false));
/// assert_eq!(csgo_cfg::convert::parse_bool("maybe"), None);
/// ```
#[must_use]
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" | "y" | "Y" | "yes" | "YES" | "Yes" | "on"
        | "ON" | "On" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" | "n" | "N" | "no" | "NO" | "No" | "off"
        | "OFF" | "Off" => Some(false),
        _ => None,
    }
}

/// Splits a list value on `delim`, trimming each element.
///
/// An empty value is an empty list.
///
/// ```rust
/// let parts = csgo_cfg::convert::split_list("a, b ,c", ',');
/// assert_eq!(parts, vec!["a", "b", "c"]);
/// assert!(csgo_cfg::convert::split_list("  ", ',').is_empty());
/// ```
#[must_use]
pub fn split_list(text: &str, delim: char) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(delim).map(str::trim).collect()
}

/// Parses an RFC 3339 timestamp.
pub fn parse_rfc3339(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text.trim())
}

/// Parses a timestamp with a `strftime`-style format.
///
/// Formats carrying an offset (`%z`, `%:z`) produce that offset, others are
/// read as UTC. Date-only formats give midnight.
pub fn parse_time_format(
    text: &str,
    format: &str,
) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let text = text.trim();
    DateTime::parse_from_str(text, format).or_else(|err| {
        NaiveDateTime::parse_from_str(text, format)
            .or_else(|_| {
                NaiveDate::parse_from_str(text, format).map(|date| date.and_time(NaiveTime::MIN))
            })
            .map(|naive| naive.and_utc().fixed_offset())
            .map_err(|_| err)
    })
}
