//! Temporal pattern matchers
//!
//! Each matcher is an anchored pattern paired with a calendar check. A string
//! that matches a pattern but names an impossible value (`2021-13-45`,
//! `25:00:00`) is not a match; the caller keeps the original string.
//!
//! Matchers run in priority order: time, then date, then timestamp. The
//! patterns are mutually exclusive, so at most one can apply.

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use jsonform_core::{TimeOfDay, Timestamp, Value};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

const TIME_FMT: &str = r"(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})(?:\.(?P<fraction>[0-9]+))?";
const DATE_FMT: &str = r"(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})";
const OFFSET_FMT: &str = r"(?P<offset>Z|(?P<sign>[+-])(?P<off_hour>[0-9]{2}):(?P<off_minute>[0-9]{2}))";

static TIME_RE: Lazy<Regex> = Lazy::new(|| anchored(TIME_FMT));
static DATE_RE: Lazy<Regex> = Lazy::new(|| anchored(DATE_FMT));
static DATETIME_RE: Lazy<Regex> =
    Lazy::new(|| anchored(&format!("{}T{}{}?", DATE_FMT, TIME_FMT, OFFSET_FMT)));

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^{}$", pattern)).expect("temporal pattern is a valid regex")
}

/// A matcher tries to read one temporal kind from a string
pub type Matcher = fn(&str) -> Option<Value>;

/// Matchers in priority order
pub const MATCHERS: [Matcher; 3] = [match_time, match_date, match_datetime];

/// Reinterpret a string as a time, date or timestamp
///
/// Returns `None` when no matcher both matches and parses.
pub fn parse_temporal(s: &str) -> Option<Value> {
    MATCHERS.iter().find_map(|matcher| matcher(s))
}

/// `HH:MM:SS[.f]`
pub fn match_time(s: &str) -> Option<Value> {
    let caps = TIME_RE.captures(s)?;
    let parsed = time_from(&caps).map(|t| Value::Time(TimeOfDay::naive(t)));
    if parsed.is_none() {
        trace!(value = s, "time pattern matched but value is out of range");
    }
    parsed
}

/// `YYYY-MM-DD`
pub fn match_date(s: &str) -> Option<Value> {
    let caps = DATE_RE.captures(s)?;
    let parsed = date_from(&caps).map(Value::Date);
    if parsed.is_none() {
        trace!(value = s, "date pattern matched but value is out of range");
    }
    parsed
}

/// `YYYY-MM-DDTHH:MM:SS[.f][±HH:MM|Z]`
pub fn match_datetime(s: &str) -> Option<Value> {
    let caps = DATETIME_RE.captures(s)?;
    let parsed = datetime_from(&caps).map(Value::DateTime);
    if parsed.is_none() {
        trace!(value = s, "timestamp pattern matched but value is out of range");
    }
    parsed
}

fn number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok()
}

fn date_from(caps: &Captures<'_>) -> Option<NaiveDate> {
    let year = number(caps, "year")?;
    if year == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, number(caps, "month")?, number(caps, "day")?)
}

fn time_from(caps: &Captures<'_>) -> Option<NaiveTime> {
    let nanos = caps.name("fraction").map_or(0, |f| fraction_nanos(f.as_str()));
    NaiveTime::from_hms_nano_opt(
        number(caps, "hour")?,
        number(caps, "minute")?,
        number(caps, "second")?,
        nanos,
    )
}

/// Nanoseconds from fractional digits; digits past the ninth are dropped
fn fraction_nanos(digits: &str) -> u32 {
    digits
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

fn offset_from(caps: &Captures<'_>) -> Option<Option<FixedOffset>> {
    let Some(offset) = caps.name("offset") else {
        return Some(None);
    };
    if offset.as_str() == "Z" {
        return FixedOffset::east_opt(0).map(Some);
    }
    let hours = number(caps, "off_hour")? as i32;
    let minutes = number(caps, "off_minute")? as i32;
    if minutes >= 60 {
        return None;
    }
    let secs = hours * 3600 + minutes * 60;
    let secs = match caps.name("sign").map(|m| m.as_str()) {
        Some("-") => -secs,
        _ => secs,
    };
    FixedOffset::east_opt(secs).map(Some)
}

fn datetime_from(caps: &Captures<'_>) -> Option<Timestamp> {
    let datetime = date_from(caps)?.and_time(time_from(caps)?);
    Some(match offset_from(caps)? {
        Some(offset) => Timestamp::aware(datetime, offset),
        None => Timestamp::naive(datetime),
    })
}
