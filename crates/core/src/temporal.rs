//! Temporal leaf types
//!
//! `chrono` separates naive and offset-carrying values into different types.
//! The value tree needs one type per leaf kind that may or may not carry an
//! offset, so both wrappers hold a naive wall-clock value plus an optional
//! UTC offset.
//!
//! Equality is structural: `10:00+01:00` and `09:00+00:00` are different
//! values, and a naive value never equals an aware one.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

/// Wall-clock time, optionally carrying a UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    time: NaiveTime,
    #[serde(with = "offset_seconds")]
    offset: Option<FixedOffset>,
}

impl TimeOfDay {
    /// Create a time without offset
    pub fn naive(time: NaiveTime) -> Self {
        Self { time, offset: None }
    }

    /// Create a time at the given UTC offset
    pub fn aware(time: NaiveTime, offset: FixedOffset) -> Self {
        Self {
            time,
            offset: Some(offset),
        }
    }

    /// The wall-clock part
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// The UTC offset, if any
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// True when the time carries an offset
    pub fn is_aware(&self) -> bool {
        self.offset.is_some()
    }

    /// True when the time has a non-zero sub-second part
    ///
    /// A leap second alone is not a fraction.
    pub fn has_fraction(&self) -> bool {
        self.time.nanosecond() % 1_000_000_000 != 0
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        TimeOfDay::naive(time)
    }
}

/// Calendar date plus wall-clock time, optionally carrying a UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    datetime: NaiveDateTime,
    #[serde(with = "offset_seconds")]
    offset: Option<FixedOffset>,
}

impl Timestamp {
    /// Create a timestamp without offset
    pub fn naive(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            offset: None,
        }
    }

    /// Create a timestamp whose wall-clock value is local to `offset`
    pub fn aware(datetime: NaiveDateTime, offset: FixedOffset) -> Self {
        Self {
            datetime,
            offset: Some(offset),
        }
    }

    /// The wall-clock date and time
    pub fn naive_local(&self) -> NaiveDateTime {
        self.datetime
    }

    /// The calendar date part
    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    /// The wall-clock time part
    pub fn time(&self) -> NaiveTime {
        self.datetime.time()
    }

    /// The UTC offset, if any
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// True when the timestamp carries an offset
    pub fn is_aware(&self) -> bool {
        self.offset.is_some()
    }

    /// True when the timestamp has a non-zero sub-second part
    pub fn has_fraction(&self) -> bool {
        self.datetime.nanosecond() % 1_000_000_000 != 0
    }

    /// Convert an aware timestamp into a `chrono::DateTime`
    ///
    /// Returns `None` for naive timestamps.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.offset
            .and_then(|offset| offset.from_local_datetime(&self.datetime).single())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(datetime: NaiveDateTime) -> Self {
        Timestamp::naive(datetime)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Timestamp::aware(datetime.naive_local(), *datetime.offset())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Timestamp::aware(datetime.naive_utc(), Utc.fix())
    }
}

/// Serde helper storing an optional offset as signed seconds east of UTC
mod offset_seconds {
    use chrono::FixedOffset;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        offset: &Option<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        offset
            .map(|o| o.local_minus_utc())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<FixedOffset>, D::Error> {
        Option::<i32>::deserialize(deserializer)?
            .map(|secs| {
                FixedOffset::east_opt(secs)
                    .ok_or_else(|| D::Error::custom(format!("UTC offset out of range: {}s", secs)))
            })
            .transpose()
    }
}
