//! Evenly spaced timestamp sequences and their translation into weather adapter
//! request parameters (`timeStart`, `timeEnd`, `interval`).

use crate::types::error::DateRangeError;
use bon::bon;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use std::fmt;

/// Upper bound on the number of timestamps a single range may hold.
pub const MAX_RANGE_LEN: usize = 1_000_000;

const REQUEST_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The timezone a [`DateRange`] is expressed in.
///
/// The distinction between `Utc` and an offset of zero matters for the request
/// strings: UTC ranges are suffixed with `Z`, offset ranges with `+HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeTimeZone {
    Utc,
    Offset(FixedOffset),
}

impl RangeTimeZone {
    pub fn fixed_offset(&self) -> FixedOffset {
        match self {
            RangeTimeZone::Utc => Utc.fix(),
            RangeTimeZone::Offset(offset) => *offset,
        }
    }

    /// The suffix appended to request timestamps: `Z` or `+HH:MM`/`-HH:MM`.
    pub fn suffix(&self) -> String {
        match self {
            RangeTimeZone::Utc => "Z".to_string(),
            RangeTimeZone::Offset(offset) => colon_offset(offset),
        }
    }
}

impl fmt::Display for RangeTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeTimeZone::Utc => write!(f, "UTC"),
            RangeTimeZone::Offset(offset) => write!(f, "UTC{}", colon_offset(offset)),
        }
    }
}

fn colon_offset(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

/// An ordered, evenly spaced, non-empty sequence of timestamps.
///
/// A `DateRange` defines the time window and sampling interval of a weather data
/// request and becomes the `datetime` index of the resulting
/// [`WeatherFrame`](crate::WeatherFrame).
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, NaiveDate};
/// use ipm_weather::DateRange;
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(5, 0, 0).unwrap();
///
/// let utc = DateRange::builder().start(start).end(end).build().unwrap();
/// assert_eq!(utc.time_start(), "2020-01-01T00:00:00Z");
/// assert_eq!(utc.interval_seconds(), 3600);
/// assert_eq!(utc.len(), 6);
///
/// let oslo = DateRange::builder()
///     .start(start)
///     .end(end)
///     .offset(FixedOffset::east_opt(2 * 3600).unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(oslo.time_end(), "2020-01-01T05:00:00+02:00");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    timestamps: Vec<DateTime<FixedOffset>>,
    frequency: TimeDelta,
    zone: RangeTimeZone,
}

#[bon]
impl DateRange {
    /// Builds a range from `start` to `end` (both inclusive, wall-clock time in the
    /// chosen zone) stepping by `frequency`.
    ///
    /// * `.frequency(TimeDelta)`: Optional, defaults to one hour.
    /// * `.offset(FixedOffset)`: Optional. Without it the range is in UTC.
    ///
    /// # Errors
    ///
    /// Returns a [`DateRangeError`] if `start` is after `end`, if the frequency is not a
    /// positive whole number of seconds, or if the range would exceed [`MAX_RANGE_LEN`].
    #[builder]
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        frequency: Option<TimeDelta>,
        offset: Option<FixedOffset>,
    ) -> Result<Self, DateRangeError> {
        let frequency = frequency.unwrap_or_else(|| TimeDelta::hours(1));
        let zone = offset.map_or(RangeTimeZone::Utc, RangeTimeZone::Offset);
        Self::generate(start, end, frequency, zone)
    }

    /// Builds a range from two RFC 3339 timestamps, e.g. the `timeStart`/`timeEnd`
    /// pair reported by a forecast adapter. A trailing `Z` yields a UTC range, any
    /// other offset a fixed-offset range in the offset of `start`.
    pub fn from_rfc3339(
        start: &str,
        end: &str,
        frequency: TimeDelta,
    ) -> Result<Self, DateRangeError> {
        let parse = |raw: &str| {
            DateTime::parse_from_rfc3339(raw).map_err(|e| DateRangeError::Parse(raw.to_string(), e))
        };
        let start_dt = parse(start)?;
        let end_dt = parse(end)?;

        let zone = if start.ends_with('Z') || start.ends_with('z') {
            RangeTimeZone::Utc
        } else {
            RangeTimeZone::Offset(*start_dt.offset())
        };
        let offset = zone.fixed_offset();
        Self::generate(
            start_dt.with_timezone(&offset).naive_local(),
            end_dt.with_timezone(&offset).naive_local(),
            frequency,
            zone,
        )
    }

    fn generate(
        start: NaiveDateTime,
        end: NaiveDateTime,
        frequency: TimeDelta,
        zone: RangeTimeZone,
    ) -> Result<Self, DateRangeError> {
        if frequency <= TimeDelta::zero() {
            return Err(DateRangeError::NonPositiveFrequency(frequency));
        }
        if frequency.subsec_nanos() != 0 {
            return Err(DateRangeError::FractionalFrequency(frequency));
        }
        if start > end {
            return Err(DateRangeError::Empty { start, end });
        }

        let offset = zone.fixed_offset();
        let mut current = offset
            .from_local_datetime(&start)
            .single()
            .ok_or(DateRangeError::InvalidTimestamp(start))?;

        let mut timestamps = Vec::new();
        while current.naive_local() <= end {
            if timestamps.len() >= MAX_RANGE_LEN {
                return Err(DateRangeError::TooManySteps(MAX_RANGE_LEN));
            }
            timestamps.push(current);
            match current.checked_add_signed(frequency) {
                Some(next) => current = next,
                None => break,
            }
        }

        Ok(Self {
            timestamps,
            frequency,
            zone,
        })
    }

    pub fn timestamps(&self) -> &[DateTime<FixedOffset>] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always `false`; a range holds at least one timestamp.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn first(&self) -> DateTime<FixedOffset> {
        self.timestamps[0]
    }

    pub fn last(&self) -> DateTime<FixedOffset> {
        self.timestamps[self.timestamps.len() - 1]
    }

    pub fn frequency(&self) -> TimeDelta {
        self.frequency
    }

    pub fn time_zone(&self) -> RangeTimeZone {
        self.zone
    }

    /// The `timeStart` request parameter, e.g. `2020-06-12T00:00:00Z`.
    pub fn time_start(&self) -> String {
        self.request_timestamp(self.first())
    }

    /// The `timeEnd` request parameter.
    pub fn time_end(&self) -> String {
        self.request_timestamp(self.last())
    }

    /// The `interval` request parameter: the frequency in whole seconds.
    pub fn interval_seconds(&self) -> i64 {
        self.frequency.num_seconds()
    }

    /// The timestamps as timezone-naive UTC values, the representation used by the
    /// `datetime` column of weather frames.
    pub fn naive_utc(&self) -> Vec<NaiveDateTime> {
        self.timestamps.iter().map(|ts| ts.naive_utc()).collect()
    }

    fn request_timestamp(&self, timestamp: DateTime<FixedOffset>) -> String {
        format!(
            "{}{}",
            timestamp.format(REQUEST_TIME_FORMAT),
            self.zone.suffix()
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {} every {}s ({})",
            self.first().format(REQUEST_TIME_FORMAT),
            self.last().format(REQUEST_TIME_FORMAT),
            self.interval_seconds(),
            self.zone
        )
    }
}
