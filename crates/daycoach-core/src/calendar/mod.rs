//! Calendar availability: busy-interval algebra and free-time computation.
//!
//! All instants live in a fixed reference timezone (UTC+9). The interval
//! and availability halves are pure; fetching the feed is the only I/O and
//! is kept at the edge in [`feed`].

mod availability;
mod feed;
mod interval;

pub use availability::{free_minutes, parse_hhmm, FreeTimeCalculator, WorkWindow, DEFAULT_MIN_BLOCK};
pub use feed::{busy_spans_for_day, CalendarFeed, FETCH_TIMEOUT};
pub use interval::{merge_intervals, TimeInterval};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};

const REFERENCE_OFFSET_SECS: i32 = 9 * 3600;

/// The fixed reference timezone (UTC+9, no daylight saving).
pub fn reference_tz() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECS).expect("offset is within +/-24h")
}

/// An instant on `day` at `time` in the reference timezone.
pub(crate) fn at(day: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
    // A fixed offset has no DST gaps, so the local time is never ambiguous.
    reference_tz()
        .from_local_datetime(&day.and_time(time))
        .unwrap()
}

/// The 00:00-23:59 span of `day` in the reference timezone.
pub(crate) fn day_bounds(day: NaiveDate) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let start = NaiveTime::from_hms_opt(0, 0, 0).expect("valid time");
    let end = NaiveTime::from_hms_opt(23, 59, 0).expect("valid time");
    (at(day, start), at(day, end))
}
