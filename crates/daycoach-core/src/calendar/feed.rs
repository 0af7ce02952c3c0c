//! ICS calendar feed fetching and defensive event extraction.
//!
//! The feed is the one fallible collaborator of the availability
//! computation: a fetch failure surfaces as [`CalendarError`] so callers
//! can distinguish "calendar unavailable" from "no free time". Individual
//! events that cannot be parsed are skipped, never fatal.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use url::Url;

use super::interval::{merge_intervals, TimeInterval};
use super::{day_bounds, reference_tz};
use crate::error::CalendarError;

/// Fixed network timeout for one feed fetch. Not retried internally.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// An ICS calendar feed reachable over HTTP.
pub struct CalendarFeed {
    url: Url,
    timeout: Duration,
}

impl CalendarFeed {
    pub fn new(url: &str) -> Result<Self, CalendarError> {
        Ok(Self {
            url: Url::parse(url)?,
            timeout: FETCH_TIMEOUT,
        })
    }

    /// Fetch the feed and return the merged busy spans overlapping `day`,
    /// clipped to the day's 00:00-23:59 bounds.
    pub async fn fetch_busy_spans(&self, day: NaiveDate) -> Result<Vec<TimeInterval>, CalendarError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let response = client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CalendarError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(busy_spans_for_day(&body, day))
    }
}

/// Extract the merged busy spans for `day` from raw ICS text.
///
/// Pure; separated from the fetch so tests and offline callers can feed
/// captured calendars through it.
pub fn busy_spans_for_day(ics: &str, day: NaiveDate) -> Vec<TimeInterval> {
    let (day_start, day_end) = day_bounds(day);
    let clipped = parse_events(ics)
        .into_iter()
        .filter_map(|(start, end)| TimeInterval::new(start, end)?.clip(day_start, day_end))
        .collect();
    merge_intervals(clipped)
}

/// Walk VEVENT blocks and pull out (start, end) pairs. Events missing
/// either bound, or with bounds in a form we cannot read, are skipped.
fn parse_events(ics: &str) -> Vec<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let mut events = Vec::new();
    let mut in_event = false;
    let mut start: Option<IcsStamp> = None;
    let mut end: Option<IcsStamp> = None;

    for line in unfold_lines(ics) {
        match line.as_str() {
            "BEGIN:VEVENT" => {
                in_event = true;
                start = None;
                end = None;
            }
            "END:VEVENT" => {
                if in_event {
                    match (start.take(), end.take()) {
                        (Some(s), Some(e)) => events.push((s.start_instant(), e.end_instant())),
                        _ => tracing::debug!("skipping calendar event without parsable bounds"),
                    }
                }
                in_event = false;
            }
            _ if in_event => {
                if let Some((name, value)) = split_property(&line) {
                    match name.as_str() {
                        "DTSTART" => start = parse_stamp(value),
                        "DTEND" => end = parse_stamp(value),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    events
}

/// A parsed DTSTART/DTEND value: either a precise instant or an all-day
/// date (RFC 5545 `VALUE=DATE`, exclusive when used as an end).
enum IcsStamp {
    Instant(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl IcsStamp {
    fn start_instant(self) -> DateTime<FixedOffset> {
        match self {
            IcsStamp::Instant(dt) => dt,
            IcsStamp::Date(d) => super::at(d, chrono::NaiveTime::MIN),
        }
    }

    fn end_instant(self) -> DateTime<FixedOffset> {
        match self {
            IcsStamp::Instant(dt) => dt,
            // An all-day end date is exclusive; midnight of that date is
            // already the boundary.
            IcsStamp::Date(d) => super::at(d, chrono::NaiveTime::MIN),
        }
    }
}

/// Undo RFC 5545 line folding: a line starting with space or tab continues
/// the previous one.
fn unfold_lines(ics: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in ics.lines() {
        let raw = raw.trim_end_matches('\r');
        if let Some(rest) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        lines.push(raw.to_string());
    }
    lines
}

/// Split `NAME;PARAM=..:VALUE` into the bare property name and its value.
fn split_property(line: &str) -> Option<(String, &str)> {
    let (head, value) = line.split_once(':')?;
    let name = head.split(';').next().unwrap_or(head).trim().to_uppercase();
    Some((name, value.trim()))
}

fn parse_stamp(value: &str) -> Option<IcsStamp> {
    if let Some(utc_part) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc_part, "%Y%m%dT%H%M%S").ok()?;
        let utc = DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc);
        return Some(IcsStamp::Instant(utc.with_timezone(&reference_tz())));
    }
    if value.contains('T') {
        // Floating local time; the feed is assumed to be in the reference
        // timezone, matching the original deployment.
        let naive = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?;
        return Some(IcsStamp::Instant(
            reference_tz().from_local_datetime(&naive).single()?,
        ));
    }
    let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
    Some(IcsStamp::Date(date))
}
