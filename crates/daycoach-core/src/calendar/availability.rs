//! Free-minutes computation over a working window.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use super::interval::{merge_intervals, TimeInterval};
use crate::error::ValidationError;

/// Default block granularity in minutes.
pub const DEFAULT_MIN_BLOCK: i64 = 15;

/// Parse an `HH:MM` time-of-day string.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, ValidationError> {
    let bad = || ValidationError::InvalidTimeOfDay(s.to_string());
    let (h, m) = s.split_once(':').ok_or_else(bad)?;
    let hour: u32 = h.trim().parse().map_err(|_| bad())?;
    let minute: u32 = m.trim().parse().map_err(|_| bad())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(bad)
}

/// The boundary within which free time is computed: a day plus working
/// start/end times. An inverted window is representable and yields zero
/// availability rather than an error.
#[derive(Debug, Clone, Copy)]
pub struct WorkWindow {
    pub day: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkWindow {
    pub fn new(day: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { day, start, end }
    }

    /// Build from `HH:MM` strings.
    pub fn from_hhmm(day: NaiveDate, start: &str, end: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(day, parse_hhmm(start)?, parse_hhmm(end)?))
    }

    pub fn start_at(&self) -> DateTime<FixedOffset> {
        super::at(self.day, self.start)
    }

    pub fn end_at(&self) -> DateTime<FixedOffset> {
        super::at(self.day, self.end)
    }

    /// Whole minutes in the window, 0 when inverted or empty.
    pub fn total_minutes(&self) -> i64 {
        if self.end <= self.start {
            return 0;
        }
        (self.end_at() - self.start_at()).num_minutes()
    }
}

/// Computes free minutes within a work window, rounded down to a block
/// granularity.
pub struct FreeTimeCalculator {
    min_block: i64,
}

impl FreeTimeCalculator {
    /// Create a calculator with the default block size (15 minutes).
    pub fn new() -> Self {
        Self {
            min_block: DEFAULT_MIN_BLOCK,
        }
    }

    /// Set the block granularity. Values below 1 are treated as 1.
    pub fn with_min_block(mut self, minutes: i64) -> Self {
        self.min_block = minutes.max(1);
        self
    }

    /// Free minutes in `window` not covered by any of `busy`.
    ///
    /// Busy spans are clipped to the window, re-merged (cheap and keeps the
    /// sum well-defined regardless of input overlap), and subtracted from
    /// the window total. The result is non-negative, never exceeds the
    /// window total, and is always a multiple of the block size.
    pub fn free_minutes(&self, busy: &[TimeInterval], window: &WorkWindow) -> i64 {
        if window.end <= window.start {
            return 0;
        }
        let ws = window.start_at();
        let we = window.end_at();

        let clipped: Vec<TimeInterval> =
            busy.iter().filter_map(|span| span.clip(ws, we)).collect();
        let merged = merge_intervals(clipped);

        let total = window.total_minutes();
        let busy_sum: i64 = merged.iter().map(TimeInterval::duration_minutes).sum();
        let free = (total - busy_sum).max(0);
        (free / self.min_block) * self.min_block
    }
}

impl Default for FreeTimeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper: free minutes for `day` between `HH:MM` bounds with
/// the default block size.
pub fn free_minutes(
    busy: &[TimeInterval],
    day: NaiveDate,
    work_start: &str,
    work_end: &str,
) -> Result<i64, ValidationError> {
    let window = WorkWindow::from_hhmm(day, work_start, work_end)?;
    Ok(FreeTimeCalculator::new().free_minutes(busy, &window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::at;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
    }

    fn span(start: (u32, u32), end: (u32, u32)) -> TimeInterval {
        TimeInterval::new(
            at(day(), NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap()),
            at(day(), NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn parse_hhmm_accepts_and_rejects() {
        assert_eq!(parse_hhmm("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse_hhmm("0:05").unwrap(), NaiveTime::from_hms_opt(0, 5, 0).unwrap());
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("09:61").is_err());
        assert!(parse_hhmm("0900").is_err());
        assert!(parse_hhmm("").is_err());
    }

    #[test]
    fn empty_busy_day_is_all_free() {
        let free = free_minutes(&[], day(), "09:00", "18:00").unwrap();
        assert_eq!(free, 540);
    }

    #[test]
    fn overlapping_meetings_merge_before_subtraction() {
        // 09:00-10:00 and 09:30-11:00 merge to two busy hours.
        let busy = vec![span((9, 0), (10, 0)), span((9, 30), (11, 0))];
        let free = free_minutes(&busy, day(), "09:00", "18:00").unwrap();
        assert_eq!(free, 420);
    }

    #[test]
    fn degenerate_window_is_zero() {
        let busy = vec![span((9, 0), (10, 0))];
        assert_eq!(free_minutes(&busy, day(), "18:00", "09:00").unwrap(), 0);
        assert_eq!(free_minutes(&busy, day(), "09:00", "09:00").unwrap(), 0);
    }

    #[test]
    fn busy_outside_window_is_ignored() {
        let busy = vec![span((6, 0), (8, 0)), span((19, 0), (21, 0))];
        let free = free_minutes(&busy, day(), "09:00", "18:00").unwrap();
        assert_eq!(free, 540);
    }

    #[test]
    fn busy_overhanging_window_is_clipped() {
        // 08:00-09:30 contributes only 30 busy minutes inside the window.
        let busy = vec![span((8, 0), (9, 30))];
        let free = free_minutes(&busy, day(), "09:00", "18:00").unwrap();
        // 540 - 30 = 510, already a multiple of 15.
        assert_eq!(free, 510);
    }

    #[test]
    fn rounds_down_to_block() {
        // 09:00-09:10 busy leaves 530 free; 530 -> 525 with 15-minute blocks.
        let busy = vec![span((9, 0), (9, 10))];
        let free = free_minutes(&busy, day(), "09:00", "18:00").unwrap();
        assert_eq!(free, 525);

        let window = WorkWindow::from_hhmm(day(), "09:00", "18:00").unwrap();
        let hourly = FreeTimeCalculator::new()
            .with_min_block(60)
            .free_minutes(&busy, &window);
        assert_eq!(hourly, 480);
    }

    #[test]
    fn fully_booked_window_is_zero() {
        let busy = vec![span((8, 0), (19, 0))];
        assert_eq!(free_minutes(&busy, day(), "09:00", "18:00").unwrap(), 0);
    }
}
