//! Busy time intervals and the merge pass.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A busy span on a single calendar day. `start < end` always holds; the
/// constructor refuses empty or inverted spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeInterval {
    /// Create a new interval, or `None` when the span is empty or inverted.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Whole minutes covered, truncated.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Clip to `[lo, hi]`, dropping the interval when nothing remains.
    pub fn clip(&self, lo: DateTime<FixedOffset>, hi: DateTime<FixedOffset>) -> Option<Self> {
        Self::new(self.start.max(lo), self.end.min(hi))
    }

    /// Whether this interval overlaps `[lo, hi]` at all.
    pub fn overlaps(&self, lo: DateTime<FixedOffset>, hi: DateTime<FixedOffset>) -> bool {
        self.end > lo && self.start < hi
    }
}

/// Merge overlapping intervals into a sorted, disjoint sequence.
///
/// Sorts by start, then walks the list: an interval opens a new entry only
/// when its start lies strictly past the last entry's end; otherwise the
/// last entry's end is extended. An interval starting exactly where the
/// previous one ends therefore coalesces into it -- a policy choice, not an
/// accident (minute totals downstream are identical either way).
///
/// Idempotent: merging a merged list is a no-op.
pub fn merge_intervals(mut spans: Vec<TimeInterval>) -> Vec<TimeInterval> {
    spans.sort_by_key(|s| s.start);
    let mut merged: Vec<TimeInterval> = Vec::new();
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => {
                if span.end > last.end {
                    last.end = span.end;
                }
            }
            _ => merged.push(span),
        }
    }
    merged
}
