//! Property tests for the interval merge and the free-time calculator.

use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

use daycoach_core::calendar::{merge_intervals, FreeTimeCalculator, TimeInterval, WorkWindow};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
}

/// Build an interval from minute offsets into the day.
fn span(start_min: i64, end_min: i64) -> TimeInterval {
    let base = WorkWindow::new(
        day(),
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(0, 1, 0).unwrap(),
    )
    .start_at();
    TimeInterval::new(
        base + chrono::Duration::minutes(start_min),
        base + chrono::Duration::minutes(end_min),
    )
    .expect("start < end")
}

fn arb_spans() -> impl Strategy<Value = Vec<TimeInterval>> {
    proptest::collection::vec((0i64..1380, 1i64..180), 0..16).prop_map(|raw| {
        raw.into_iter()
            .map(|(start, len)| span(start, start + len))
            .collect()
    })
}

/// Minute-resolution coverage over a generous range around the day.
fn coverage(spans: &[TimeInterval]) -> Vec<bool> {
    let base = span(0, 1).start;
    let mut covered = vec![false; 1700];
    for s in spans {
        let from = (s.start - base).num_minutes().max(0) as usize;
        let to = ((s.end - base).num_minutes().max(0) as usize).min(covered.len());
        for slot in covered.iter_mut().take(to).skip(from) {
            *slot = true;
        }
    }
    covered
}

proptest! {
    #[test]
    fn merged_is_sorted_and_disjoint(spans in arb_spans()) {
        let merged = merge_intervals(spans);
        for pair in merged.windows(2) {
            // Strictly increasing and non-overlapping; adjacent spans have
            // been coalesced, so a strict gap separates entries.
            prop_assert!(pair[1].start > pair[0].end);
        }
        for s in &merged {
            prop_assert!(s.start < s.end);
        }
    }

    #[test]
    fn merge_preserves_coverage(spans in arb_spans()) {
        let merged = merge_intervals(spans.clone());
        prop_assert_eq!(coverage(&spans), coverage(&merged));
    }

    #[test]
    fn merge_is_idempotent(spans in arb_spans()) {
        let once = merge_intervals(spans);
        let twice = merge_intervals(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn free_minutes_bounds_and_granularity(
        spans in arb_spans(),
        block in prop_oneof![Just(1i64), Just(5), Just(15), Just(30), Just(60)],
    ) {
        let window = WorkWindow::from_hhmm(day(), "09:00", "18:00").unwrap();
        let free = FreeTimeCalculator::new()
            .with_min_block(block)
            .free_minutes(&spans, &window);

        prop_assert!(free >= 0);
        prop_assert!(free <= window.total_minutes());
        prop_assert_eq!(free % block, 0);
    }

    #[test]
    fn more_busy_time_never_increases_free_time(
        spans in arb_spans(),
        extra_start in 0i64..1380,
        extra_len in 1i64..180,
    ) {
        let window = WorkWindow::from_hhmm(day(), "09:00", "18:00").unwrap();
        let calc = FreeTimeCalculator::new();
        let base_free = calc.free_minutes(&spans, &window);

        let mut more = spans;
        more.push(span(extra_start, extra_start + extra_len));
        prop_assert!(calc.free_minutes(&more, &window) <= base_free);
    }

    #[test]
    fn degenerate_window_is_always_zero(spans in arb_spans()) {
        let inverted = WorkWindow::from_hhmm(day(), "18:00", "09:00").unwrap();
        let empty = WorkWindow::from_hhmm(day(), "09:00", "09:00").unwrap();
        let calc = FreeTimeCalculator::new();
        prop_assert_eq!(calc.free_minutes(&spans, &inverted), 0);
        prop_assert_eq!(calc.free_minutes(&spans, &empty), 0);
    }
}
