//! Task scoring function.
//!
//! ```text
//! score = 1.0 * proximity(due, today)
//!       + 1.2 * max(1, impact)
//!       - 0.6 * ln(1 + max(1, effort_min))
//! ```
//!
//! Effort is penalized logarithmically so very long tasks are discouraged
//! without being excluded outright, while impact and proximity dominate
//! ranking for short-horizon deadlines.

use chrono::NaiveDate;

/// Weight for deadline proximity.
pub const W_DEADLINE: f64 = 1.0;
/// Weight for impact.
pub const W_IMPACT: f64 = 1.2;
/// Weight for the effort penalty.
pub const W_EFFORT: f64 = 0.6;

/// Urgency weight derived from days until the due date.
///
/// - no due date: 0.0
/// - overdue: 2.0
/// - due today: 1.8
/// - within 3 days: 1.5
/// - within 7 days: 1.0
/// - within 14 days: 0.6
/// - later: 0.3
pub fn proximity(due: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(due) = due else {
        return 0.0;
    };
    let days_left = (due - today).num_days();
    if days_left < 0 {
        2.0
    } else if days_left == 0 {
        1.8
    } else if days_left <= 3 {
        1.5
    } else if days_left <= 7 {
        1.0
    } else if days_left <= 14 {
        0.6
    } else {
        0.3
    }
}

/// Compute the score for one task, evaluated against `today`.
///
/// Impact and effort are floored at 1 before weighting, so out-of-range
/// stored values degrade instead of flipping the sign of a term.
pub fn score_task(impact: i64, effort_min: i64, due: Option<NaiveDate>, today: NaiveDate) -> f64 {
    W_DEADLINE * proximity(due, today) + W_IMPACT * (impact.max(1) as f64)
        - W_EFFORT * (1.0 + effort_min.max(1) as f64).ln()
}
