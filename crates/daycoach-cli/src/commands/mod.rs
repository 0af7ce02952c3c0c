pub mod calendar;
pub mod config;
pub mod goal;
pub mod plan;
pub mod reflect;
pub mod review;
pub mod task;
pub mod wbs;

use chrono::NaiveDate;

/// Parse a YYYY-MM-DD argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}
