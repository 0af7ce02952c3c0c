//! Daily plan engine: scoring and shortlist selection.
//!
//! Both halves are pure functions over their inputs. Scoring weighs
//! deadline proximity, impact, and a logarithmic effort penalty; selection
//! greedily fills a minutes budget with at most [`MAX_PICKS`] tasks.

mod picker;
mod score;

pub use picker::{pick_today_tasks, ScoredTask, MAX_PICKS};
pub use score::{proximity, score_task, W_DEADLINE, W_EFFORT, W_IMPACT};
