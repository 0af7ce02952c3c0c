//! # Daycoach Core Library
//!
//! This library provides the core business logic for Daycoach, a personal
//! productivity coaching backend. It implements a CLI-first philosophy where
//! all operations are available via a standalone CLI binary, with any future
//! front end being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Plan Engine**: Pure scoring and greedy selection of a short daily
//!   task shortlist under a minutes budget
//! - **Calendar**: Busy-interval algebra and free-time computation over a
//!   working window, fed by an ICS calendar feed
//! - **Coach**: Text generation behind a configurable capability with a
//!   deterministic rule-based fallback
//! - **Storage**: SQLite-based goal/task/reflection storage and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`pick_today_tasks`]: Daily task scorer and picker
//! - [`FreeTimeCalculator`]: Free-minutes computation for a work window
//! - [`CalendarFeed`]: ICS feed fetcher with defensive parsing
//! - [`Database`]: Goal, task, and reflection persistence
//! - [`Config`]: Application configuration management
//! - [`TextGenerator`]: AI-or-rule-based text generation capability

pub mod calendar;
pub mod coach;
pub mod error;
pub mod plan;
pub mod review;
pub mod runner;
pub mod storage;
pub mod task;
pub mod wbs;

pub use calendar::{
    free_minutes, merge_intervals, CalendarFeed, FreeTimeCalculator, TimeInterval, WorkWindow,
};
pub use coach::{coach_line_for_task, summarize_reflections, ReflectionDigest, TextGenerator};
pub use error::{CalendarError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use plan::{pick_today_tasks, ScoredTask};
pub use review::{generate_weekly_payload, jst_today, upsert_this_week, WeeklyReview};
pub use runner::{JobRunner, WeeklySchedule};
pub use storage::{Config, Database};
pub use task::{Goal, Reflection, Suggestion, Task, TaskStatus};
pub use wbs::{generate_wbs, WbsPlanRequest, WbsTask};
