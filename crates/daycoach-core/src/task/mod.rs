//! Domain types for goals, tasks, and reflections.
//!
//! A goal exclusively owns its tasks: deleting a goal cascades to them at
//! the storage layer. Tasks carry the three fields the plan engine scores
//! on (impact, effort, due date) plus a simple three-state status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Effort assumed when a task has no usable estimate, in minutes.
pub const DEFAULT_EFFORT_MIN: i64 = 30;

/// Task status enumeration.
///
/// Unlike a timer lifecycle there is no transition table here: the user may
/// move a task between any of the three states. `Done` tasks are excluded
/// from planning queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started yet (initial state)
    Pending,
    /// Currently being worked on
    Doing,
    /// Finished; never scored or picked
    Done,
}

impl TaskStatus {
    /// Parse from the storage representation. Unknown strings fall back to
    /// `Pending` so one bad row never poisons a listing.
    pub fn parse(s: &str) -> Self {
        match s {
            "doing" => TaskStatus::Doing,
            "done" => TaskStatus::Done,
            _ => TaskStatus::Pending,
        }
    }

    /// Strict variant of [`parse`](Self::parse) for user input.
    pub fn try_parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "doing" => Ok(TaskStatus::Doing),
            "done" => Ok(TaskStatus::Done),
            _ => Err(ValidationError::UnknownValue {
                field: "status",
                value: s.to_string(),
            }),
        }
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task under a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub goal_id: i64,
    pub title: String,
    pub status: TaskStatus,
    /// Contribution to the goal, 1 (low) to 5 (high)
    pub impact: i64,
    /// Estimated minutes to complete, 1 to 600
    pub effort_min: i64,
    pub due: Option<NaiveDate>,
    pub parent_task_id: Option<i64>,
}

impl Task {
    /// Effort used by the planner: the estimate, or
    /// [`DEFAULT_EFFORT_MIN`] when the estimate is zero or negative.
    pub fn planning_effort_min(&self) -> i64 {
        if self.effort_min > 0 {
            self.effort_min
        } else {
            DEFAULT_EFFORT_MIN
        }
    }
}

/// A goal owning a set of tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    /// Why this goal matters to the user
    pub why: String,
    /// Key goal indicator -- the measurable outcome
    pub kgi: String,
    pub deadline: Option<NaiveDate>,
    pub area: String,
    pub created_at: DateTime<Utc>,
}

/// A daily reflection note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflection {
    pub id: i64,
    pub date: NaiveDate,
    pub text: String,
    /// Mood 1 (low) to 5 (high)
    pub mood: i64,
    pub created_at: DateTime<Utc>,
}

/// A stored coaching suggestion, e.g. the weekly review payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub date: NaiveDate,
    /// Suggestion kind; currently only "weekly"
    pub kind: String,
    /// Serialized payload
    pub content_json: String,
}

/// Validated input for creating a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDraft {
    pub title: String,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub kgi: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default = "default_area")]
    pub area: String,
}

fn default_area() -> String {
    "general".to_string()
}

impl GoalDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            why: String::new(),
            kgi: String::new(),
            deadline: None,
            area: default_area(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

/// Validated input for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default = "default_impact")]
    pub impact: i64,
    #[serde(default = "default_effort")]
    pub effort_min: i64,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub parent_task_id: Option<i64>,
}

fn default_impact() -> i64 {
    1
}

fn default_effort() -> i64 {
    DEFAULT_EFFORT_MIN
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: TaskStatus::Pending,
            impact: default_impact(),
            effort_min: default_effort(),
            due: None,
            parent_task_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_range("impact", self.impact, 1, 5)?;
        validate_range("effort_min", self.effort_min, 1, 600)?;
        Ok(())
    }
}

/// Validated input for recording a reflection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionDraft {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_mood")]
    pub mood: i64,
}

fn default_mood() -> i64 {
    3
}

impl ReflectionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.chars().count() > 4000 {
            return Err(ValidationError::LengthOutOfRange {
                field: "text",
                min: 0,
                max: 4000,
            });
        }
        validate_range("mood", self.mood, 1, 5)
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if len == 0 || len > 200 {
        return Err(ValidationError::LengthOutOfRange {
            field: "title",
            min: 1,
            max: 200,
        });
    }
    Ok(())
}

fn validate_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for status in [TaskStatus::Pending, TaskStatus::Doing, TaskStatus::Done] {
            assert_eq!(TaskStatus::parse(status.as_str()), status);
            assert_eq!(TaskStatus::try_parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn status_parse_is_lenient_try_parse_is_not() {
        assert_eq!(TaskStatus::parse("garbage"), TaskStatus::Pending);
        assert!(TaskStatus::try_parse("garbage").is_err());
    }

    #[test]
    fn task_serialization() {
        let task = Task {
            id: 1,
            goal_id: 2,
            title: "Write outline".to_string(),
            status: TaskStatus::Doing,
            impact: 4,
            effort_min: 45,
            due: NaiveDate::from_ymd_opt(2025, 9, 20),
            parent_task_id: None,
        };

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"doing\""));
        let decoded: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.impact, 4);
    }

    #[test]
    fn planning_effort_falls_back() {
        let mut task = Task {
            id: 1,
            goal_id: 1,
            title: "t".to_string(),
            status: TaskStatus::Pending,
            impact: 1,
            effort_min: 0,
            due: None,
            parent_task_id: None,
        };
        assert_eq!(task.planning_effort_min(), DEFAULT_EFFORT_MIN);
        task.effort_min = 45;
        assert_eq!(task.planning_effort_min(), 45);
    }

    #[test]
    fn draft_validation_bounds() {
        let mut draft = TaskDraft::new("Write outline");
        assert!(draft.validate().is_ok());

        draft.impact = 6;
        assert!(draft.validate().is_err());
        draft.impact = 5;
        draft.effort_min = 601;
        assert!(draft.validate().is_err());

        let empty = TaskDraft::new("");
        assert!(empty.validate().is_err());

        let long = GoalDraft::new("x".repeat(201));
        assert!(long.validate().is_err());
    }
}
