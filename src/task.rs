//! Task model for tdo.
//!
//! A task is a titled item with a calendar-date deadline. The `overdue` flag
//! is a cached derived value: a task is overdue when it is incomplete and its
//! deadline lies strictly before the current moment. The deadline date is
//! anchored at midnight UTC, so a task due today counts as overdue once the
//! day has started, matching how deadlines are commonly displayed.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Schema version for the persisted aggregate.
pub const STATE_SCHEMA_VERSION: &str = "tdo.state.v1";

/// A single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub overdue: bool,
}

impl Task {
    /// Build a task from caller-supplied fields. The flags always start
    /// cleared; `overdue` is computed lazily, not at creation.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            deadline,
            completed: false,
            overdue: false,
        }
    }

    /// Whether this task counts as overdue at `now`, ignoring the cached flag.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.deadline.and_time(NaiveTime::MIN).and_utc() < now
    }

    /// Recompute the cached `overdue` flag from `now`.
    pub fn refresh_overdue(&mut self, now: DateTime<Utc>) {
        self.overdue = self.is_overdue_at(now);
    }

    /// Validate the fields a well-formed task must carry.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "task title cannot be empty".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "task description cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a deadline argument in ISO `YYYY-MM-DD` form.
pub fn parse_deadline(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!(
            "invalid deadline '{trimmed}' (expected YYYY-MM-DD)"
        ))
    })
}

/// Which subset of tasks a read should surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Incomplete,
    Overdue,
}

impl Filter {
    pub const ALL: [Filter; 4] = [
        Filter::All,
        Filter::Completed,
        Filter::Incomplete,
        Filter::Overdue,
    ];

    /// The predicate this filter applies; never mutates the task.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.completed,
            Filter::Incomplete => !task.completed,
            Filter::Overdue => task.overdue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Incomplete => "incomplete",
            Filter::Overdue => "overdue",
        }
    }

    /// The next filter in display order, wrapping around.
    pub fn cycled(&self) -> Filter {
        match self {
            Filter::All => Filter::Completed,
            Filter::Completed => Filter::Incomplete,
            Filter::Incomplete => Filter::Overdue,
            Filter::Overdue => Filter::All,
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "completed" | "done" => Ok(Filter::Completed),
            "incomplete" | "open" => Ok(Filter::Incomplete),
            "overdue" => Ok(Filter::Overdue),
            other => Err(Error::InvalidArgument(format!(
                "unknown filter '{other}' (expected all, completed, incomplete, or overdue)"
            ))),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the most recent remote load, if any. Transient: not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// The aggregate the store holds and the persistence adapter mirrors.
///
/// `status` and `error` describe the last remote-load request only; they are
/// reset on startup rather than round-tripped through the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodosState {
    pub items: Vec<Task>,
    #[serde(default)]
    pub filter: Filter,
    #[serde(skip)]
    pub status: LoadStatus,
    #[serde(skip)]
    pub error: Option<String>,
}
