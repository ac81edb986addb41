use crate::error::AppError;
use crate::observable::{Observable, PropertyObservers};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Property names a [`Task`] reports through its observers.
pub mod property {
    pub const TITLE: &str = "title";
    pub const STATUS: &str = "status";
}

/// Identifier assigned by the controller. Never reused, so it doubles as the
/// identity of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| AppError::invalid_input(format!("invalid task id '{trimmed}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    Completed,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Completed,
            Self::Completed => Self::Active,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "open" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(AppError::invalid_input(format!("unknown status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "l" => Ok(Self::Low),
            "medium" | "med" | "m" => Ok(Self::Medium),
            "high" | "h" => Ok(Self::High),
            other => Err(AppError::invalid_input(format!("unknown priority '{other}'"))),
        }
    }
}

/// One unit of work.
///
/// Only the controller creates tasks, which is where identifiers are
/// assigned. `id` and `created_at` are fixed at creation; every other field
/// changes through a setter that notifies observers.
#[derive(Debug, Serialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(skip)]
    observers: PropertyObservers,
}

impl Task {
    pub(crate) fn new(
        id: TaskId,
        title: String,
        description: String,
        priority: TaskPriority,
        status: TaskStatus,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            title,
            description,
            status,
            priority,
            created_at,
            observers: PropertyObservers::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub(crate) fn set_title(&mut self, title: String) -> bool {
        self.observers
            .set_property(&mut self.title, title, property::TITLE)
    }

    pub(crate) fn set_status(&mut self, status: TaskStatus) -> bool {
        self.observers
            .set_property(&mut self.status, status, property::STATUS)
    }
}

impl Observable for Task {
    fn observers_mut(&mut self) -> &mut PropertyObservers {
        &mut self.observers
    }
}
