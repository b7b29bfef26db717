use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title substituted for empty or missing input.
pub const DEFAULT_TITLE: &str = "Untitled Task";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Anything outside the allowed set falls back to `Pending`.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts ISO-8601 local timestamps (with or without fractional seconds)
/// and RFC 3339 timestamps, which are converted to local time.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    s.parse::<NaiveDateTime>().ok().or_else(|| {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Local).naive_local())
    })
}

fn validate_title(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_TITLE.to_string(),
    }
}

fn validate_status(status: Option<&str>) -> TaskStatus {
    status.map(TaskStatus::parse_or_default).unwrap_or_default()
}

fn validate_id(id: Option<&str>) -> Option<String> {
    id.filter(|s| s.parse::<u64>().is_ok()).map(str::to_string)
}

/// Inputs for constructing a [`Task`]. Every field is optional and is
/// validated by [`Task::new`].
#[derive(Debug, Clone, Default)]
pub struct TaskInit {
    pub title: Option<String>,
    pub status: Option<String>,
    pub completed: bool,
    pub id: Option<String>,
    pub due_date: Option<String>,
    pub reminder_time: Option<String>,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

impl TaskInit {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: Option<String>,
    title: String,
    status: TaskStatus,
    completed: bool,
    created_at: NaiveDateTime,
    completed_at: Option<NaiveDateTime>,
    due_date: Option<String>,
    reminder_time: Option<String>,
}

impl Task {
    /// Builds a task, substituting defaults for an empty title or unknown
    /// status. A supplied `id` that is not an integer is dropped and the
    /// task is left without one.
    pub fn new(init: TaskInit) -> Self {
        let status = validate_status(init.status.as_deref());
        let completed = init.completed || status == TaskStatus::Completed;
        let completed_at = match init.completed_at {
            None if completed => Some(now()),
            other => other,
        };

        Self {
            id: validate_id(init.id.as_deref()),
            title: validate_title(init.title.as_deref()),
            status,
            completed,
            created_at: init.created_at.unwrap_or_else(now),
            completed_at,
            due_date: init.due_date,
            reminder_time: init.reminder_time,
        }
    }

    pub fn from_record(record: &TaskRecord) -> Self {
        Self::new(TaskInit {
            title: record.title.clone(),
            status: record.status.clone(),
            completed: record.completed.unwrap_or(false),
            id: record.id.clone(),
            due_date: record.due_date.clone(),
            reminder_time: record.reminder_time.clone(),
            completed_at: record.completed_at.as_deref().and_then(parse_timestamp),
            created_at: record.created_at.as_deref().and_then(parse_timestamp),
        })
    }

    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id.clone(),
            title: Some(self.title.clone()),
            status: Some(self.status.as_str().to_string()),
            completed: Some(self.completed),
            created_at: Some(format_timestamp(&self.created_at)),
            due_date: self.due_date.clone(),
            reminder_time: self.reminder_time.clone(),
            completed_at: self.completed_at.as_ref().map(format_timestamp),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<NaiveDateTime> {
        self.completed_at
    }

    pub fn due_date(&self) -> Option<&str> {
        self.due_date.as_deref()
    }

    pub fn reminder_time(&self) -> Option<&str> {
        self.reminder_time.as_deref()
    }

    pub fn assign_id(&mut self, id: u64) {
        self.id = Some(id.to_string());
    }

    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
        self.completed = true;
        self.completed_at = Some(now());
    }

    /// Unknown status strings silently become `pending`.
    pub fn update_status(&mut self, new_status: &str) {
        self.set_status(TaskStatus::parse_or_default(new_status));
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        if status == TaskStatus::Completed {
            self.completed = true;
            if self.completed_at.is_none() {
                self.completed_at = Some(now());
            }
        } else {
            self.completed = false;
            self.completed_at = None;
        }
    }

    pub fn update_title(&mut self, new_title: &str) {
        self.title = validate_title(Some(new_title));
    }

    pub fn set_due_date(&mut self, due_date: Option<String>) {
        self.due_date = due_date;
    }

    pub fn set_reminder_time(&mut self, reminder_time: Option<String>) {
        self.reminder_time = reminder_time;
    }
}

/// Persisted, field-keyed form of a [`Task`]. Fields holding the wrong JSON
/// type deserialize as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reminder_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub completed_at: Option<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) if n.is_u64() => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => Some(b),
        _ => None,
    })
}
