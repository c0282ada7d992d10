use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    New,
    Doing,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::New, TaskStatus::Doing, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::New => "NEW",
            TaskStatus::Doing => "DOING",
            TaskStatus::Done => "DONE",
        }
    }

    /// Label used by the status selector.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::New => "New",
            TaskStatus::Doing => "Doing",
            TaskStatus::Done => "Done",
        }
    }

    pub fn index(self) -> usize {
        match self {
            TaskStatus::New => 0,
            TaskStatus::Doing => 1,
            TaskStatus::Done => 2,
        }
    }

    /// Steps through the statuses, clamping at both ends.
    pub fn step(self, direction: isize) -> Self {
        let index = (self.index() as isize + direction).clamp(0, Self::ALL.len() as isize - 1);
        Self::ALL[index as usize]
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(TaskStatus::New),
            "DOING" => Ok(TaskStatus::Doing),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub creator: String,
    pub status: TaskStatus,
    pub description: String,
    // Records written without a creation date are treated as created today.
    #[serde(default = "today")]
    pub createdat: NaiveDate,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
