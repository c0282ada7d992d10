use crate::task::{today, Task, TaskStatus};
use chrono::NaiveDate;
use std::{collections::BTreeMap, fmt};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Creator,
    Status,
    Description,
    CreatedAt,
}

impl Field {
    /// Form order.
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Creator,
        Field::Status,
        Field::Description,
        Field::CreatedAt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Creator => "creator",
            Field::Status => "status",
            Field::Description => "description",
            Field::CreatedAt => "createdat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Creator => "Creator",
            Field::Status => "Status",
            Field::Description => "Description",
            Field::CreatedAt => "Created at",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unsaved form values, kept as the text the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub creator: String,
    pub status: String,
    pub description: String,
    pub createdat: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            creator: String::new(),
            status: TaskStatus::New.as_str().to_string(),
            description: String::new(),
            createdat: today().format(DATE_FORMAT).to_string(),
        }
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            creator: task.creator.clone(),
            status: task.status.as_str().to_string(),
            description: task.description.clone(),
            createdat: task.createdat.format(DATE_FORMAT).to_string(),
        }
    }
}

impl TaskDraft {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Creator => &self.creator,
            Field::Status => &self.status,
            Field::Description => &self.description,
            Field::CreatedAt => &self.createdat,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Creator => &mut self.creator,
            Field::Status => &mut self.status,
            Field::Description => &mut self.description,
            Field::CreatedAt => &mut self.createdat,
        }
    }
}

/// The business fields of a task that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub creator: String,
    pub status: TaskStatus,
    pub description: String,
    pub createdat: NaiveDate,
}

impl TaskFields {
    pub fn with_id(self, id: String) -> Task {
        Task {
            id,
            title: self.title,
            creator: self.creator,
            status: self.status,
            description: self.description,
            createdat: self.createdat,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

fn required_text(errors: &mut FieldErrors, field: Field, value: &str, message: &str) {
    if value.is_empty() {
        errors.insert(field, message);
    }
}

/// Checks every field of `draft`, collecting one message per failing field.
pub fn validate(draft: &TaskDraft) -> Result<TaskFields, FieldErrors> {
    let mut errors = FieldErrors::default();

    required_text(&mut errors, Field::Title, &draft.title, "Please input title");
    required_text(&mut errors, Field::Creator, &draft.creator, "Please input creator");
    required_text(
        &mut errors,
        Field::Description,
        &draft.description,
        "Please input description",
    );

    let status = if draft.status.is_empty() {
        errors.insert(Field::Status, "Status is required");
        None
    } else {
        match draft.status.parse::<TaskStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                errors.insert(
                    Field::Status,
                    "status must be one of the following values: NEW, DOING, DONE",
                );
                None
            }
        }
    };

    let createdat = if draft.createdat.is_empty() {
        errors.insert(Field::CreatedAt, "Created at is required");
        None
    } else {
        match NaiveDate::parse_from_str(draft.createdat.trim(), DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.insert(Field::CreatedAt, "Created at must be a valid date");
                None
            }
        }
    };

    match (status, createdat) {
        (Some(status), Some(createdat)) if errors.is_empty() => Ok(TaskFields {
            title: draft.title.clone(),
            creator: draft.creator.clone(),
            status,
            description: draft.description.clone(),
            createdat,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> TaskDraft {
        TaskDraft {
            title: "Buy milk".to_string(),
            creator: "Alice".to_string(),
            status: "NEW".to_string(),
            description: "2%".to_string(),
            createdat: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn accepts_a_complete_draft_unchanged() {
        let fields = validate(&valid_draft()).unwrap();
        assert_eq!(fields.title, "Buy milk");
        assert_eq!(fields.creator, "Alice");
        assert_eq!(fields.status, TaskStatus::New);
        assert_eq!(fields.description, "2%");
        assert_eq!(fields.createdat, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn each_required_text_field_reports_its_own_message() {
        let cases = [
            (Field::Title, "Please input title"),
            (Field::Creator, "Please input creator"),
            (Field::Description, "Please input description"),
        ];
        for (field, message) in cases {
            let mut draft = valid_draft();
            draft.value_mut(field).clear();
            let errors = validate(&draft).unwrap_err();
            assert_eq!(errors.len(), 1, "{field}");
            assert_eq!(errors.get(field), Some(message));
        }
    }

    #[test]
    fn whitespace_only_text_is_accepted_unchanged() {
        let mut draft = valid_draft();
        draft.title = " ".to_string();
        draft.creator = "  Alice ".to_string();
        let fields = validate(&draft).unwrap();
        assert_eq!(fields.title, " ");
        assert_eq!(fields.creator, "  Alice ");
    }

    #[test]
    fn collects_errors_for_every_failing_field() {
        let draft = TaskDraft {
            title: String::new(),
            creator: String::new(),
            status: String::new(),
            description: String::new(),
            createdat: String::new(),
        };
        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(Field::Status), Some("Status is required"));
        assert_eq!(errors.get(Field::CreatedAt), Some("Created at is required"));
        assert_eq!(errors.to_string(), "5 field(s) failed validation");
    }

    #[test]
    fn rejects_status_outside_the_enumeration() {
        for status in ["ARCHIVED", "new", "Done "] {
            let mut draft = valid_draft();
            draft.status = status.to_string();
            let errors = validate(&draft).unwrap_err();
            assert_eq!(
                errors.get(Field::Status),
                Some("status must be one of the following values: NEW, DOING, DONE")
            );
        }
    }

    #[test]
    fn rejects_impossible_dates() {
        for date in ["2024-02-30", "yesterday", "01/01/2024"] {
            let mut draft = valid_draft();
            draft.createdat = date.to_string();
            let errors = validate(&draft).unwrap_err();
            assert_eq!(
                errors.get(Field::CreatedAt),
                Some("Created at must be a valid date")
            );
        }
    }

    #[test]
    fn default_draft_needs_only_text_fields() {
        let errors = validate(&TaskDraft::default()).unwrap_err();
        let failing: Vec<Field> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(failing, vec![Field::Title, Field::Creator, Field::Description]);
    }
}
