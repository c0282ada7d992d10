use crate::ports::{FormContext, ALL_TASKS_PATH};
use crate::task::{Task, TaskStatus};
use crate::validation::{self, Field, FieldErrors, TaskDraft, TaskFields};
use thiserror::Error;
use tracing::debug;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("task form is invalid: {0}")]
    Invalid(#[from] FieldErrors),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Created(Task),
    Updated(Task),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(String),
    Declined,
    /// Not in edit mode, or the loaded record has no id.
    Unavailable,
}

/// Draft state for the create/edit task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    is_edit: bool,
    editing: bool,
    current_id: Option<String>,
    initial: TaskDraft,
    draft: TaskDraft,
    errors: FieldErrors,
    focused: usize,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::resolve(false, None)
    }
}

impl TaskForm {
    pub fn create() -> Self {
        Self::resolve(false, None)
    }

    pub fn edit(task: &Task) -> Self {
        Self::resolve(true, Some(task))
    }

    /// Picks create or edit behaviour. The draft is loaded from
    /// `current_task` only when `is_edit` is set and a record is given.
    pub fn resolve(is_edit: bool, current_task: Option<&Task>) -> Self {
        let (draft, editing) = match current_task {
            Some(task) if is_edit => (TaskDraft::from(task), true),
            _ => (TaskDraft::default(), false),
        };
        let current_id = current_task.map(|task| task.id.clone());
        Self {
            is_edit,
            editing,
            current_id,
            initial: draft.clone(),
            draft,
            errors: FieldErrors::default(),
            focused: 0,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.is_edit
    }

    /// True once a record has been loaded; gates the status selector.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn can_delete(&self) -> bool {
        self.is_edit && self.current_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn heading(&self) -> &'static str {
        if self.is_edit {
            "Edit Task"
        } else {
            "Create New Task"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit {
            "Update"
        } else {
            "Save"
        }
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn visible_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| *field != Field::Status || self.editing)
            .collect()
    }

    pub fn focused_field(&self) -> Field {
        let fields = self.visible_fields();
        fields[self.focused.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.visible_fields().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.visible_fields().len();
        self.focused = (self.focused + len - 1) % len;
    }

    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        *self.draft.value_mut(field) = value.into();
    }

    /// Appends to the focused text field. The status selector ignores typing.
    pub fn input_char(&mut self, ch: char) {
        let field = self.focused_field();
        if field != Field::Status {
            self.draft.value_mut(field).push(ch);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused_field();
        if field != Field::Status {
            self.draft.value_mut(field).pop();
        }
    }

    /// Moves the status selector; an unrecognised value snaps to `NEW`.
    pub fn cycle_status(&mut self, direction: isize) {
        let next = match self.draft.status.parse::<TaskStatus>() {
            Ok(status) => status.step(direction),
            Err(_) => TaskStatus::New,
        };
        self.draft.status = next.as_str().to_string();
    }

    /// Validates the draft, storing the errors for display.
    pub fn validate(&mut self) -> Result<TaskFields, FieldErrors> {
        match validation::validate(&self.draft) {
            Ok(fields) => {
                self.errors = FieldErrors::default();
                Ok(fields)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    pub fn submit(&mut self, ctx: &mut FormContext<'_>) -> Result<Submission, FormError> {
        let fields = self.validate()?;

        let submission = if self.is_edit {
            let id = self
                .current_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| ctx.ids.next_id());
            let task = fields.with_id(id);
            debug!(task_id = %task.id, "dispatching task update");
            ctx.dispatch.update_task(task.clone());
            Submission::Updated(task)
        } else {
            let task = fields.with_id(ctx.ids.next_id());
            debug!(task_id = %task.id, "dispatching task creation");
            ctx.dispatch.create_task(task.clone());
            Submission::Created(task)
        };

        ctx.navigator.go_to(ALL_TASKS_PATH);
        Ok(submission)
    }

    pub fn delete_current(&mut self, ctx: &mut FormContext<'_>) -> DeleteOutcome {
        if !self.can_delete() {
            return DeleteOutcome::Unavailable;
        }
        let Some(id) = self.current_id.clone() else {
            return DeleteOutcome::Unavailable;
        };
        if !ctx.confirm.confirm(DELETE_PROMPT) {
            debug!(task_id = %id, "task deletion declined");
            return DeleteOutcome::Declined;
        }
        debug!(task_id = %id, "dispatching task deletion");
        ctx.dispatch.delete_task_by_id(&id);
        ctx.navigator.go_to(ALL_TASKS_PATH);
        DeleteOutcome::Deleted(id)
    }

    /// Restores the values the form was initialised with and clears errors.
    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
        self.errors = FieldErrors::default();
    }
}
