//! Collaborators the task form talks to. The form never owns them; callers
//! hand them in through a [`FormContext`] for each operation.

use crate::task::Task;
use uuid::Uuid;

/// Path of the task list view.
pub const ALL_TASKS_PATH: &str = "/all-task";

/// Write-only sink for task commands. Results are not reported back.
pub trait TaskDispatch {
    fn create_task(&mut self, task: Task);
    fn update_task(&mut self, task: Task);
    fn delete_task_by_id(&mut self, id: &str);
}

pub trait Navigator {
    fn go_to(&mut self, path: &str);
}

pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Yes/no dialog. Returns `true` only on an explicit yes.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

pub struct FormContext<'a> {
    pub dispatch: &'a mut dyn TaskDispatch,
    pub navigator: &'a mut dyn Navigator,
    pub ids: &'a mut dyn IdGenerator,
    pub confirm: &'a mut dyn ConfirmPrompt,
}
