pub mod app;
pub mod error;
pub mod form;
pub mod ports;
pub mod router;
pub mod store;
pub mod task;
pub mod ui;
pub mod validation;

pub use form::{DeleteOutcome, FormError, Submission, TaskForm};
pub use ports::{ConfirmPrompt, FormContext, IdGenerator, Navigator, TaskDispatch, ALL_TASKS_PATH};
pub use task::{Task, TaskStatus};
pub use validation::{validate, Field, FieldErrors, TaskDraft, TaskFields};
