use crate::ports::{Navigator, ALL_TASKS_PATH};
use tracing::{debug, warn};

pub const CREATE_TASK_PATH: &str = "/create-task";
const EDIT_TASK_PREFIX: &str = "/edit-task/";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    AllTasks,
    CreateTask,
    EditTask(String),
}

impl Route {
    /// Unknown paths fall back to the task list.
    pub fn parse(path: &str) -> Self {
        match path {
            ALL_TASKS_PATH | "/" => Route::AllTasks,
            CREATE_TASK_PATH => Route::CreateTask,
            _ => match path.strip_prefix(EDIT_TASK_PREFIX) {
                Some(id) if !id.is_empty() => Route::EditTask(id.to_string()),
                _ => {
                    warn!(path, "unknown route, showing all tasks");
                    Route::AllTasks
                }
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::AllTasks => ALL_TASKS_PATH.to_string(),
            Route::CreateTask => CREATE_TASK_PATH.to_string(),
            Route::EditTask(id) => format!("{EDIT_TASK_PREFIX}{id}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Router {
    current: Route,
}

impl Router {
    pub fn new(route: Route) -> Self {
        Self { current: route }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }
}

impl Navigator for Router {
    fn go_to(&mut self, path: &str) {
        let route = Route::parse(path);
        debug!(from = %self.current.path(), to = %route.path(), "navigating");
        self.current = route;
    }
}
