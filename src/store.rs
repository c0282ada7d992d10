use crate::error::{AppError, Result};
use crate::ports::TaskDispatch;
use crate::task::{Task, TaskStatus};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

/// In-memory task list mirrored to a JSON file after every change.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tasks: Vec::new(),
        }
    }

    /// Opens the store at `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(path);
        if !store.path.exists() {
            info!(path = %store.path.display(), "no task store yet, starting empty");
            return Ok(store);
        }
        let data = fs::read_to_string(&store.path).map_err(|source| AppError::ReadStore {
            path: store.path.clone(),
            source,
        })?;
        if !data.trim().is_empty() {
            store.tasks =
                serde_json::from_str(&data).map_err(|source| AppError::DecodeStore {
                    path: store.path.clone(),
                    source,
                })?;
        }
        info!(path = %store.path.display(), count = store.tasks.len(), "task store loaded");
        Ok(store)
    }

    pub fn save(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.tasks)?;
        fs::write(&self.path, data).map_err(|source| AppError::WriteStore {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            error!(error = %err, "failed to save tasks");
        }
    }
}

impl TaskDispatch for TaskStore {
    fn create_task(&mut self, task: Task) {
        info!(task_id = %task.id, title = %task.title, "task created");
        self.tasks.push(task);
        self.persist();
    }

    fn update_task(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                info!(task_id = %task.id, "task updated");
                *existing = task;
            }
            None => {
                warn!(task_id = %task.id, "updated task was not in the store, adding it");
                self.tasks.push(task);
            }
        }
        self.persist();
    }

    fn delete_task_by_id(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            warn!(task_id = %id, "delete requested for unknown task");
        } else {
            info!(task_id = %id, "task deleted");
        }
        self.persist();
    }
}
