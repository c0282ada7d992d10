use crate::form::{DeleteOutcome, Submission, TaskForm};
use crate::ports::{ConfirmPrompt, FormContext, Navigator, UuidGenerator, ALL_TASKS_PATH};
use crate::router::{Route, Router, CREATE_TASK_PATH};
use crate::store::TaskStore;
use crate::task::{Task, TaskStatus};
use crate::validation::Field;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

#[derive(Debug)]
pub enum Screen {
    Board,
    Form(TaskForm),
}

#[derive(Debug)]
pub struct App {
    store: TaskStore,
    router: Router,
    ids: UuidGenerator,
    screen: Screen,
    shown: Route,
    selected_status: usize,
    selected_task: usize,
    status_message: Option<String>,
}

impl App {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            router: Router::default(),
            ids: UuidGenerator,
            screen: Screen::Board,
            shown: Route::AllTasks,
            selected_status: 0,
            selected_task: 0,
            status_message: None,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn route(&self) -> &Route {
        self.router.current()
    }

    pub fn form(&self) -> Option<&TaskForm> {
        match &self.screen {
            Screen::Form(form) => Some(form),
            Screen::Board => None,
        }
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn selected_status(&self) -> usize {
        self.selected_status
    }

    pub fn selected_task(&self) -> usize {
        self.selected_task
    }

    pub fn selected_column(&self) -> TaskStatus {
        TaskStatus::ALL[self.selected_status]
    }

    pub fn selected(&self) -> Option<&Task> {
        self.store
            .tasks_by_status(self.selected_column())
            .get(self.selected_task)
            .copied()
    }

    /// Handles one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, confirm: &mut dyn ConfirmPrompt) -> bool {
        let quit = match self.screen {
            Screen::Board => self.handle_board_key(key),
            Screen::Form(_) => {
                self.handle_form_key(key, confirm);
                false
            }
        };
        self.sync_screen();
        quit
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('a') => self.router.go_to(CREATE_TASK_PATH),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(task) = self.selected() {
                    let path = Route::EditTask(task.id.clone()).path();
                    self.router.go_to(&path);
                }
            }
            KeyCode::Left => {
                if self.selected_status > 0 {
                    self.selected_status -= 1;
                    self.selected_task = 0;
                }
            }
            KeyCode::Right => {
                if self.selected_status < TaskStatus::ALL.len() - 1 {
                    self.selected_status += 1;
                    self.selected_task = 0;
                }
            }
            KeyCode::Up => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down => {
                let max_tasks = self.store.tasks_by_status(self.selected_column()).len();
                if self.selected_task + 1 < max_tasks {
                    self.selected_task += 1;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent, confirm: &mut dyn ConfirmPrompt) {
        let Screen::Form(form) = &mut self.screen else {
            return;
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let on_status = form.focused_field() == Field::Status;

        match key.code {
            KeyCode::Esc => self.router.go_to(ALL_TASKS_PATH),
            KeyCode::Char('r') if ctrl => form.reset(),
            KeyCode::Char('d') if ctrl => {
                let mut ctx = FormContext {
                    dispatch: &mut self.store,
                    navigator: &mut self.router,
                    ids: &mut self.ids,
                    confirm,
                };
                if let DeleteOutcome::Deleted(id) = form.delete_current(&mut ctx) {
                    self.status_message = Some(format!("Task {id} deleted"));
                }
            }
            KeyCode::Enter => {
                let mut ctx = FormContext {
                    dispatch: &mut self.store,
                    navigator: &mut self.router,
                    ids: &mut self.ids,
                    confirm,
                };
                match form.submit(&mut ctx) {
                    Ok(Submission::Created(task)) => {
                        self.status_message = Some(format!("Task \"{}\" created", task.title));
                    }
                    Ok(Submission::Updated(task)) => {
                        self.status_message = Some(format!("Task \"{}\" updated", task.title));
                    }
                    Err(err) => info!(error = %err, "submission blocked"),
                }
            }
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left if on_status => form.cycle_status(-1),
            KeyCode::Right | KeyCode::Char(' ') if on_status => form.cycle_status(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) if !ctrl => form.input_char(ch),
            _ => {}
        }
    }

    /// Rebuilds the screen when the router moved somewhere new.
    fn sync_screen(&mut self) {
        let route = self.router.current().clone();
        if route == self.shown {
            return;
        }
        self.screen = match &route {
            Route::AllTasks => {
                let column_len = self.store.tasks_by_status(self.selected_column()).len();
                self.selected_task = self.selected_task.min(column_len.saturating_sub(1));
                Screen::Board
            }
            Route::CreateTask => Screen::Form(TaskForm::create()),
            Route::EditTask(id) => Screen::Form(TaskForm::resolve(true, self.store.get(id))),
        };
        if route != Route::AllTasks {
            self.status_message = None;
        }
        self.shown = route;
    }
}
