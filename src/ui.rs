use crate::app::{App, Screen};
use crate::form::TaskForm;
use crate::ports::ConfirmPrompt;
use crate::task::TaskStatus;
use crate::validation::Field;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use tracing::warn;

/// Switches to raw mode and the alternate screen, then runs the event loop.
/// The terminal is restored on every exit path, including failed setup.
pub fn run_in_terminal(app: &mut App) -> io::Result<()> {
    let result = enable_raw_mode()
        .and_then(|()| execute!(io::stdout(), EnterAlternateScreen))
        .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())))
        .and_then(|mut terminal| run_app(&mut terminal, app));
    let restored = restore_terminal();
    result.and(restored)
}

/// Runs every teardown step even if an earlier one fails.
pub fn restore_terminal() -> io::Result<()> {
    first_error([
        disable_raw_mode(),
        execute!(io::stdout(), LeaveAlternateScreen),
        execute!(io::stdout(), Show),
    ])
}

fn first_error(steps: impl IntoIterator<Item = io::Result<()>>) -> io::Result<()> {
    steps.into_iter().fold(Ok(()), |acc, step| acc.and(step))
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let backdrop = app.form().cloned();
            let mut prompt = TerminalConfirm {
                terminal: &mut *terminal,
                backdrop,
            };
            if app.handle_key(key, &mut prompt) {
                return Ok(());
            }
        }
    }
}

/// Modal yes/no dialog drawn over the form; blocks until answered.
struct TerminalConfirm<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    backdrop: Option<TaskForm>,
}

impl<B: Backend> ConfirmPrompt for TerminalConfirm<'_, B> {
    fn confirm(&mut self, message: &str) -> bool {
        loop {
            let drawn = self.terminal.draw(|f| {
                let area = f.area();
                if let Some(form) = &self.backdrop {
                    render_form(f, area, form);
                }
                render_confirm(f, area, message);
            });
            if let Err(err) = drawn {
                warn!(error = %err, "failed to draw confirmation, treating as declined");
                return false;
            }
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => return true,
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return false,
                    _ => {}
                },
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "failed to read confirmation, treating as declined");
                    return false;
                }
            }
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    match app.screen() {
        Screen::Board => render_board(f, chunks[0], app),
        Screen::Form(form) => render_form(f, chunks[0], form),
    }

    let help = match app.screen() {
        Screen::Board => "←/→ column  ↑/↓ task  a add  Enter edit  q quit",
        Screen::Form(_) => "Tab/↑↓ field  Enter submit  Ctrl-R reset  Ctrl-D delete  Esc back",
    };
    let mut spans = vec![Span::styled(help, Style::default().fg(Color::DarkGray))];
    if let Some(message) = app.status_message() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(message, Style::default().fg(Color::Green)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
}

fn render_board(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    for (i, status) in TaskStatus::ALL.iter().enumerate() {
        let tasks = app.store().tasks_by_status(*status);
        let items: Vec<ListItem> = tasks
            .iter()
            .enumerate()
            .map(|(row, t)| {
                let short_id: String = t.id.chars().take(8).collect();
                let title_style = if app.selected_status() == i && app.selected_task() == row {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("[#{}] ", short_id)),
                    Span::styled(t.title.as_str(), title_style),
                    Span::raw(format!(" ({}, {})", t.creator, t.createdat)),
                ]))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(status.as_str())
                .borders(Borders::ALL)
                .border_style(if app.selected_status() == i {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }),
        );

        f.render_widget(list, chunks[i]);
    }
}

pub fn render_form(f: &mut Frame, area: Rect, form: &TaskForm) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", form.heading()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let focused = form.focused_field();
    let mut content = vec![Line::from("")];

    for field in form.visible_fields() {
        let label_style = if field == focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut spans = vec![Span::styled(format!("{:<13}", field.label()), label_style)];
        if field == Field::Status {
            spans.extend(status_options(&form.draft().status));
        } else {
            spans.push(Span::raw(form.draft().value(field)));
            if field == focused {
                spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
            }
        }
        content.push(Line::from(spans));

        if let Some(message) = form.errors().get(field) {
            content.push(Line::from(Span::styled(
                format!("{:<13}{}", "", message),
                Style::default().fg(Color::Red),
            )));
        }
        content.push(Line::from(""));
    }

    let mut actions = vec![
        Span::styled(
            format!("[Enter] {}", form.submit_label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled("[Ctrl-R] Reset", Style::default().fg(Color::Gray)),
    ];
    if form.can_delete() {
        actions.push(Span::raw("  "));
        actions.push(Span::styled(
            "[Ctrl-D] Delete",
            Style::default().fg(Color::White).bg(Color::Red),
        ));
    }
    content.push(Line::from(actions));

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn status_options(raw: &str) -> Vec<Span<'static>> {
    let current = raw.parse::<TaskStatus>().ok();
    TaskStatus::ALL
        .iter()
        .map(|status| {
            if current == Some(*status) {
                Span::styled(
                    format!("(•) {}  ", status.label()),
                    Style::default().fg(Color::Yellow),
                )
            } else {
                Span::raw(format!("( ) {}  ", status.label()))
            }
        })
        .collect()
}

pub fn render_confirm(f: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(60, 30, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Confirm ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[y] ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Yes  "),
            Span::styled(
                "[n] ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("No"),
        ]),
    ];

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TaskDispatch;
    use crate::store::TaskStore;
    use crate::task::Task;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use tempfile::tempdir;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sample_task() -> Task {
        Task {
            id: "0123456789".to_string(),
            title: "Buy milk".to_string(),
            creator: "Alice".to_string(),
            status: TaskStatus::Doing,
            description: "2%".to_string(),
            createdat: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn board_lists_tasks_under_their_status() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::new(dir.path().join("tasks.json"));
        store.create_task(sample_task());
        let app = App::new(store);

        let mut terminal = Terminal::new(TestBackend::new(150, 12)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("NEW"));
        assert!(text.contains("DOING"));
        assert!(text.contains("DONE"));
        assert!(text.contains("[#01234567] Buy milk (Alice, 2024-01-01)"));
    }

    #[test]
    fn create_form_hides_status_and_shows_errors() {
        let mut form = TaskForm::create();
        let _ = form.validate();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| render_form(f, f.area(), &form))
            .unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Create New Task"));
        assert!(!text.contains("Status"));
        assert!(text.contains("Please input title"));
        assert!(text.contains("Please input creator"));
        assert!(text.contains("[Enter] Save"));
        assert!(!text.contains("Delete"));
    }

    #[test]
    fn edit_form_shows_status_selector_and_delete() {
        let form = TaskForm::edit(&sample_task());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| render_form(f, f.area(), &form))
            .unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Edit Task"));
        assert!(text.contains("(•) Doing"));
        assert!(text.contains("[Enter] Update"));
        assert!(text.contains("[Ctrl-D] Delete"));
    }

    #[test]
    fn teardown_reports_the_first_failing_step() {
        let err = first_error([
            Ok(()),
            Err(io::Error::new(io::ErrorKind::Other, "raw mode")),
            Err(io::Error::new(io::ErrorKind::Other, "alternate screen")),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "raw mode");
        assert!(first_error([Ok(()), Ok(())]).is_ok());
    }

    #[test]
    fn confirm_dialog_shows_the_message() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|f| render_confirm(f, f.area(), "Delete it?"))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Delete it?"));
        assert!(text.contains("[y] Yes"));
    }
}
