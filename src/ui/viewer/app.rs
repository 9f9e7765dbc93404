//! Interactive viewer: list + details over the task store.
//!
//! All mutations go through the injected store; the viewer also re-reads the
//! snapshot when the state file changes on disk, so edits from another tdo
//! process show up while the viewer is open.

use std::io::{self, Write};
use std::process::Command;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::store::TodoStore;
use crate::task::{Filter, Task};

use super::editor::{EditorAction, EditorState};
use super::model;
use super::view;

const EVENT_POLL_MS: u64 = 120;
const WATCH_DEBOUNCE_MS: u64 = 200;
const STATUS_TTL_MS: u64 = 4000;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: String,
    pub(crate) title: String,
}

/// A request the key handler cannot satisfy without the terminal.
enum AppRequest {
    OpenExternalEditor,
}

pub struct AppState {
    pub(crate) store: TodoStore,
    storage: Storage,
    pub(crate) selected: Option<usize>,
    pub(crate) editor: Option<EditorState>,
    pub(crate) delete_confirm: Option<DeleteConfirmState>,
    pub(crate) status: Option<(StatusKind, String, Instant)>,
    should_quit: bool,
}

impl AppState {
    fn new(store: TodoStore, storage: Storage) -> Self {
        Self {
            store,
            storage,
            selected: None,
            editor: None,
            delete_confirm: None,
            status: None,
            should_quit: false,
        }
    }

    pub(crate) fn visible(&self) -> Vec<usize> {
        model::visible_indices(self.store.tasks(), self.store.filter())
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        let visible = self.visible();
        let selected = self.selected?;
        visible
            .get(selected)
            .map(|&index| &self.store.tasks()[index])
    }

    fn refresh(&mut self) {
        self.store.set_overdue_for_all();
        self.selected = model::clamp_selection(self.selected, self.visible().len());
    }

    fn reload(&mut self) {
        let keep = self.selected_task().map(|task| task.id.clone());
        self.store = TodoStore::open(self.storage.clone());
        self.store.set_overdue_for_all();
        self.selected = keep
            .and_then(|id| model::selection_for_id(self.store.tasks(), self.store.filter(), &id))
            .or_else(|| model::clamp_selection(self.selected, self.visible().len()));
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Some((kind, message.into(), Instant::now()));
    }

    fn expire_status(&mut self) {
        if let Some((_, _, since)) = &self.status {
            if since.elapsed() > Duration::from_millis(STATUS_TTL_MS) {
                self.status = None;
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<AppRequest> {
        if self.editor.is_some() {
            return self.handle_editor_key(key);
        }
        if self.delete_confirm.is_some() {
            self.handle_confirm_key(key);
            return None;
        }
        self.handle_list_key(key);
        None
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Option<AppRequest> {
        if key.code == KeyCode::Char('e') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppRequest::OpenExternalEditor);
        }

        let Some(editor) = self.editor.as_mut() else {
            return None;
        };
        match editor.handle_key(key) {
            EditorAction::None => {}
            EditorAction::Cancel => self.editor = None,
            EditorAction::Submit => self.submit_editor(),
        }
        None
    }

    fn submit_editor(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let Some(submit) = editor.submit() else {
            return;
        };

        let result = match editor.task_id() {
            None => {
                let task = Task::new(
                    uuid::Uuid::new_v4().to_string(),
                    submit.title,
                    submit.description,
                    submit.deadline,
                );
                let id = task.id.clone();
                self.store.add_task(task).map(|()| id)
            }
            Some(task_id) => {
                let mut updated = Task::new(
                    task_id.to_string(),
                    submit.title,
                    submit.description,
                    submit.deadline,
                );
                if let Some(current) = self.store.task_by_id(task_id) {
                    updated.completed = current.completed;
                }
                let id = updated.id.clone();
                match self.store.edit_task(updated) {
                    Ok(true) => Ok(id),
                    Ok(false) => Err(Error::TaskNotFound(id)),
                    Err(err) => Err(err),
                }
            }
        };

        match result {
            Ok(id) => {
                self.editor = None;
                self.refresh();
                self.selected =
                    model::selection_for_id(self.store.tasks(), self.store.filter(), &id)
                        .or(self.selected);
            }
            Err(err) => self.set_status(StatusKind::Error, err.to_string()),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let Some(confirm) = self.delete_confirm.take() else {
            return;
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if self.store.delete_task(&confirm.task_id) {
                    self.set_status(StatusKind::Info, format!("Deleted '{}'", confirm.title));
                }
                self.refresh();
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = model::step_selection(self.selected, self.visible().len(), 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = model::step_selection(self.selected, self.visible().len(), -1);
            }
            KeyCode::Char('g') => {
                self.selected = model::clamp_selection(Some(0), self.visible().len());
            }
            KeyCode::Char('G') => {
                let len = self.visible().len();
                self.selected = model::clamp_selection(len.checked_sub(1), len);
            }
            KeyCode::Tab | KeyCode::Char('f') => {
                let next = self.store.filter().cycled();
                self.store.set_filter(next);
                self.selected = model::clamp_selection(self.selected, self.visible().len());
            }
            KeyCode::Char(' ') => {
                if let Some(task) = self.selected_task() {
                    let id = task.id.clone();
                    self.store.toggle_complete(&id);
                    self.selected = model::clamp_selection(self.selected, self.visible().len());
                }
            }
            KeyCode::Char('a') => self.editor = Some(EditorState::new_task()),
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task() {
                    self.editor = Some(EditorState::edit_task(task));
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    self.delete_confirm = Some(DeleteConfirmState {
                        task_id: task.id.clone(),
                        title: task.title.clone(),
                    });
                }
            }
            KeyCode::Char('J') => self.move_selected(1),
            KeyCode::Char('K') => self.move_selected(-1),
            KeyCode::Char('r') => {
                self.reload();
                self.set_status(StatusKind::Info, "Reloaded");
            }
            _ => {}
        }
    }

    fn move_selected(&mut self, delta: isize) {
        if self.store.filter() != Filter::All {
            self.set_status(
                StatusKind::Info,
                "Reordering works in the 'all' view (press f)",
            );
            return;
        }
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id.clone();

        let mut ids: Vec<String> = self
            .store
            .tasks()
            .iter()
            .map(|task| task.id.clone())
            .collect();
        let Some(from) = ids.iter().position(|current| current == &id) else {
            return;
        };
        let Some(to) = from.checked_add_signed(delta).filter(|&to| to < ids.len()) else {
            return;
        };
        ids.swap(from, to);

        match self.store.replace_order(&ids) {
            Ok(()) => {
                self.selected =
                    model::selection_for_id(self.store.tasks(), self.store.filter(), &id);
            }
            Err(err) => self.set_status(StatusKind::Error, err.to_string()),
        }
    }
}

/// Run the viewer over an opened store.
pub fn run(store: TodoStore, storage: Storage) -> Result<()> {
    let mut app = AppState::new(store, storage.clone());
    app.refresh();

    let (watch_tx, watch_rx) = mpsc::channel();
    let _watcher = spawn_watch(&storage, watch_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, watch_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    watch_rx: Receiver<()>,
) -> Result<()> {
    let mut last_reload = Instant::now();

    loop {
        app.expire_status();
        terminal.draw(|frame| view::render(frame, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(AppRequest::OpenExternalEditor) = app.handle_key(key) {
                        open_external_editor(terminal, app)?;
                    }
                }
                _ => {}
            }
        }

        // Coalesce bursts of file events into one reload.
        let mut dirty = false;
        while watch_rx.try_recv().is_ok() {
            dirty = true;
        }
        if dirty && last_reload.elapsed() > Duration::from_millis(WATCH_DEBOUNCE_MS) {
            app.reload();
            last_reload = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Watch the data directory for snapshot changes.
///
/// Returns the watcher so it stays alive for the viewer's lifetime; when the
/// watch cannot be established the viewer still works, just without live
/// reload.
fn spawn_watch(storage: &Storage, tx: Sender<()>) -> Option<RecommendedWatcher> {
    let state_file = storage.state_file();
    let dir = state_file.parent()?.to_path_buf();
    let file_name = state_file.file_name()?.to_os_string();

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
        if let Ok(event) = result {
            let matches = event
                .paths
                .iter()
                .any(|path| path.file_name() == Some(file_name.as_os_str()));
            if matches {
                let _ = tx.send(());
            }
        }
    })
    .ok()?;

    watcher.watch(&dir, RecursiveMode::NonRecursive).ok()?;
    Some(watcher)
}

/// Hop out to $EDITOR for the active form field, then resume the TUI.
fn open_external_editor(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let Some(editor_state) = app.editor.as_ref() else {
        return Ok(());
    };
    let current = editor_state.active_field().value.clone();

    let mut file = NamedTempFile::new()?;
    file.write_all(current.as_bytes())?;
    file.flush()?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    let editor_cmd = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = Command::new(&editor_cmd).arg(file.path()).status();

    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    terminal.clear()?;

    match status {
        Ok(status) if status.success() => {
            let edited = std::fs::read_to_string(file.path())?;
            let trimmed = edited.trim_end_matches('\n').to_string();
            if let Some(editor_state) = app.editor.as_mut() {
                editor_state.set_active_value(trimmed);
            }
        }
        Ok(_) => app.set_status(StatusKind::Info, "Editor exited without saving"),
        Err(err) => app.set_status(
            StatusKind::Error,
            format!("Failed to launch {editor_cmd}: {err}"),
        ),
    }
    Ok(())
}
