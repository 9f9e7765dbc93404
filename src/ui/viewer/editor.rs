//! Inline form for creating and editing tasks inside the viewer.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};

use crate::task::{parse_deadline, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    NewTask,
    EditTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFieldId {
    Title,
    Description,
    Deadline,
}

#[derive(Debug, Clone)]
pub struct EditorField {
    pub id: EditorFieldId,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Cancel,
    Submit,
}

/// What a completed form resolves to.
#[derive(Debug, Clone)]
pub struct EditorSubmit {
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    kind: EditorKind,
    fields: Vec<EditorField>,
    active: usize,
    error: Option<String>,
    task_id: Option<String>,
}

impl EditorState {
    pub fn new_task() -> Self {
        Self {
            kind: EditorKind::NewTask,
            fields: blank_fields(),
            active: 0,
            error: None,
            task_id: None,
        }
    }

    pub fn edit_task(task: &Task) -> Self {
        let mut fields = blank_fields();
        for field in &mut fields {
            field.value = match field.id {
                EditorFieldId::Title => task.title.clone(),
                EditorFieldId::Description => task.description.clone(),
                EditorFieldId::Deadline => task.deadline.to_string(),
            };
        }
        Self {
            kind: EditorKind::EditTask,
            fields,
            active: 0,
            error: None,
            task_id: Some(task.id.clone()),
        }
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn fields(&self) -> &[EditorField] {
        &self.fields
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            EditorKind::NewTask => "New task",
            EditorKind::EditTask => "Edit task",
        }
    }

    /// Replace the active field's value (external-editor hop).
    pub fn set_active_value(&mut self, value: String) {
        self.fields[self.active].value = value;
        self.error = None;
    }

    pub fn active_field(&self) -> &EditorField {
        &self.fields[self.active]
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        match key.code {
            KeyCode::Esc => return EditorAction::Cancel,
            KeyCode::Enter => {
                if self.active + 1 < self.fields.len() {
                    self.active += 1;
                } else {
                    return EditorAction::Submit;
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                self.active = (self.active + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.active = self.active.checked_sub(1).unwrap_or(self.fields.len() - 1);
            }
            KeyCode::Backspace => {
                self.fields[self.active].value.pop();
                self.error = None;
            }
            KeyCode::Char(ch) => {
                self.fields[self.active].value.push(ch);
                self.error = None;
            }
            _ => {}
        }
        EditorAction::None
    }

    /// Validate the form. On failure the error is kept for display and the
    /// cursor jumps to the offending field.
    pub fn submit(&mut self) -> Option<EditorSubmit> {
        let title = self.value_of(EditorFieldId::Title).trim().to_string();
        if title.is_empty() {
            return self.reject(EditorFieldId::Title, "title is required");
        }
        let description = self.value_of(EditorFieldId::Description).trim().to_string();
        if description.is_empty() {
            return self.reject(EditorFieldId::Description, "description is required");
        }
        let deadline = match parse_deadline(self.value_of(EditorFieldId::Deadline)) {
            Ok(deadline) => deadline,
            Err(_) => {
                return self.reject(EditorFieldId::Deadline, "deadline must be YYYY-MM-DD");
            }
        };

        Some(EditorSubmit {
            title,
            description,
            deadline,
        })
    }

    fn value_of(&self, id: EditorFieldId) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| field.value.as_str())
            .unwrap_or_default()
    }

    fn reject(&mut self, id: EditorFieldId, message: &str) -> Option<EditorSubmit> {
        self.error = Some(message.to_string());
        if let Some(position) = self.fields.iter().position(|field| field.id == id) {
            self.active = position;
        }
        None
    }
}

fn blank_fields() -> Vec<EditorField> {
    vec![
        EditorField {
            id: EditorFieldId::Title,
            label: "Title",
            value: String::new(),
        },
        EditorField {
            id: EditorFieldId::Description,
            label: "Description",
            value: String::new(),
        },
        EditorField {
            id: EditorFieldId::Deadline,
            label: "Deadline",
            value: String::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(editor: &mut EditorState, text: &str) {
        for ch in text.chars() {
            editor.handle_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn enter_advances_then_submits() {
        let mut editor = EditorState::new_task();
        type_text(&mut editor, "Write report");
        assert_eq!(editor.handle_key(key(KeyCode::Enter)), EditorAction::None);
        type_text(&mut editor, "quarterly numbers");
        assert_eq!(editor.handle_key(key(KeyCode::Enter)), EditorAction::None);
        type_text(&mut editor, "2024-06-01");
        assert_eq!(editor.handle_key(key(KeyCode::Enter)), EditorAction::Submit);

        let submit = editor.submit().expect("valid form");
        assert_eq!(submit.title, "Write report");
        assert_eq!(submit.deadline.to_string(), "2024-06-01");
    }

    #[test]
    fn submit_rejects_blank_title_and_marks_field() {
        let mut editor = EditorState::new_task();
        assert!(editor.submit().is_none());
        assert_eq!(editor.error(), Some("title is required"));
        assert_eq!(editor.fields()[editor.active()].id, EditorFieldId::Title);
    }

    #[test]
    fn submit_rejects_bad_deadline() {
        let mut editor = EditorState::new_task();
        type_text(&mut editor, "T");
        editor.handle_key(key(KeyCode::Tab));
        type_text(&mut editor, "d");
        editor.handle_key(key(KeyCode::Tab));
        type_text(&mut editor, "tomorrow");
        assert!(editor.submit().is_none());
        assert_eq!(editor.error(), Some("deadline must be YYYY-MM-DD"));
        assert_eq!(editor.fields()[editor.active()].id, EditorFieldId::Deadline);
    }

    #[test]
    fn edit_prefills_from_task() {
        let task = Task::new(
            "1",
            "Title",
            "Body",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        let editor = EditorState::edit_task(&task);
        assert_eq!(editor.kind(), EditorKind::EditTask);
        assert_eq!(editor.task_id(), Some("1"));
        assert_eq!(editor.fields()[2].value, "2024-06-01");
    }

    #[test]
    fn escape_cancels() {
        let mut editor = EditorState::new_task();
        assert_eq!(editor.handle_key(key(KeyCode::Esc)), EditorAction::Cancel);
    }
}
