use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::task::Task;

use super::app::{AppState, StatusKind};
use super::editor::EditorState;

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);
const COLOR_BORDER_DETAIL: Color = Color::Rgb(180, 156, 92);

pub fn render(frame: &mut Frame, app: &AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(area);

    render_header(frame, app, chunks[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
        .split(chunks[1]);
    render_list(frame, app, main[0]);
    render_detail(frame, app, main[1]);

    render_footer(frame, app, chunks[2]);

    if let Some(editor) = &app.editor {
        render_editor_modal(frame, area, editor);
    }
    if let Some(confirm) = &app.delete_confirm {
        let text = format!("Delete '{}'? (y/n)", confirm.title);
        render_confirm_modal(frame, area, &text);
    }
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let tasks = app.store.tasks();
    let overdue = tasks.iter().filter(|task| task.overdue).count();
    let done = tasks.iter().filter(|task| task.completed).count();

    let line = Line::from(vec![
        Span::styled(" tdo ", Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("filter: {} ", app.store.filter()),
            Style::default().fg(COLOR_TEXT),
        ),
        Span::styled(
            format!("| {} task(s), {done} done, {overdue} overdue", tasks.len()),
            Style::default().fg(COLOR_MUTED),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let visible = app.visible();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|&index| ListItem::new(task_line(&app.store.tasks()[index])))
        .collect();

    let block = Block::default()
        .title("Tasks")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER_LIST));
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Rgb(52, 56, 60))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_line(task: &Task) -> Line<'static> {
    let mark = if task.completed { "[x] " } else { "[ ] " };
    let title_style = if task.completed {
        Style::default().fg(COLOR_MUTED).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };

    let mut spans = vec![
        Span::styled(mark.to_string(), Style::default().fg(COLOR_MUTED)),
        Span::styled(task.title.clone(), title_style),
        Span::styled(
            format!("  {}", task.deadline),
            Style::default().fg(COLOR_MUTED),
        ),
    ];
    if task.overdue {
        spans.push(Span::styled(
            "  overdue",
            Style::default().fg(COLOR_ERROR).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn render_detail(frame: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .title("Details")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER_DETAIL));

    let Some(task) = app.selected_task() else {
        let empty = Paragraph::new(Line::styled(
            "No task selected (a to add one)",
            Style::default().fg(COLOR_MUTED),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let state = if task.completed {
        Span::styled("completed", Style::default().fg(COLOR_SUCCESS))
    } else if task.overdue {
        Span::styled("overdue", Style::default().fg(COLOR_ERROR))
    } else {
        Span::styled("open", Style::default().fg(COLOR_TEXT))
    };

    let mut lines = vec![
        Line::from(Span::styled(
            task.title.clone(),
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("id       ", Style::default().fg(COLOR_MUTED)),
            Span::styled(task.id.clone(), Style::default().fg(COLOR_TEXT)),
        ]),
        Line::from(vec![
            Span::styled("deadline ", Style::default().fg(COLOR_MUTED)),
            Span::styled(task.deadline.to_string(), Style::default().fg(COLOR_TEXT)),
        ]),
        Line::from(vec![
            Span::styled("state    ", Style::default().fg(COLOR_MUTED)),
            state,
        ]),
        Line::default(),
    ];
    for text_line in task.description.lines() {
        lines.push(Line::from(Span::styled(
            text_line.to_string(),
            Style::default().fg(COLOR_TEXT),
        )));
    }

    let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)].as_ref())
        .split(area);

    let hints = Line::styled(
        " j/k move  space toggle  a add  e edit  d delete  J/K reorder  f filter  r reload  q quit",
        Style::default().fg(COLOR_MUTED),
    );
    frame.render_widget(Paragraph::new(hints), rows[0]);

    if let Some((kind, message, _)) = &app.status {
        let style = match kind {
            StatusKind::Error => Style::default().fg(COLOR_ERROR),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        frame.render_widget(
            Paragraph::new(Line::styled(format!(" {message}"), style)),
            rows[1],
        );
    }
}

fn render_editor_modal(frame: &mut Frame, area: Rect, editor: &EditorState) {
    let height = (editor.fields().len() as u16) + 4;
    let modal = centered_rect(area, 60, height);
    frame.render_widget(Clear, modal);

    let mut lines = Vec::new();
    for (index, field) in editor.fields().iter().enumerate() {
        let active = index == editor.active();
        let label_style = if active {
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_MUTED)
        };
        let cursor = if active { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", field.label), label_style),
            Span::styled(format!("{}{cursor}", field.value), Style::default().fg(COLOR_TEXT)),
        ]));
    }
    lines.push(Line::default());
    match editor.error() {
        Some(error) => lines.push(Line::styled(error.to_string(), Style::default().fg(COLOR_ERROR))),
        None => lines.push(Line::styled(
            "Enter next/submit  Tab fields  Ctrl-e $EDITOR  Esc cancel",
            Style::default().fg(COLOR_MUTED),
        )),
    }

    let block = Block::default()
        .title(editor.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ACCENT));
    frame.render_widget(Paragraph::new(lines).block(block), modal);
}

fn render_confirm_modal(frame: &mut Frame, area: Rect, text: &str) {
    let modal = centered_rect(area, 50, 3);
    frame.render_widget(Clear, modal);
    let block = Block::default()
        .title("Confirm")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ERROR));
    frame.render_widget(
        Paragraph::new(Line::styled(text.to_string(), Style::default().fg(COLOR_TEXT)))
            .alignment(Alignment::Center)
            .block(block),
        modal,
    );
}

fn centered_rect(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_percent) / 100) as u16;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
