use super::state::AppState;
use super::theme::{self, icons};
use crate::hierarchy::TreeRow;
use crate::task::TaskRecord;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn draw(f: &mut Frame, state: &mut AppState, spinner_frame: u8) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    draw_viewport(f, state, chunks[0]);

    let panel_area = state.show_hierarchy.then(|| panel_rect(chunks[0], state));
    if let Some(area) = panel_area {
        draw_panel(f, state, area);
    }

    draw_footer(f, state, chunks[1], spinner_frame);
    state.update_layout(panel_area, chunks[1]);
}

fn draw_viewport(f: &mut Frame, state: &AppState, area: Rect) {
    // Nothing selected leaves the stage blank; the footer reports progress.
    let Some(current) = &state.current else {
        return;
    };

    match &current.component {
        Some(component) => component.render(f, area),
        None => draw_invalid_task(f, current, area),
    }
}

fn draw_invalid_task(f: &mut Frame, current: &TaskRecord, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "This task is invalid or empty.",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Please check the file: {}", current.full_path),
            theme::DIM,
        )),
    ];
    let block = Block::default()
        .title(" Invalid Task ")
        .borders(Borders::ALL)
        .border_style(theme::INVALID);
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(para, area);
}

/// The panel rises from the bottom-left corner of the stage, sized by the
/// configured width and height percentage.
fn panel_rect(stage: Rect, state: &AppState) -> Rect {
    let width = state.ui.panel_width.min(stage.width);
    let pct = state.ui.panel_height_pct_clamped() as u32;
    let height = (((stage.height as u32) * pct / 100).max(3) as u16).min(stage.height);
    Rect {
        x: stage.x,
        y: stage.y + stage.height - height,
        width,
        height,
    }
}

fn draw_panel(f: &mut Frame, state: &mut AppState, area: Rect) {
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Select Preview File ")
        .borders(Borders::ALL);

    let rows = state.rows();
    if rows.is_empty() {
        let text = if state.discovery_done {
            "No task modules found"
        } else {
            "Scanning task modules..."
        };
        let para = Paragraph::new(Line::from(Span::styled(text, theme::DIM)))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let visible_lines = area.height.saturating_sub(2) as usize;

    // Keep the cursor row inside the window, then clamp to the end.
    if let Some(cursor_row) = cursor_display_row(&rows, state.cursor) {
        if cursor_row < state.panel_scroll {
            state.panel_scroll = cursor_row;
        } else if visible_lines > 0 && cursor_row >= state.panel_scroll + visible_lines {
            state.panel_scroll = cursor_row + 1 - visible_lines;
        }
    }
    state.panel_scroll = state
        .panel_scroll
        .min(rows.len().saturating_sub(visible_lines));

    let mut lines: Vec<Line> = Vec::with_capacity(visible_lines);
    let mut ordinal = 0usize;
    for (idx, row) in rows.iter().enumerate() {
        let visible = idx >= state.panel_scroll && idx < state.panel_scroll + visible_lines;
        match row {
            TreeRow::Folder { depth, name } => {
                if visible {
                    let text = format!("{}{} {}/", "  ".repeat(*depth), icons::FOLDER, name);
                    lines.push(Line::from(Span::styled(text, theme::FOLDER)));
                }
            }
            TreeRow::Leaf {
                depth,
                name,
                record,
            } => {
                if visible {
                    let selected = state.current.as_ref() == Some(record);
                    let icon = if record.is_valid {
                        icons::FILE
                    } else {
                        icons::INVALID
                    };
                    let mut style = theme::leaf_style(selected, record.is_valid);
                    if ordinal == state.cursor {
                        style = style.bg(theme::CURSOR_BG);
                    }
                    let text = format!("{}{} {}", "  ".repeat(*depth), icon, name);
                    lines.push(Line::from(Span::styled(text, style)));
                }
                ordinal += 1;
            }
        }
    }

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, area);
}

fn cursor_display_row(rows: &[TreeRow], cursor: usize) -> Option<usize> {
    let mut ordinal = 0usize;
    for (idx, row) in rows.iter().enumerate() {
        if matches!(row, TreeRow::Leaf { .. }) {
            if ordinal == cursor {
                return Some(idx);
            }
            ordinal += 1;
        }
    }
    None
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    let mut spans: Vec<Span> = if state.show_hierarchy {
        vec![
            Span::styled("  [Esc]", theme::HINT_KEY),
            Span::raw(" close  "),
            Span::styled("[j/k]", theme::HINT_KEY),
            Span::raw(" move  "),
            Span::styled("[g/G]", theme::HINT_KEY),
            Span::raw(" top/bottom  "),
            Span::styled("[Enter]", theme::HINT_KEY),
            Span::raw(" select  "),
        ]
    } else {
        vec![
            Span::styled("  [q]", theme::HINT_KEY),
            Span::raw("uit  "),
            Span::styled("[t]", theme::HINT_KEY),
            Span::raw("asks  "),
        ]
    };

    if let Some(current) = &state.current {
        spans.push(Span::raw(format!("Task {}: ", current.id)));
        spans.push(Span::styled(
            current.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    } else if state.discovery_done {
        spans.push(Span::styled("no tasks found", theme::DIM));
    }

    if state.discovery_done {
        spans.push(Span::styled(
            format!("  {}/{} valid", state.valid_count(), state.tasks.len()),
            theme::DIM,
        ));
        if let Some(loaded_at) = state.loaded_at {
            spans.push(Span::styled(
                format!("  loaded {}", loaded_at.format("%H:%M:%S")),
                theme::DIM,
            ));
        }
    } else {
        let ch = SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()];
        spans.push(Span::styled(
            format!(" {} scanning tasks", ch),
            Style::default().fg(Color::Cyan),
        ));
    }

    let para = Paragraph::new(Line::from(spans));
    f.render_widget(para, area);
}
