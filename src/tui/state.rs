use crate::config::UiConfig;
use crate::hierarchy::{self, TreeRow};
use crate::task::{self, TaskRecord};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

#[derive(Debug)]
pub struct AppState {
    pub tasks: Vec<TaskRecord>,
    pub current: Option<TaskRecord>,
    pub show_hierarchy: bool,
    /// Panel cursor position, counting selectable leaves only.
    pub cursor: usize,
    /// First visible display row of the panel body.
    pub panel_scroll: usize,
    pub discovery_done: bool,
    pub loaded_at: Option<chrono::DateTime<chrono::Local>>,
    pub should_quit: bool,
    pub ui: UiConfig,
    pub panel_area: Option<Rect>,
    pub footer_area: Option<Rect>,
}

impl AppState {
    pub fn new(ui: UiConfig) -> Self {
        Self {
            tasks: Vec::new(),
            current: None,
            show_hierarchy: false,
            cursor: 0,
            panel_scroll: 0,
            discovery_done: false,
            loaded_at: None,
            should_quit: false,
            ui,
            panel_area: None,
            footer_area: None,
        }
    }

    /// Display rows are rebuilt from the task list on demand; the tree is
    /// never stored between renders.
    pub fn rows(&self) -> Vec<TreeRow> {
        hierarchy::flatten(&hierarchy::build(&self.tasks))
    }

    pub fn valid_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_valid).count()
    }

    /// Commit a settled discovery result. The task list and the initial
    /// selection land in the same call, so no render ever observes one
    /// without the other.
    pub fn install_tasks(&mut self, records: Vec<TaskRecord>) {
        self.tasks = records;
        self.current = task::initial_selection(&self.tasks);
        self.discovery_done = true;
        self.loaded_at = Some(chrono::Local::now());
        let rows = self.rows();
        self.cursor = self
            .current
            .as_ref()
            .and_then(|c| hierarchy::leaf_ordinal_of(&rows, &c.full_path))
            .unwrap_or(0);
        self.panel_scroll = 0;
    }

    /// User-driven selection. Invalid tasks are selectable so the warning
    /// screen can name the offending file; the log records the attempt.
    pub fn select(&mut self, record: TaskRecord) {
        if !record.is_valid {
            tracing::warn!(
                path = %record.full_path,
                "selected task has no renderable component"
            );
        }
        self.current = Some(record);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('t') | KeyCode::Tab => {
                self.show_hierarchy = !self.show_hierarchy;
                return;
            }
            KeyCode::Esc => {
                self.show_hierarchy = false;
                return;
            }
            _ => {}
        }

        if !self.show_hierarchy {
            return;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('g') => self.cursor = 0,
            KeyCode::Char('G') => {
                let len = hierarchy::leaf_count(&self.rows());
                if len > 0 {
                    self.cursor = len - 1;
                }
            }
            KeyCode::Enter => self.select_cursor(),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_left_click(event.column, event.row);
            }
            MouseEventKind::ScrollUp if self.show_hierarchy => self.move_cursor(-1),
            MouseEventKind::ScrollDown if self.show_hierarchy => self.move_cursor(1),
            _ => {}
        }
    }

    /// Called from the render pass with the areas actually drawn, so click
    /// coordinates can be mapped back to rows on the next event.
    pub fn update_layout(&mut self, panel_area: Option<Rect>, footer_area: Rect) {
        self.panel_area = panel_area;
        self.footer_area = Some(footer_area);
    }

    fn handle_left_click(&mut self, column: u16, row: u16) {
        if let Some(area) = self.footer_area {
            if contains(area, column, row) {
                self.show_hierarchy = !self.show_hierarchy;
                return;
            }
        }

        if !self.show_hierarchy {
            return;
        }

        if let Some(area) = self.panel_area {
            if contains(area, column, row) {
                if let Some(idx) = self.row_from_coords(area, column, row) {
                    let rows = self.rows();
                    if let Some(TreeRow::Leaf { record, .. }) = rows.get(idx) {
                        if let Some(ordinal) = hierarchy::leaf_ordinal_of(&rows, &record.full_path)
                        {
                            self.cursor = ordinal;
                        }
                        let record = record.clone();
                        self.select(record);
                    }
                }
            }
        }
    }

    fn select_cursor(&mut self) {
        let rows = self.rows();
        if let Some(record) = hierarchy::leaf_record_at(&rows, self.cursor) {
            let record = record.clone();
            self.select(record);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = hierarchy::leaf_count(&self.rows()) as isize;
        if len == 0 {
            return;
        }
        let mut next = self.cursor as isize + delta;
        if next < 0 {
            next = len - 1;
        }
        if next >= len {
            next = 0;
        }
        self.cursor = next as usize;
    }

    /// Map a click inside the panel to a display row index, accounting for
    /// the border line and the current scroll offset.
    fn row_from_coords(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        if !contains(area, column, row) {
            return None;
        }
        if area.height <= 2 {
            return None;
        }
        let data_start = area.y.saturating_add(1);
        let data_end = area.y.saturating_add(area.height.saturating_sub(1));
        if row < data_start || row >= data_end {
            return None;
        }
        Some(self.panel_scroll + (row - data_start) as usize)
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{Preview, PreviewSpec};
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;

    fn record(path: &str, valid: bool) -> TaskRecord {
        let component: Option<Arc<dyn Preview>> = valid.then(|| {
            Arc::new(PreviewSpec::Card {
                title: path.to_string(),
                body: String::new(),
                accent: None,
            }) as Arc<dyn Preview>
        });
        TaskRecord {
            id: path.split('/').nth(2).unwrap_or(path).to_string(),
            name: path.rsplit('/').next().unwrap().to_string(),
            full_path: path.to_string(),
            component,
            is_valid: valid,
        }
    }

    fn sample_state() -> AppState {
        let mut state = AppState::new(UiConfig::default());
        state.install_tasks(vec![
            record("./tasks/01/a.toml", true),
            record("./tasks/01/b.toml", false),
            record("./tasks/02/c.toml", true),
        ]);
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_install_selects_first_valid_and_positions_cursor() {
        let state = sample_state();
        assert!(state.discovery_done);
        assert!(state.loaded_at.is_some());
        let current = state.current.as_ref().unwrap();
        assert_eq!(current.full_path, "./tasks/01/a.toml");
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_install_falls_back_to_first_when_none_valid() {
        let mut state = AppState::new(UiConfig::default());
        state.install_tasks(vec![
            record("./tasks/01/a.toml", false),
            record("./tasks/02/b.toml", false),
        ]);
        let current = state.current.as_ref().unwrap();
        assert_eq!(current.full_path, "./tasks/01/a.toml");
        assert!(!current.is_valid);
    }

    #[test]
    fn test_install_empty_leaves_no_selection() {
        let mut state = AppState::new(UiConfig::default());
        state.install_tasks(Vec::new());
        assert!(state.current.is_none());
        assert!(state.discovery_done);
    }

    #[test]
    fn test_panel_starts_hidden_and_toggles() {
        let mut state = sample_state();
        assert!(!state.show_hierarchy);
        state.handle_key(key(KeyCode::Char('t')));
        assert!(state.show_hierarchy);
        state.handle_key(key(KeyCode::Tab));
        assert!(!state.show_hierarchy);
        state.handle_key(key(KeyCode::Char('t')));
        state.handle_key(key(KeyCode::Esc));
        assert!(!state.show_hierarchy);
    }

    #[test]
    fn test_quit_key() {
        let mut state = sample_state();
        state.handle_key(key(KeyCode::Char('q')));
        assert!(state.should_quit);
    }

    #[test]
    fn test_cursor_moves_and_wraps() {
        let mut state = sample_state();
        state.handle_key(key(KeyCode::Char('t')));
        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(state.cursor, 1);
        state.handle_key(key(KeyCode::Char('j')));
        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(state.cursor, 0);
        state.handle_key(key(KeyCode::Char('k')));
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn test_cursor_ignored_while_panel_hidden() {
        let mut state = sample_state();
        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_jump_to_top_and_bottom() {
        let mut state = sample_state();
        state.handle_key(key(KeyCode::Char('t')));
        state.handle_key(key(KeyCode::Char('G')));
        assert_eq!(state.cursor, 2);
        state.handle_key(key(KeyCode::Char('g')));
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_enter_selects_cursor_leaf_even_if_invalid() {
        let mut state = sample_state();
        state.handle_key(key(KeyCode::Char('t')));
        state.handle_key(key(KeyCode::Char('j')));
        state.handle_key(key(KeyCode::Enter));
        let current = state.current.as_ref().unwrap();
        assert_eq!(current.full_path, "./tasks/01/b.toml");
        assert!(!current.is_valid);
        // The panel stays open after selection.
        assert!(state.show_hierarchy);
    }

    #[test]
    fn test_footer_click_toggles_panel() {
        let mut state = sample_state();
        state.update_layout(None, Rect::new(0, 23, 80, 1));
        state.handle_mouse(click(5, 23));
        assert!(state.show_hierarchy);
        state.handle_mouse(click(40, 23));
        assert!(!state.show_hierarchy);
    }

    #[test]
    fn test_panel_click_selects_leaf_row() {
        let mut state = sample_state();
        state.handle_key(key(KeyCode::Char('t')));
        let panel = Rect::new(0, 5, 42, 12);
        state.update_layout(Some(panel), Rect::new(0, 23, 80, 1));
        // Display rows: "." / "tasks" / "01" / a.toml / b.toml / "02" / c.toml,
        // so display row 4 is the second leaf. The panel body starts one row
        // below the border.
        state.handle_mouse(click(3, 5 + 1 + 4));
        let current = state.current.as_ref().unwrap();
        assert_eq!(current.full_path, "./tasks/01/b.toml");
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_panel_click_on_folder_row_is_ignored() {
        let mut state = sample_state();
        state.handle_key(key(KeyCode::Char('t')));
        let panel = Rect::new(0, 5, 42, 12);
        state.update_layout(Some(panel), Rect::new(0, 23, 80, 1));
        state.handle_mouse(click(3, 5 + 1));
        let current = state.current.as_ref().unwrap();
        assert_eq!(current.full_path, "./tasks/01/a.toml");
    }

    #[test]
    fn test_wheel_moves_cursor_only_when_panel_open() {
        let mut state = sample_state();
        state.handle_mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(state.cursor, 0);
        state.handle_key(key(KeyCode::Char('t')));
        state.handle_mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_selection_identity_survives_rebuild() {
        let state = sample_state();
        let rows = state.rows();
        let selected: Vec<&str> = rows
            .iter()
            .filter_map(|r| match r {
                TreeRow::Leaf { record, .. } => {
                    (state.current.as_ref() == Some(record)).then_some(record.full_path.as_str())
                }
                TreeRow::Folder { .. } => None,
            })
            .collect();
        assert_eq!(selected, vec!["./tasks/01/a.toml"]);
    }
}
