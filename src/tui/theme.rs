use ratatui::style::{Color, Modifier, Style};

pub const SELECTED_VALID: Style = Style::new()
    .fg(Color::Green)
    .add_modifier(Modifier::BOLD);
pub const UNSELECTED_VALID: Style = Style::new().fg(Color::White);
pub const INVALID: Style = Style::new().fg(Color::Yellow);
pub const FOLDER: Style = Style::new()
    .fg(Color::Cyan)
    .add_modifier(Modifier::BOLD);
pub const HINT_KEY: Style = Style::new().fg(Color::Yellow);
pub const DIM: Style = Style::new().fg(Color::DarkGray);

pub const CURSOR_BG: Color = Color::DarkGray;

/// Style for a task leaf. Invalid tasks stay yellow even while selected, so
/// a broken selection never masquerades as a healthy one.
pub fn leaf_style(selected: bool, valid: bool) -> Style {
    if !valid {
        INVALID
    } else if selected {
        SELECTED_VALID
    } else {
        UNSELECTED_VALID
    }
}

pub mod icons {
    pub const FOLDER: &str = "v";
    pub const FILE: &str = ".";
    pub const INVALID: &str = "!";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_style_three_way() {
        assert_eq!(leaf_style(true, true), SELECTED_VALID);
        assert_eq!(leaf_style(false, true), UNSELECTED_VALID);
        assert_eq!(leaf_style(true, false), INVALID);
        assert_eq!(leaf_style(false, false), INVALID);
    }
}
