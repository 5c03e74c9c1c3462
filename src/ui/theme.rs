use log::Level;
use ratatui::prelude::*;

/// Styles for every element the TUI draws
#[derive(Debug, Clone)]
pub struct Theme {
    pub default_bg: Color,

    // === Search Box ===
    pub search_border: Style,
    /// Border while the input has focus
    pub search_border_focused: Style,
    pub search_text: Style,
    pub search_placeholder: Style,
    pub search_pending: Style,

    // === Results ===
    pub result_header: Style,
    pub result_number: Style,
    pub result_text: Style,
    pub result_text_selected: Style,
    pub result_id: Style,
    pub selection_bg: Color,

    // === Status Bar ===
    pub status_key: Style,
    pub status_desc: Style,
    pub status_bar_bg: Color,

    // === Flash Messages ===
    pub flash_error: Style,
    pub flash_warn: Style,
    pub flash_info: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            default_bg: Color::Reset,

            search_border: Style::default().fg(Color::DarkGray),
            search_border_focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            search_text: Style::default().fg(Color::White),
            search_placeholder: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            search_pending: Style::default().fg(Color::Yellow),

            result_header: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            result_number: Style::default().fg(Color::DarkGray),
            result_text: Style::default().fg(Color::White),
            result_text_selected: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            result_id: Style::default().fg(Color::DarkGray),
            selection_bg: Color::Cyan,

            status_key: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            status_desc: Style::default().fg(Color::Gray),
            status_bar_bg: Color::Reset,

            flash_error: Style::default().fg(Color::Red),
            flash_warn: Style::default().fg(Color::Yellow),
            flash_info: Style::default().fg(Color::Green),
        }
    }
}

impl Theme {
    /// Style for a flash message of the given level
    pub fn flash_style(&self, level: Level) -> Style {
        match level {
            Level::Error => self.flash_error,
            Level::Warn => self.flash_warn,
            _ => self.flash_info,
        }
    }
}
