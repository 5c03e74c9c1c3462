use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout areas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub search_box: Rect,
    pub results: Rect,
    pub flash: Rect,
    pub keyboard_hints: Rect,
}

/// Split the screen: search box on top, results, flash line, keyboard hints
pub fn create_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box (bordered, one line of text)
            Constraint::Min(1),    // Results
            Constraint::Length(1), // Flash message
            Constraint::Length(1), // Keyboard hints bar
        ])
        .split(area);

    MainLayout {
        search_box: chunks[0],
        results: chunks[1],
        flash: chunks[2],
        keyboard_hints: chunks[3],
    }
}
