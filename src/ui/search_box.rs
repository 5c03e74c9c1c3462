use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use super::Theme;
use crate::search::SearchInputController;

/// Render the search input. Focus switches the border style and shows the cursor.
pub fn render_search_box(
    frame: &mut Frame,
    area: Rect,
    controller: &SearchInputController,
    theme: &Theme,
) {
    let focused = controller.is_focused();
    let border_style = if focused {
        theme.search_border_focused
    } else {
        theme.search_border
    };

    let mut title = vec![Span::styled(" Search ", border_style)];
    if controller.throttled_search().is_pending() {
        title.push(Span::styled("… ", theme.search_pending));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(title))
        .padding(Padding::horizontal(1));

    // Borders plus one column of padding on each side
    let text_width = area.width.saturating_sub(4) as usize;
    let input = controller.input();
    let scroll = input.visual_scroll(text_width);

    let paragraph = if input.value().is_empty() {
        Paragraph::new(Span::styled(controller.placeholder(), theme.search_placeholder))
    } else {
        Paragraph::new(Span::styled(input.value(), theme.search_text)).scroll((0, scroll as u16))
    };

    frame.render_widget(paragraph.block(block), area);

    if focused {
        let cursor = input.visual_cursor().saturating_sub(scroll) as u16;
        frame.set_cursor_position(Position::new(area.x + 2 + cursor, area.y + 1));
    }
}
