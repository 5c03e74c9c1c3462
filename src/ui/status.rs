use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::Theme;
use crate::logging::FlashMessage;

const UNFOCUSED_HINTS: &[(&[&str], &str)] = &[
    (&["/", "Tab"], "search"),
    (&["j", "k"], "move"),
    (&["c"], "clear messages"),
    (&["q", "Esc"], "quit"),
];

const FOCUSED_HINTS: &[(&[&str], &str)] = &[
    (&["↑", "↓"], "move"),
    (&["Enter"], "search now"),
    (&["Esc"], "leave input"),
];

/// Render keyboard hints for the current focus state
pub fn render_keyboard_hints(frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
    let hint_data = if focused { FOCUSED_HINTS } else { UNFOCUSED_HINTS };

    let mut hints = Vec::new();

    for (keys, description) in hint_data {
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                hints.push(Span::styled("/", theme.status_desc.add_modifier(Modifier::DIM)));
            }
            hints.push(Span::styled(*key, theme.status_key));
        }

        hints.push(Span::raw(" "));
        hints.push(Span::styled(*description, theme.status_desc));
        hints.push(Span::raw("  "));
    }

    let paragraph =
        Paragraph::new(Line::from(hints)).style(theme.status_desc.bg(theme.status_bar_bg));

    frame.render_widget(paragraph, area);
}

/// Render the most recent flash message, if any
pub fn render_flash_message(frame: &mut Frame, area: Rect, messages: &[FlashMessage], theme: &Theme) {
    let Some(message) = messages.last() else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(format!("{} ", message.level), theme.flash_style(message.level)),
        Span::styled(message.message.as_str(), theme.status_desc),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
