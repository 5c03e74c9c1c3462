use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::Theme;
use crate::search::SearchHit;

/// Width reserved for the row number column
const NUMBER_WIDTH: u16 = 4;

/// Truncate text to a display width, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        // Leave one column for the ellipsis
        if width + ch_width + 1 > max_width {
            break;
        }
        truncated.push(ch);
        width += ch_width;
    }
    truncated.push('…');
    truncated
}

/// First row to draw so the selection stays visible
fn scroll_offset(selected: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 {
        return 0;
    }
    selected.saturating_sub(visible_rows - 1)
}

/// Render the hit list with the selected row highlighted
pub fn render_results(
    frame: &mut Frame,
    area: Rect,
    hits: &[SearchHit],
    selected: usize,
    total_documents: usize,
    theme: &Theme,
) {
    let header = format!(" Results {}/{} ", hits.len(), total_documents);
    let block = Block::default()
        .borders(Borders::TOP)
        .title(Span::styled(header, theme.result_header));

    if hits.is_empty() {
        let empty = Paragraph::new(Span::styled("  no matches", theme.result_id)).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let visible_rows = area.height.saturating_sub(1) as usize;
    let offset = scroll_offset(selected, visible_rows);

    let id_width = hits
        .iter()
        .map(|hit| hit.id.width())
        .max()
        .unwrap_or(0)
        .min(area.width as usize / 3) as u16;
    let title_width = area
        .width
        .saturating_sub(NUMBER_WIDTH + id_width + 2) as usize;

    let rows: Vec<Row> = hits
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(i, hit)| {
            let is_selected = i == selected;
            let text_style = if is_selected {
                theme.result_text_selected
            } else {
                theme.result_text
            };

            let row = Row::new(vec![
                Cell::from(Span::styled(format!("{:3}", i + 1), theme.result_number)),
                Cell::from(Span::styled(
                    truncate_to_width(&hit.title, title_width),
                    text_style,
                )),
                Cell::from(Span::styled(
                    truncate_to_width(&hit.id, id_width as usize),
                    theme.result_id,
                )),
            ]);

            if is_selected {
                row.style(Style::default().bg(theme.selection_bg))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(NUMBER_WIDTH),
            Constraint::Min(10),
            Constraint::Length(id_width),
        ],
    )
    .block(block);

    frame.render_widget(table, area);
}
