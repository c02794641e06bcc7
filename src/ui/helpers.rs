//! Shared rendering pieces for the list panes and overlays.

use crate::app::ListPane;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Border colour of the pane that has focus.
pub(super) const FOCUSED_BORDER: Color = Color::Cyan;

pub(super) fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        Style::default().fg(FOCUSED_BORDER)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

/// Builds a two-line-per-row list (label, dimmed secondary) for `pane`.
///
/// Returns the widget and a state scrolled so the selected row stays visible.
pub(super) fn list_widget<'a>(
    pane: &'a ListPane,
    block: Block<'a>,
    width: u16,
) -> (List<'a>, ListState) {
    // Borders take two columns
    let text_width = usize::from(width.saturating_sub(2));
    let selected = pane.selected();

    let items: Vec<ListItem> = pane
        .items()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if Some(i) == selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            let mut lines = vec![Line::from(Span::styled(
                truncate_to_width(&row.label, text_width).into_owned(),
                style,
            ))];
            if let Some(secondary) = &row.secondary {
                lines.push(Line::from(Span::styled(
                    truncate_to_width(secondary, text_width).into_owned(),
                    style.fg(Color::Gray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let mut state = ListState::default();
    state.select(selected);
    (List::new(items).block(block), state)
}

/// Rect of `width` x `height` centered in `area`, clamped to fit.
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
