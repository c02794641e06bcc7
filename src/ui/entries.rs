use crate::app::App;
use crate::nav::Widget;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::helpers::{list_widget, pane_block};

/// Render the entries list above the selected entry's description (1:2).
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(area);

    let focused = app.nav.highlighted() == Some(Widget::EntriesList);
    let (list, mut state) = list_widget(
        &app.entries_list,
        pane_block("Entries", focused),
        chunks[0].width,
    );
    f.render_stateful_widget(list, chunks[0], &mut state);

    let description = Paragraph::new(app.content.text())
        .block(pane_block("Description", false))
        .wrap(Wrap { trim: false });
    f.render_widget(description, chunks[1]);
}
