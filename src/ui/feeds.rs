use crate::app::App;
use crate::nav::Widget;
use ratatui::{layout::Rect, Frame};

use super::helpers::{list_widget, pane_block};

/// Render the feed list panel
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.nav.highlighted() == Some(Widget::FeedList);
    let (list, mut state) = list_widget(&app.feed_list, pane_block("Feeds", focused), area.width);
    f.render_stateful_widget(list, area, &mut state);
}
