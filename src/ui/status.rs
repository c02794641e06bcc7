use crate::app::{App, MenuRegion};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status line: the latest message, or the refresh state.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: &str = if let Some((msg, _)) = &app.status_message {
        msg
    } else if app.is_refreshing() {
        "Refreshing feeds..."
    } else {
        ""
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::Gray));
    f.render_widget(paragraph, area);
}

/// Render the centered menu bar, highlighting the region whose overlay is open.
pub fn render_menu(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let mut spans = Vec::with_capacity(MenuRegion::ALL.len() * 2);
    for (i, region) in MenuRegion::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if app.menu_highlight == Some(region) {
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::Blue).fg(Color::White)
        };
        spans.push(Span::styled(format!("{} ", region.label()), style));
    }

    let menu = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(menu, area);
}
