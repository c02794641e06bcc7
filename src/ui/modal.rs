//! Modal overlay: message plus a row of buttons, centered over the base page.

use crate::app::Modal;
use crate::nav::OverlayKind;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::helpers::{centered_rect, FOCUSED_BORDER};

const MAX_WIDTH: u16 = 60;

pub fn render(f: &mut Frame, modal: &Modal) {
    let area = f.area();

    let width = MAX_WIDTH.min(area.width.saturating_sub(4));
    let text_width = usize::from(width.saturating_sub(4)).max(1);
    let message_lines: usize = modal
        .message
        .lines()
        .map(|line| line.chars().count().max(1).div_ceil(text_width))
        .sum::<usize>()
        .max(1);
    // Message + blank + buttons + borders
    let wanted = u16::try_from(message_lines + 4).unwrap_or(u16::MAX);
    let overlay = centered_rect(width, wanted.min(area.height.saturating_sub(2)), area);
    if overlay.width < 10 || overlay.height < 4 {
        return;
    }

    f.render_widget(Clear, overlay);

    let (title, border) = match modal.kind {
        OverlayKind::Error => (" Error ", Style::default().fg(Color::Red)),
        OverlayKind::Help => (" Help ", Style::default().fg(FOCUSED_BORDER)),
        _ => ("", Style::default().fg(FOCUSED_BORDER)),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);
    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let message = Paragraph::new(modal.message.as_str())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[0]);

    let selected = modal.selected_button();
    let mut spans = Vec::with_capacity(modal.buttons.len() * 2);
    for (i, button) in modal.buttons.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if *button == selected {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        spans.push(Span::styled(format!(" {} ", button.label()), style));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        chunks[1],
    );
}
