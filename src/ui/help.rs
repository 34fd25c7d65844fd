//! Help panel listing every key binding.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::events::get_keybindings_grouped;

/// Draw the help panel over `area`.
pub fn render_help(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help - Keyboard Shortcuts ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (context, bindings) in get_keybindings_grouped() {
        lines.push(Line::from(Span::styled(
            format!("── {} ──", context.display()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for binding in bindings {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:>16}", binding.key),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw("  "),
                Span::raw(binding.description),
            ]));
        }
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
