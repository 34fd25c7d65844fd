//! Modal dialogs drawn over the table.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::api::types::Entity;
use crate::views::EntityForm;

const FORM_WIDTH: u16 = 60;
const FIELD_HEIGHT: u16 = 3;
const ALERT_WIDTH: u16 = 56;

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Draw the add/edit dialog.
pub fn render_form<E: Entity>(frame: &mut Frame, area: Rect, form: &EntityForm<E>) {
    let fields = form.fields();
    // Borders (2) + one input per field + hint line (1).
    let height = fields.len() as u16 * FIELD_HEIGHT + 3;
    let dialog_area = centered_rect(area, FORM_WIDTH, height);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", form.title()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    for (index, field) in fields.iter().enumerate() {
        let y = inner.y + index as u16 * FIELD_HEIGHT;
        if y + FIELD_HEIGHT > inner.y + inner.height {
            break;
        }
        let label = if field.spec.required {
            format!(" {} * ", field.spec.label)
        } else {
            format!(" {} ", field.spec.label)
        };
        field.input.render(
            frame,
            Rect::new(inner.x, y, inner.width, FIELD_HEIGHT),
            &label,
            index == form.focused(),
            field.locked,
        );
    }

    if inner.height > 0 {
        let hint_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
        let hint = Paragraph::new(Span::styled(
            "Tab:next field  Enter:save  Esc:cancel",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(hint, hint_area);
    }
}

/// Draw a blocking alert with a message.
pub fn render_alert(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let text_width = ALERT_WIDTH.saturating_sub(4).max(1) as usize;
    let lines = (message.chars().count() / text_width + 1) as u16;
    // Borders (2) + message + blank line + hint.
    let dialog_area = centered_rect(area, ALERT_WIDTH, lines + 4);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let content = vec![
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::styled("Press Enter or Esc to dismiss", Style::default().fg(Color::DarkGray)),
    ];
    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, dialog_area);
}
