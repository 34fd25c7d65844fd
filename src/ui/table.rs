//! Record table rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::api::types::Entity;
use crate::table::visible_range;
use crate::ui::TextInput;
use crate::views::ListState;

const CHECKBOX_WIDTH: u16 = 4;

/// Draw the filter box, the record table and the pagination line.
pub fn render_list<E: Entity>(
    frame: &mut Frame,
    area: Rect,
    state: &ListState<E>,
    filter: &TextInput,
    filter_focused: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Pagination
        ])
        .split(area);

    filter.render(
        frame,
        chunks[0],
        &format!(" Filter {} by name ", E::RESOURCE.title()),
        filter_focused,
        false,
    );
    render_table(frame, chunks[1], state);
    render_pagination(frame, chunks[2], state);
}

fn render_table<E: Entity>(frame: &mut Frame, area: Rect, state: &ListState<E>) {
    let resource = E::RESOURCE;
    let title = if state.selected().is_empty() {
        format!(" {} ", resource.title())
    } else {
        format!(" {} ({} selected) ", resource.title(), state.selected().len())
    };
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if state.is_loading() && !state.is_loaded() {
        let loading = Paragraph::new(format!("Loading {}...", resource.title()))
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if state.not_found() {
        let message = Paragraph::new(format!(
            "No {} found matching \"{}\"",
            resource.title(),
            state.filter_name()
        ))
        .style(Style::default().fg(Color::Yellow))
        .block(block);
        frame.render_widget(message, area);
        return;
    }

    let columns = E::columns();
    let header = header_row::<E>(state);

    let mut rows: Vec<Row> = Vec::new();
    for record in state.visible_rows() {
        let mark = if state.is_selected(record.id()) {
            "[x]"
        } else {
            "[ ]"
        };
        let mut cells = vec![Cell::from(mark)];
        cells.extend(
            columns
                .iter()
                .map(|column| Cell::from(record.display_field(column.key))),
        );
        rows.push(Row::new(cells));
    }
    for _ in 0..state.empty_rows() {
        rows.push(Row::new(vec![Cell::from("")]));
    }

    let mut widths = vec![Constraint::Length(CHECKBOX_WIDTH)];
    widths.extend(
        columns
            .iter()
            .map(|column| Constraint::Percentage(column.width)),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default();
    if state.highlighted().is_some() {
        table_state.select(Some(state.cursor()));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn header_row<E: Entity>(state: &ListState<E>) -> Row<'static> {
    let all = if state.all_selected() { "[x]" } else { "[ ]" };
    let mut cells = vec![Cell::from(all)];
    for column in E::columns() {
        let label = if column.key == state.order_by() {
            format!("{} {}", column.label, state.order().arrow())
        } else {
            column.label.to_string()
        };
        cells.push(Cell::from(label));
    }
    Row::new(cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

/// The "1-5 of 12" style label for the current page.
pub fn pagination_label(page: usize, rows_per_page: usize, total: usize) -> String {
    let range = visible_range(page, rows_per_page, total);
    if range.is_empty() {
        format!("0 of {}", total)
    } else {
        format!("{}-{} of {}", range.start + 1, range.end, total)
    }
}

fn render_pagination<E: Entity>(frame: &mut Frame, area: Rect, state: &ListState<E>) {
    let total = state.filtered().len();
    let options: Vec<String> = state
        .rows_per_page_options()
        .iter()
        .map(|n| {
            if *n == state.rows_per_page() {
                format!("[{}]", n)
            } else {
                n.to_string()
            }
        })
        .collect();

    let mut spans = vec![
        Span::styled(" Rows per page: ", Style::default().fg(Color::DarkGray)),
        Span::raw(options.join(" ")),
        Span::raw("   "),
        Span::raw(pagination_label(state.page(), state.rows_per_page(), total)),
        Span::styled(
            format!("   page {}/{}", state.page() + 1, state.page_count()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(status) = state.status() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
