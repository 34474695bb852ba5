/*
[INPUT]:  TableModel rows and the current connection state
[OUTPUT]: Price table and status line rendered into a ratatui frame
[POS]:    TUI rendering - dashboard layout and styling
[UPDATE]: When changing columns, colors, or layout
*/

use oracle_dash_client::SymbolStatus;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use rust_decimal::Decimal;

use crate::feed::ConnectionState;
use crate::table::{RowData, TableModel};

const COLUMN_TITLES: [&str; 14] = [
    "Asset", "Country", "Symbol", "Type", "Price", "Conf", "TWAP", "TWAC", "Status",
    "Valid Slot", "Pub Slot", "Tenor", "Quote", "Description",
];

// Default text color matches the original dashboard's cornsilk; a feed in
// unknown status turns its whole row red.
const COLOR_NORMAL: Color = Color::Rgb(255, 248, 220);
const COLOR_UNKNOWN: Color = Color::Rgb(192, 57, 43);
const COLOR_ERROR: Color = Color::Yellow;

pub(super) fn draw_dashboard(
    frame: &mut ratatui::Frame,
    table: &TableModel,
    state: ConnectionState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(frame.area());

    draw_status_line(frame, chunks[0], state, table.rows().len());
    draw_price_table(frame, chunks[1], table);
}

fn draw_status_line(
    frame: &mut ratatui::Frame,
    area: Rect,
    state: ConnectionState,
    row_count: usize,
) {
    let style = match state {
        ConnectionState::Connected => Style::default().fg(Color::Green),
        ConnectionState::Connecting => Style::default().fg(Color::Yellow),
        ConnectionState::Disconnected => Style::default().fg(Color::White).bg(Color::Red),
    };
    let line = Line::from(vec![
        Span::styled(state.label(), style.add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {row_count} feeds  (q to quit)")),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_price_table(frame: &mut ratatui::Frame, area: Rect, table: &TableModel) {
    let header = Row::new(COLUMN_TITLES.iter().map(|title| Cell::from(*title)))
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = table.rows().iter().map(|row| {
        let style = row_style(row);
        Row::new(row_cells(row).into_iter().map(Cell::from)).style(style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(13),
        Constraint::Length(11),
        Constraint::Length(13),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Min(10),
    ];

    let widget = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title("prices"),
    );
    frame.render_widget(widget, area);
}

pub(super) fn row_style(row: &RowData) -> Style {
    if row.last_error.is_some() {
        return Style::default().fg(COLOR_ERROR);
    }
    match row.fields.as_ref().map(|fields| fields.status) {
        Some(SymbolStatus::Unknown) => Style::default().fg(COLOR_UNKNOWN),
        _ => Style::default().fg(COLOR_NORMAL),
    }
}

pub(super) fn row_cells(row: &RowData) -> Vec<String> {
    let price = |value: Option<Decimal>| {
        value.map(|value| value.to_string()).unwrap_or_else(|| "-".to_string())
    };

    let (price_cell, conf, twap, twac, status, valid_slot, pub_slot) = match &row.fields {
        Some(fields) => (
            fields.price.to_string(),
            fields.conf.to_string(),
            price(fields.twap),
            price(fields.twac),
            fields.status.as_str().to_string(),
            fields.valid_slot.to_string(),
            fields.pub_slot.to_string(),
        ),
        None => (
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
        ),
    };

    // A decode failure shows up in the status column, keeping the last
    // good numbers on screen.
    let status = match &row.last_error {
        Some(error) => format!("error: {error}"),
        None => status,
    };

    vec![
        row.asset_type.clone(),
        row.country.clone(),
        row.symbol.clone(),
        row.price_type.clone(),
        price_cell,
        conf,
        twap,
        twac,
        status,
        valid_slot,
        pub_slot,
        row.tenor.clone(),
        row.quote_currency.clone(),
        row.description.clone(),
    ]
}
