use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{category_width, format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let forecast = app.forecast();

    let mut header_cells = vec![
        Cell::from("Month").style(theme::header_style()),
        Cell::from("Kind").style(theme::header_style()),
        Cell::from("Savings").style(theme::header_style()),
    ];
    header_cells.extend(forecast.categories.iter().map(|name| {
        Cell::from(truncate(name, category_width(name) as usize)).style(theme::header_style())
    }));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = forecast
        .forecast
        .iter()
        .enumerate()
        .skip(app.month_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, month)| {
            let is_cursor = i == app.month_index;

            let style = if is_cursor {
                theme::selected_style()
            } else if month.is_predicted() {
                theme::predicted_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let savings_style = if is_cursor {
                Style::default()
            } else {
                theme::savings_style(month.savings)
            };

            let mut cells = vec![
                Cell::from(format!("{:>5}", month.month)),
                Cell::from(month.kind.as_str()),
                Cell::from(Span::styled(format_amount(month.savings), savings_style)),
            ];
            cells.extend(forecast.categories.iter().map(|name| {
                match month.amount(name) {
                    Some(amount) => Cell::from(format_amount(amount)),
                    None => Cell::from(Span::styled("—", theme::dim_style())),
                }
            }));

            Row::new(cells).style(style)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(15),
    ];
    widths.extend(
        forecast
            .categories
            .iter()
            .map(|name| Constraint::Length(category_width(name) + 1)),
    );

    let predicted = forecast.predicted().count();
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(
                    " Timeline ({} actual, {predicted} forecast) ",
                    forecast.len() - predicted
                ),
                theme::title_style(),
            )),
    );

    f.render_widget(table, area);
}
