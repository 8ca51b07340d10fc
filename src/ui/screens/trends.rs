use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_rate, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" Category Trends ({}) ", app.snapshot.trends.len()),
            theme::title_style(),
        ));

    if app.snapshot.trends.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No categories to fit",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let next_month = app.forecast().predicted().next().map(|m| m.month);
    let next_label = next_month
        .map(|m| format!("Month {m}"))
        .unwrap_or_else(|| "Next".into());

    let header_cells = ["Category", "Points", "Slope", "Intercept", next_label.as_str()]
        .into_iter()
        .map(|h| Cell::from(h.to_string()).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .snapshot
        .trends
        .iter()
        .enumerate()
        .skip(app.trend_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, (name, trend))| {
            let style = if i == app.trend_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let slope_style = if i == app.trend_index {
                Style::default()
            } else if trend.slope() > Decimal::ZERO {
                // Rising spend eats into savings
                Style::default().fg(theme::RED)
            } else {
                Style::default().fg(theme::GREEN)
            };

            let next = next_month
                .and_then(|m| trend.predict_spend(m).ok())
                .map(format_amount)
                .unwrap_or_else(|| "n/a".into());

            Row::new(vec![
                Cell::from(truncate(name, 28)),
                Cell::from(format!("{:>6}", trend.points())),
                Cell::from(Span::styled(format_rate(trend.slope()), slope_style)),
                Cell::from(format_amount(trend.intercept())),
                Cell::from(next),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
