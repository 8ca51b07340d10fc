use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::MonthSummary;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

const BAR_WIDTH: u16 = 10;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Savings bars
            Constraint::Length(7), // Selected month + spend sparkline
        ])
        .split(area);

    render_savings_chart(f, chunks[0], app);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_month_detail(f, bottom[0], app);
    render_spend_sparkline(f, bottom[1], app);
}

fn bordered(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

fn render_savings_chart(f: &mut Frame, area: Rect, app: &App) {
    let months = &app.forecast().forecast;

    // Slide the visible window so the selected month is always on screen
    let fit = (area.width.saturating_sub(2) / (BAR_WIDTH + 1)).max(1) as usize;
    let start = app.month_index.saturating_sub(fit - 1);

    let bars: Vec<Bar> = months
        .iter()
        .enumerate()
        .skip(start)
        .take(fit)
        .map(|(i, month)| {
            let color = if month.is_predicted() {
                theme::FORECAST
            } else {
                theme::ACCENT
            };
            let mut label_style = Style::default().fg(theme::TEXT_DIM);
            if i == app.month_index {
                label_style = Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            Bar::default()
                .value(savings_height(month.savings))
                .text_value(truncate(&format_amount(month.savings), BAR_WIDTH as usize))
                .label(Line::from(Span::styled(format!("M{}", month.month), label_style)))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(bordered(" Savings by Month (negative shown as empty) ".into()))
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(1)
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_month_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(month) = app.forecast().forecast.get(app.month_index) else {
        f.render_widget(Paragraph::new("").block(bordered(" Month ".into())), area);
        return;
    };

    let kind_style = if month.is_predicted() {
        theme::predicted_style()
    } else {
        theme::normal_style()
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" Month {}  ", month.month), theme::normal_style()),
            Span::styled(month.kind.as_str(), kind_style),
        ]),
        Line::from(vec![
            Span::styled(" Savings ", theme::dim_style()),
            Span::styled(
                format_amount(month.savings),
                theme::savings_style(month.savings).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Spend   ", theme::dim_style()),
            Span::styled(format_amount(month.total_spend()), theme::normal_style()),
        ]),
    ];
    if let Some((name, amount)) = largest_category(month) {
        lines.push(Line::from(vec![
            Span::styled(" Largest ", theme::dim_style()),
            Span::styled(
                format!("{} {}", truncate(name, 14), format_amount(amount)),
                theme::normal_style(),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(bordered(" Selected ".into())), area);
}

fn render_spend_sparkline(f: &mut Frame, area: Rect, app: &App) {
    let data: Vec<u64> = app
        .forecast()
        .forecast
        .iter()
        .map(|m| m.total_spend().max(Decimal::ZERO).to_u64().unwrap_or(0))
        .collect();

    let sparkline = Sparkline::default()
        .block(bordered(" Total Spend Trend ".into()))
        .data(&data)
        .style(Style::default().fg(theme::YELLOW));

    f.render_widget(sparkline, area);
}

fn savings_height(savings: Decimal) -> u64 {
    savings.max(Decimal::ZERO).round().to_u64().unwrap_or(0)
}

fn largest_category(month: &MonthSummary) -> Option<(&str, Decimal)> {
    month
        .amounts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1))
        .map(|(name, amount)| (name.as_str(), *amount))
}
