use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{render_bar_chart, render_share_bars},
            money::format_major,
        },
        theme::Theme,
    },
};

use super::quotation_status_span;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let dashboard = &state.dashboard;
    let Some(data) = &dashboard.data else {
        let message = match (&dashboard.error, dashboard.loading) {
            (Some(error), _) => Line::from(vec![
                Span::styled(error.clone(), Style::default().fg(theme.error)),
                Span::raw("   "),
                Span::styled("r", Style::default().fg(theme.accent)),
                Span::raw(" try again"),
            ]),
            (None, true) => Line::from("Loading dashboard…"),
            (None, false) => Line::from("No data"),
        };
        Card::new("Dashboard", theme).render_with(
            frame,
            area,
            Paragraph::new(message).alignment(Alignment::Center),
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Counters
            Constraint::Length(12), // Charts
            Constraint::Min(5),     // Recent quotations
        ])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(layout[0]);
    StatCard::new("Total Quotations", data.total_quotations.to_string(), theme)
        .render(frame, cols[0]);
    StatCard::new("Pending", data.pending_quotations.to_string(), theme).render(frame, cols[1]);
    StatCard::new("Approved", data.approved_quotations.to_string(), theme)
        .render(frame, cols[2]);
    StatCard::new("This Month", format_major(data.monthly_amount), theme).render(frame, cols[3]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[1]);
    render_bar_chart(frame, charts[0], "Monthly Amount", &data.monthly_chart, theme);
    render_share_bars(frame, charts[1], "By Status", &data.status_chart, theme);

    let rows = data.last_quotations.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.quotation_ref.clone()),
            Cell::from(
                row.quotation_date
                    .map(|date| date.format("%d-%m-%Y").to_string())
                    .unwrap_or_default(),
            ),
            Cell::from(row.buyer_name.clone().unwrap_or_default()),
            Cell::from(format_major(row.total_amount)),
            Cell::from(quotation_status_span(row.quotation_status, theme)),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Min(12),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(["Ref", "Date", "Buyer", "Amount", "Status"])
            .style(Style::default().fg(theme.text_muted)),
    );
    Card::new("Recent Quotations", theme).render_with(frame, layout[2], table);
}
