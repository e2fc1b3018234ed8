use api_types::dashboard::ChartPoint;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Paragraph},
};

use crate::ui::{components::card::Card, theme::Theme};

/// Vertical bars, one per chart point. Values are rounded to whole units.
pub fn render_bar_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    points: &[ChartPoint],
    theme: &Theme,
) {
    let data: Vec<(&str, u64)> = points
        .iter()
        .map(|point| (point.label.as_str(), bar_value(point.value)))
        .collect();
    let chart = BarChart::default()
        .data(data.as_slice())
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.text_muted));

    Card::new(title, theme).render_with(frame, area, chart);
}

/// One labelled horizontal bar per point, scaled to the largest value.
pub fn render_share_bars(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    points: &[ChartPoint],
    theme: &Theme,
) {
    let card = Card::new(title, theme);
    let inner = card.inner(area);
    let label_width = points
        .iter()
        .map(|point| point.label.chars().count())
        .max()
        .unwrap_or(0);
    let bar_width = (inner.width as usize).saturating_sub(label_width + 10).max(4);
    let max = points.iter().map(|point| bar_value(point.value)).max().unwrap_or(0);

    let lines: Vec<Line> = points
        .iter()
        .map(|point| {
            let value = bar_value(point.value);
            Line::from(vec![
                Span::styled(
                    format!("{:<label_width$} ", point.label),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(ascii_bar(value, max, bar_width), Style::default().fg(theme.accent)),
                Span::raw(format!(" {value}")),
            ])
        })
        .collect();

    card.render_with(frame, area, Paragraph::new(lines));
}

/// Returns a string like `████████░░░░` for `value` out of `max`.
#[must_use]
pub fn ascii_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }

    let ratio = (value as f64 / max as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn bar_value(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_bar_scales_to_max() {
        assert_eq!(ascii_bar(5, 10, 4), "██░░");
        assert_eq!(ascii_bar(20, 10, 4), "████");
        assert_eq!(ascii_bar(3, 0, 3), "░░░");
    }

    #[test]
    fn negative_and_nan_values_draw_empty() {
        assert_eq!(bar_value(-3.0), 0);
        assert_eq!(bar_value(f64::NAN), 0);
        assert_eq!(bar_value(2.6), 3);
    }
}
