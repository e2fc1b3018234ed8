use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::ui::theme::Theme;

/// A `width` × `height` rect centred in `area`.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// One labelled input row, with its validation message underneath when
/// there is one.
pub fn input_lines(
    label: &str,
    value: &str,
    focused: bool,
    error: Option<&str>,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let marker = if focused { "> " } else { "  " };
    let cursor = if focused { "_" } else { "" };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{marker}{label:<14}"), label_style),
        Span::styled(format!("{value}{cursor}"), Style::default().fg(theme.text)),
    ])];
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            format!("{:16}{error}", ""),
            Style::default().fg(theme.error),
        )));
    }
    lines
}
