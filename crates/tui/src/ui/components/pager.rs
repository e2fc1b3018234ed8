use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{ListMode, ListView},
    ui::theme::Theme,
};

/// Search line above a list: the search text, or the page being typed in
/// jump mode, plus the inline load error.
pub fn render_search_bar<T>(frame: &mut Frame<'_>, area: Rect, view: &ListView<T>, theme: &Theme) {
    let mut spans = match view.mode {
        ListMode::Jump => vec![
            Span::styled("Go to page: ", Style::default().fg(theme.accent)),
            Span::raw(format!("{}_", view.jump_input)),
        ],
        ListMode::Search => vec![
            Span::styled("Search: ", Style::default().fg(theme.accent)),
            Span::raw(format!("{}_", view.list.raw_search())),
        ],
        ListMode::Browse => vec![
            Span::styled("Search: ", Style::default().fg(theme.text_muted)),
            Span::raw(view.list.raw_search().to_string()),
        ],
    };
    if view.list.is_loading() {
        spans.push(Span::styled("  loading…", Style::default().fg(theme.text_muted)));
    }
    if let Some(error) = &view.error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(error.clone(), Style::default().fg(theme.error)));
        spans.push(Span::styled("  r", Style::default().fg(theme.accent)));
        spans.push(Span::raw(" try again"));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Page buttons on the left, `Page x of y` on the right.
pub fn render_pager<T>(frame: &mut Frame<'_>, area: Rect, view: &ListView<T>, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(area);

    let current = view.list.page_number();
    let mut spans = vec![Span::styled("‹ ", Style::default().fg(theme.text_muted))];
    let mut previous = None;
    for page in view.list.page_buttons() {
        if previous.is_some_and(|prev: u32| page > prev + 1) {
            spans.push(Span::styled("… ", Style::default().fg(theme.text_muted)));
        }
        let style = if page == current {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme.text)
        };
        spans.push(Span::styled(format!(" {page} "), style));
        spans.push(Span::raw(" "));
        previous = Some(page);
    }
    spans.push(Span::styled("›", Style::default().fg(theme.text_muted)));
    frame.render_widget(Paragraph::new(Line::from(spans)), cols[0]);

    let summary = format!("Page {current} of {}", view.list.page_count().max(1));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            summary,
            Style::default().fg(theme.text_muted),
        )))
        .alignment(ratatui::layout::Alignment::Right),
        cols[1],
    );
}
