pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, ItemsMode, ListMode, QuotationsMode, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    let content = layout[2];
    match state.section {
        Section::Dashboard => screens::home::render(frame, content, state, &theme),
        Section::Items => screens::items::render(frame, content, state, &theme),
        Section::Quotations => screens::quotations::render(frame, content, state, &theme),
        Section::Settings => screens::settings::render(frame, content, state, &theme),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let access = if state.role.is_read_only() {
        Span::styled("read-only", Style::default().fg(theme.warning))
    } else {
        Span::styled("full", Style::default().fg(theme.positive))
    };

    let line = Line::from(vec![
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Access", Style::default().fg(theme.text_muted)),
        Span::raw(": "),
        access,
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context_hints = context_hints(state);
    if !context_hints.is_empty() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        for (i, (key, label)) in context_hints.into_iter().enumerate() {
            if i > 0 {
                parts.push(Span::raw("  "));
            }
            parts.push(Span::styled(key, Style::default().fg(theme.accent)));
            parts.push(Span::raw(format!(" {label}")));
        }
    }

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled(
        if state.is_typing() { "Ctrl+C" } else { "q" },
        Style::default().fg(theme.accent),
    ));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Key hints for the current section and mode.
fn context_hints(state: &AppState) -> Vec<(&'static str, &'static str)> {
    const LIST_BROWSE: [(&str, &str); 5] = [
        ("←/→", "page"),
        ("/", "search"),
        ("g", "go to page"),
        ("Enter", "edit"),
        ("n", "new"),
    ];
    const LIST_INPUT: [(&str, &str); 2] = [("Enter", "done"), ("Esc", "close")];
    const FORM: [(&str, &str); 3] = [("Tab", "next"), ("Ctrl+S", "save"), ("Esc", "back")];

    let list_hints = |mode: ListMode| match mode {
        ListMode::Browse => LIST_BROWSE.to_vec(),
        ListMode::Search | ListMode::Jump => LIST_INPUT.to_vec(),
    };

    match state.section {
        Section::Dashboard => vec![("r", "refresh")],
        Section::Items => match state.items.mode {
            ItemsMode::List => {
                let mut hints = list_hints(state.items.view.mode);
                if state.items.view.mode == ListMode::Browse && !state.role.is_read_only() {
                    hints.push(("s", "toggle status"));
                }
                hints
            }
            ItemsMode::Form => FORM.to_vec(),
        },
        Section::Quotations => match state.quotations.mode {
            QuotationsMode::List => list_hints(state.quotations.view.mode),
            QuotationsMode::Form => {
                let mut hints = FORM.to_vec();
                hints.push(("Ctrl+A", "add line"));
                hints.push(("Ctrl+D", "remove line"));
                hints
            }
        },
        Section::Settings => vec![("Tab", "next"), ("Enter", "save"), ("Esc", "back")],
    }
}
