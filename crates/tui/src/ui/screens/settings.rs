use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use engine::profile::ProfileField;

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, form::{centered_box, input_lines}},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let profile = &state.profile;
    let rect = centered_box(64, 12, area);
    let card = Card::new("Profile", theme).focused(true);

    if profile.original.is_none() {
        let text = if profile.loading {
            "Loading profile…"
        } else {
            "Profile unavailable"
        };
        card.render_with(frame, rect, Paragraph::new(text));
        return;
    }

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Name"), Style::default().fg(theme.text_muted)),
            Span::raw(profile.draft.name.clone()),
        ]),
        Line::from(""),
    ];
    for field in ProfileField::ALL {
        lines.extend(input_lines(
            field.label(),
            profile.draft.field(field),
            profile.focus == field,
            profile.errors.get(field.key()),
            theme,
        ));
    }
    lines.push(Line::from(""));
    let status = if profile.saving {
        "Saving…"
    } else if profile.is_dirty() {
        "Unsaved changes"
    } else {
        ""
    };
    lines.push(Line::from(Span::styled(
        status,
        Style::default().fg(theme.text_muted),
    )));

    card.render_with(frame, rect, Paragraph::new(lines));
}
