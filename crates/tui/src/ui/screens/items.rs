use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use api_types::item::ItemStatus;
use engine::item::ItemField;

use crate::{
    app::{AppState, ItemFormState, ItemsMode},
    ui::{
        components::{
            card::Card,
            form::input_lines,
            money::format_major,
            pager::{render_pager, render_search_bar},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    match (state.items.mode, &state.items.form) {
        (ItemsMode::Form, Some(form)) => render_form(frame, area, form, theme),
        _ => render_list(frame, area, state, theme),
    }
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let items = &state.items;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_search_bar(frame, layout[0], &items.view, theme);

    let list = &items.view.list;
    let rows = items.view.rows().iter().enumerate().map(|(i, item)| {
        let status = if items.toggles.is_updating(item.id) {
            Span::styled("updating…", Style::default().fg(theme.text_muted))
        } else {
            status_span(item.item_status, theme)
        };
        Row::new(vec![
            Cell::from(list.row_number(i).to_string()),
            Cell::from(item.item_name.clone()),
            Cell::from(item.item_type.clone().unwrap_or_default()),
            Cell::from(format_major(item.item_price)),
            Cell::from(format!("{}%", item.item_tax)),
            Cell::from(item.item_unit.clone().unwrap_or_default()),
            Cell::from(status),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(["No.", "Name", "Type", "Price", "Tax", "Unit", "Status"])
            .style(Style::default().fg(theme.text_muted)),
    )
    .row_highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("» ");

    let card = Card::new("Items", theme);
    let inner = card.inner(layout[1]);
    card.render_frame(frame, layout[1]);
    let mut table_state = TableState::default();
    if !items.view.rows().is_empty() {
        table_state.select(Some(items.view.selected));
        frame.render_stateful_widget(table, inner, &mut table_state);
    } else if !list.is_loading() && items.view.error.is_none() {
        frame.render_widget(Paragraph::new("No items found"), inner);
    }

    render_pager(frame, layout[2], &items.view, theme);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, form: &ItemFormState, theme: &Theme) {
    let title = match (form.id, form.is_dirty()) {
        (None, _) => "Create Item",
        (Some(_), true) => "Edit Item *",
        (Some(_), false) => "Edit Item",
    };
    if form.loading {
        Card::new(title, theme).render_with(frame, area, Paragraph::new("Loading item…"));
        return;
    }

    let mut lines = Vec::new();
    for field in ItemField::ALL {
        let value = if field == ItemField::Status {
            format!("‹ {} ›", form.draft.field(field))
        } else {
            form.draft.field(field).to_string()
        };
        lines.extend(input_lines(
            field.label(),
            &value,
            form.focus == field,
            form.errors.get(field.key()),
            theme,
        ));
    }
    if form.saving {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Saving…",
            Style::default().fg(theme.text_muted),
        )));
    }

    Card::new(title, theme)
        .focused(true)
        .render_with(frame, area, Paragraph::new(lines));
}

fn status_span(status: ItemStatus, theme: &Theme) -> Span<'static> {
    let color = match status {
        ItemStatus::Active => theme.positive,
        ItemStatus::Inactive => theme.error,
    };
    Span::styled(status.as_str(), Style::default().fg(color))
}
