use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState},
};

use engine::{calculator::LineField, quotation::QuotationField};

use crate::{
    app::{AppState, PickerKind, QuotationFocus, QuotationFormState, QuotationsMode},
    ui::{
        components::{
            card::Card,
            form::{centered_box, input_lines},
            money::{format_major, styled_total},
            pager::{render_pager, render_search_bar},
        },
        theme::Theme,
    },
};

use super::quotation_status_span;

const LINE_COLUMNS: [LineField; 7] = [
    LineField::Item,
    LineField::Size,
    LineField::Unit,
    LineField::Quantity,
    LineField::Rate,
    LineField::Discount,
    LineField::Tax,
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    match (state.quotations.mode, &state.quotations.form) {
        (QuotationsMode::Form, Some(form)) => render_form(frame, area, form, theme),
        _ => render_list(frame, area, state, theme),
    }
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let view = &state.quotations.view;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_search_bar(frame, layout[0], view, theme);

    let rows = view.rows().iter().enumerate().map(|(i, row)| {
        Row::new(vec![
            Cell::from(view.list.row_number(i).to_string()),
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
            Constraint::Length(5),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Min(14),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(["No.", "Ref", "Date", "Buyer", "Amount", "Status"])
            .style(Style::default().fg(theme.text_muted)),
    )
    .row_highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("» ");

    let card = Card::new("Quotations", theme);
    let inner = card.inner(layout[1]);
    card.render_frame(frame, layout[1]);
    if view.rows().is_empty() {
        if !view.list.is_loading() && view.error.is_none() {
            frame.render_widget(Paragraph::new("No quotations found"), inner);
        }
    } else {
        let mut table_state = TableState::default();
        table_state.select(Some(view.selected));
        frame.render_stateful_widget(table, inner, &mut table_state);
    }

    render_pager(frame, layout[2], view, theme);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, form: &QuotationFormState, theme: &Theme) {
    let title = if form.id.is_some() {
        "Edit Quotation"
    } else {
        "Create Quotation"
    };
    if form.loading {
        Card::new(title, theme).render_with(frame, area, Paragraph::new("Loading quotation…"));
        return;
    }

    let header = header_lines(form, theme);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header.len() as u16 + 2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    Card::new(title, theme).render_with(frame, layout[0], Paragraph::new(header));
    render_lines(frame, layout[1], form, theme);

    let mut footer = vec![
        Span::styled("Total: ", Style::default().fg(theme.text_muted)),
        styled_total(form.draft.total(), theme),
    ];
    if form.saving {
        footer.push(Span::styled("   Saving…", Style::default().fg(theme.text_muted)));
    }
    if form.deleting {
        footer.push(Span::styled("   Deleting…", Style::default().fg(theme.text_muted)));
    }
    frame.render_widget(Paragraph::new(Line::from(footer)), layout[2]);

    if form.picker.is_some() {
        render_picker(frame, area, form, theme);
    }
    if form.draft.pending_removal().is_some() && !form.deleting {
        render_confirm(frame, area, theme);
    }
}

fn header_lines(form: &QuotationFormState, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("  Ref           ", Style::default().fg(theme.text_muted)),
        Span::raw(form.draft.reference.clone().unwrap_or_default()),
    ])];
    for field in [
        QuotationField::Date,
        QuotationField::Buyer,
        QuotationField::ValidUntil,
        QuotationField::Remarks,
    ] {
        let value = match field {
            QuotationField::Buyer => form
                .buyer_name()
                .map(str::to_string)
                .unwrap_or_else(|| "(Enter to choose)".to_string()),
            _ => form.draft.field(field).to_string(),
        };
        lines.extend(input_lines(
            field.label(),
            &value,
            form.focus == QuotationFocus::Header(field),
            form.errors.get(field.key()),
            theme,
        ));
    }
    if form.id.is_some() {
        lines.extend(input_lines(
            "Status",
            &format!("‹ {} ›", form.draft.status.as_str()),
            form.focus == QuotationFocus::Status,
            None,
            theme,
        ));
    }
    if let Some(message) = form.errors.get("items") {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.error),
        )));
    }
    lines
}

fn render_lines(frame: &mut Frame<'_>, area: Rect, form: &QuotationFormState, theme: &Theme) {
    let focused = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::REVERSED);
    let invalid = Style::default().fg(theme.error);

    let rows = form.draft.lines().iter().enumerate().map(|(index, line)| {
        let mut cells = vec![Cell::from((index + 1).to_string())];
        for field in LINE_COLUMNS {
            let text = match field {
                LineField::Item => form
                    .item_name(index)
                    .map(str::to_string)
                    .unwrap_or_else(|| "(choose)".to_string()),
                _ => line.field(field).to_string(),
            };
            let key = QuotationFormState::error_key(QuotationFocus::Line(index, field));
            let style = if form.focus == QuotationFocus::Line(index, field) {
                focused
            } else if form.errors.get(&key).is_some() {
                invalid
            } else {
                Style::default()
            };
            cells.push(Cell::from(text).style(style));
        }
        cells.push(Cell::from(line.amount().to_string()));
        Row::new(cells)
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(16),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(["#", "Item", "Size", "Unit", "Qty", "Rate", "Disc%", "Tax%", "Amount"])
            .style(Style::default().fg(theme.text_muted)),
    );

    let card = Card::new("Items", theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(2)])
        .split(inner);
    frame.render_widget(table, parts[0]);

    // Line errors, in field order.
    let line_errors: Vec<Span> = form
        .errors
        .iter()
        .filter(|error| error.field.starts_with("item_"))
        .take(2)
        .map(|error| Span::styled(format!("{}  ", error.message), invalid))
        .collect();
    frame.render_widget(Paragraph::new(Line::from(line_errors)), parts[1]);
}

fn render_picker(frame: &mut Frame<'_>, area: Rect, form: &QuotationFormState, theme: &Theme) {
    let Some(picker) = form.picker else {
        return;
    };
    let (title, entries): (&str, Vec<String>) = match picker.kind {
        PickerKind::Buyer => (
            "Select Buyer",
            form.buyers.iter().map(|buyer| buyer.buyer_name.clone()).collect(),
        ),
        PickerKind::Item(_) => (
            "Select Item",
            form.catalog
                .iter()
                .map(|item| format!("{}  {}", item.item_name, format_major(item.item_price)))
                .collect(),
        ),
    };

    let height = (entries.len() as u16 + 2).min(area.height.saturating_sub(2)).max(3);
    let rect = centered_box(48, height, area);
    let list = List::new(entries.into_iter().map(ListItem::new).collect::<Vec<_>>())
        .block(Card::new(title, theme).focused(true).block())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    let mut list_state = ListState::default();
    list_state.select(Some(picker.selected));

    frame.render_widget(Clear, rect);
    frame.render_stateful_widget(list, rect, &mut list_state);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let rect = centered_box(44, 5, area);
    let lines = vec![
        Line::from("Delete this item from the quotation?"),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" keep"),
        ]),
    ];
    frame.render_widget(Clear, rect);
    Card::new("Confirm", theme)
        .focused(true)
        .render_with(frame, rect, Paragraph::new(lines));
}
