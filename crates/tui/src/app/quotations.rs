use std::time::Instant;

use api_types::{
    buyer::BuyerView,
    item::ItemView,
    pagination::Page,
    quotation::{QuotationNew, QuotationRow, QuotationUpdate, QuotationView},
};
use chrono::{Local, NaiveDate};
use engine::{
    calculator::LineField,
    form::FieldErrors,
    EngineError, ResultEngine,
    listing::{ListConfig, PageKey},
    quotation::{QuotationDraft, QuotationField, Removal, line_error_key},
};

use crate::{client::ClientError, error::Result, ui::keymap::AppAction};

use super::{
    App, AppEvent,
    list_view::{ListKeyOutcome, ListView, PageOutcome},
};

const LIST_NAME: &str = "quotations";

const HEADER_FIELDS: [QuotationField; 4] = [
    QuotationField::Date,
    QuotationField::Buyer,
    QuotationField::ValidUntil,
    QuotationField::Remarks,
];

const LINE_FIELDS: [LineField; 7] = [
    LineField::Item,
    LineField::Size,
    LineField::Unit,
    LineField::Quantity,
    LineField::Rate,
    LineField::Discount,
    LineField::Tax,
];

type ClientResult<T> = std::result::Result<T, ClientError>;

enum SaveRequest {
    Create(QuotationNew),
    Update(u64, QuotationUpdate),
}

#[derive(Debug)]
pub enum QuotationsEvent {
    Page {
        key: PageKey,
        result: ClientResult<Page<QuotationRow>>,
    },
    Loaded {
        id: u64,
        result: ClientResult<QuotationView>,
    },
    Reference(ClientResult<Option<String>>),
    Buyers(ClientResult<Vec<BuyerView>>),
    Catalog(ClientResult<Vec<ItemView>>),
    Saved {
        id: Option<u64>,
        result: ClientResult<()>,
    },
    LineDeleted {
        line_id: u64,
        result: ClientResult<()>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationsMode {
    List,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationFocus {
    Header(QuotationField),
    Status,
    Line(usize, LineField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Buyer,
    /// Catalog item for the line at this index.
    Item(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Picker {
    pub kind: PickerKind,
    pub selected: usize,
}

#[derive(Debug)]
pub struct QuotationFormState {
    /// `None` on create.
    pub id: Option<u64>,
    pub draft: QuotationDraft,
    pub focus: QuotationFocus,
    pub errors: FieldErrors,
    pub buyers: Vec<BuyerView>,
    pub catalog: Vec<ItemView>,
    pub picker: Option<Picker>,
    pub loading: bool,
    pub saving: bool,
    pub deleting: bool,
}

impl QuotationFormState {
    fn create(today: NaiveDate) -> Self {
        Self {
            id: None,
            draft: QuotationDraft::new(today),
            focus: QuotationFocus::Header(QuotationField::Date),
            errors: FieldErrors::new(),
            buyers: Vec::new(),
            catalog: Vec::new(),
            picker: None,
            loading: false,
            saving: false,
            deleting: false,
        }
    }

    fn edit(id: u64, today: NaiveDate) -> Self {
        Self {
            id: Some(id),
            loading: true,
            ..Self::create(today)
        }
    }

    /// Focusable inputs in screen order.
    pub fn focus_order(&self) -> Vec<QuotationFocus> {
        let mut order: Vec<QuotationFocus> =
            HEADER_FIELDS.into_iter().map(QuotationFocus::Header).collect();
        if self.id.is_some() {
            order.push(QuotationFocus::Status);
        }
        for index in 0..self.draft.lines().len() {
            order.extend(LINE_FIELDS.map(|field| QuotationFocus::Line(index, field)));
        }
        order
    }

    pub fn error_key(focus: QuotationFocus) -> String {
        match focus {
            QuotationFocus::Header(field) => field.key().to_string(),
            QuotationFocus::Status => "quotation_status".to_string(),
            QuotationFocus::Line(index, field) => line_error_key(index, field),
        }
    }

    pub fn buyer_name(&self) -> Option<&str> {
        let id = self.draft.buyer_id.parse::<u64>().ok()?;
        self.buyers
            .iter()
            .find(|buyer| buyer.id == id)
            .map(|buyer| buyer.buyer_name.as_str())
    }

    pub fn item_name(&self, index: usize) -> Option<&str> {
        let id = self.draft.line(index)?.item_id.parse::<u64>().ok()?;
        self.catalog
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.item_name.as_str())
    }

    fn move_focus(&mut self, step: isize) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = (current as isize + step).rem_euclid(order.len() as isize) as usize;
        self.focus = order[next];
    }

    /// Keeps the focus on an existing line after lines were removed.
    fn clamp_focus(&mut self) {
        if let QuotationFocus::Line(index, field) = self.focus {
            let last = self.draft.lines().len().saturating_sub(1);
            if index > last {
                self.focus = QuotationFocus::Line(last, field);
            }
        }
    }

    fn focus_first_error(&mut self) {
        let Some(first) = self.errors.first().map(|error| error.field.clone()) else {
            return;
        };
        if let Some(focus) = self
            .focus_order()
            .into_iter()
            .find(|focus| Self::error_key(*focus) == first)
        {
            self.focus = focus;
        }
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) -> ResultEngine<()> {
        match self.focus {
            QuotationFocus::Header(QuotationField::Buyer)
            | QuotationFocus::Line(_, LineField::Item) => return Ok(()),
            QuotationFocus::Status => self.draft.status = self.draft.status.next(),
            QuotationFocus::Header(field) => {
                let mut value = self.draft.field(field).to_string();
                edit(&mut value);
                self.draft.set_field(field, &value);
            }
            QuotationFocus::Line(index, field) => {
                let mut value = self
                    .draft
                    .line(index)
                    .map(|line| line.field(field).to_string())
                    .unwrap_or_default();
                edit(&mut value);
                self.draft.set_line_field(index, field, &value)?;
            }
        }
        self.errors.remove(&Self::error_key(self.focus));
        Ok(())
    }

    fn open_picker(&mut self) -> Option<&'static str> {
        let kind = match self.focus {
            QuotationFocus::Header(QuotationField::Buyer) => PickerKind::Buyer,
            QuotationFocus::Line(index, LineField::Item) => PickerKind::Item(index),
            _ => return None,
        };
        let empty = match kind {
            PickerKind::Buyer => self.buyers.is_empty(),
            PickerKind::Item(_) => self.catalog.is_empty(),
        };
        if empty {
            return Some(match kind {
                PickerKind::Buyer => "No buyers available",
                PickerKind::Item(_) => "No items available",
            });
        }
        self.picker = Some(Picker { kind, selected: 0 });
        None
    }

    fn picker_len(&self, kind: PickerKind) -> usize {
        match kind {
            PickerKind::Buyer => self.buyers.len(),
            PickerKind::Item(_) => self.catalog.len(),
        }
    }

    fn choose(&mut self, picker: Picker) -> ResultEngine<()> {
        match picker.kind {
            PickerKind::Buyer => {
                if let Some(buyer) = self.buyers.get(picker.selected) {
                    self.draft
                        .set_field(QuotationField::Buyer, &buyer.id.to_string());
                    self.errors.remove(QuotationField::Buyer.key());
                }
            }
            PickerKind::Item(index) => {
                if let Some(item) = self.catalog.get(picker.selected) {
                    self.draft.select_item(index, item)?;
                    self.errors.remove(&line_error_key(index, LineField::Item));
                    self.errors.remove(&line_error_key(index, LineField::Rate));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct QuotationsState {
    pub view: ListView<QuotationRow>,
    pub mode: QuotationsMode,
    pub form: Option<QuotationFormState>,
}

impl QuotationsState {
    pub fn new(config: ListConfig) -> Self {
        Self {
            view: ListView::new(config),
            mode: QuotationsMode::List,
            form: None,
        }
    }

    pub fn is_typing(&self) -> bool {
        match self.mode {
            QuotationsMode::List => self.view.is_typing(),
            QuotationsMode::Form => true,
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl App {
    pub(super) fn mount_quotations_list(&mut self) {
        self.state.quotations.mode = QuotationsMode::List;
        self.state.quotations.form = None;
        if let Some(page) = self.take_return_page(LIST_NAME) {
            self.state.quotations.view.list.restore_page(page);
            self.state.quotations.view.retry();
        }
    }

    pub(super) fn tick_quotations(&mut self, now: Instant) {
        if self.state.quotations.mode != QuotationsMode::List {
            return;
        }
        if let Some(key) = self.state.quotations.view.tick(now) {
            self.fetch_quotations_page(key);
        }
    }

    fn fetch_quotations_page(&self, key: PageKey) {
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.quotations(&key).await;
            AppEvent::Quotations(QuotationsEvent::Page { key, result })
        });
    }

    pub(super) fn quotations_key(&mut self, action: AppAction, now: Instant) -> Result<()> {
        match self.state.quotations.mode {
            QuotationsMode::List => {
                self.quotations_list_key(action, now);
                Ok(())
            }
            QuotationsMode::Form => self.quotation_form_key(action),
        }
    }

    fn quotations_list_key(&mut self, action: AppAction, now: Instant) {
        match self.state.quotations.view.handle_key(action, now) {
            ListKeyOutcome::Handled => return,
            ListKeyOutcome::Invalid(message) => {
                self.state.error(message);
                return;
            }
            ListKeyOutcome::Unhandled => {}
        }

        match action {
            AppAction::Input('n') => self.open_quotation_create(),
            AppAction::Submit => {
                let Some(id) = self.state.quotations.view.selected_row().map(|row| row.id)
                else {
                    return;
                };
                let page = self.state.quotations.view.list.page_number();
                self.stash_return_page(LIST_NAME, page);
                self.open_quotation_edit(id);
            }
            _ => {}
        }
    }

    fn open_quotation_create(&mut self) {
        self.state.quotations.form = Some(QuotationFormState::create(today()));
        self.state.quotations.mode = QuotationsMode::Form;
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::Quotations(QuotationsEvent::Reference(client.quotation_ref().await))
        });
        self.load_quotation_choices();
    }

    fn open_quotation_edit(&mut self, id: u64) {
        self.state.quotations.form = Some(QuotationFormState::edit(id, today()));
        self.state.quotations.mode = QuotationsMode::Form;
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.quotation(id).await;
            AppEvent::Quotations(QuotationsEvent::Loaded { id, result })
        });
        self.load_quotation_choices();
    }

    /// Buyers and catalog items offered by the pickers.
    fn load_quotation_choices(&self) {
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::Quotations(QuotationsEvent::Buyers(client.active_buyers().await))
        });
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::Quotations(QuotationsEvent::Catalog(client.catalog().await))
        });
    }

    fn quotation_form_key(&mut self, action: AppAction) -> Result<()> {
        if let Err(err) = self.apply_quotation_form_key(action) {
            self.report_form_error(err);
        }
        Ok(())
    }

    /// Engine errors here come from a form that went out of step with its
    /// lines; the form stays usable.
    fn report_form_error(&mut self, err: EngineError) {
        tracing::warn!(error = %err, "quotation form action rejected");
        if let Some(form) = self.state.quotations.form.as_mut() {
            form.clamp_focus();
        }
        self.state.error("Could not update the form, please try again");
    }

    fn apply_quotation_form_key(&mut self, action: AppAction) -> ResultEngine<()> {
        let Some(form) = self.state.quotations.form.as_mut() else {
            return Ok(());
        };
        if form.loading || form.saving || form.deleting {
            if action == AppAction::Cancel && !form.deleting {
                self.mount_quotations_list();
            }
            return Ok(());
        }

        if let Some(mut picker) = form.picker {
            let len = form.picker_len(picker.kind);
            match action {
                AppAction::Up => picker.selected = picker.selected.saturating_sub(1),
                AppAction::Down => picker.selected = (picker.selected + 1).min(len.saturating_sub(1)),
                AppAction::Submit => {
                    form.picker = None;
                    return form.choose(picker);
                }
                AppAction::Cancel => {
                    form.picker = None;
                    return Ok(());
                }
                _ => {}
            }
            form.picker = Some(picker);
            return Ok(());
        }

        if form.draft.pending_removal().is_some() {
            match action {
                AppAction::Input('y') | AppAction::Submit => self.confirm_line_removal()?,
                AppAction::Input('n') | AppAction::Cancel => form.draft.cancel_removal(),
                _ => {}
            }
            return Ok(());
        }

        match action {
            AppAction::Cancel => self.mount_quotations_list(),
            AppAction::NextField | AppAction::Down => form.move_focus(1),
            AppAction::PrevField | AppAction::Up => form.move_focus(-1),
            AppAction::Input(ch) => form.edit_focused(|value| value.push(ch))?,
            AppAction::Backspace => form.edit_focused(|value| {
                value.pop();
            })?,
            AppAction::AddRow => {
                form.draft.add_line();
                form.focus = QuotationFocus::Line(form.draft.lines().len() - 1, LineField::Item);
            }
            AppAction::RemoveRow => self.request_line_removal()?,
            AppAction::Submit => {
                if let Some(message) = form.open_picker() {
                    self.state.info(message);
                } else if form.picker.is_none() {
                    self.submit_quotation_form();
                }
            }
            AppAction::Save => self.submit_quotation_form(),
            _ => {}
        }
        Ok(())
    }

    fn request_line_removal(&mut self) -> ResultEngine<()> {
        let Some(form) = self.state.quotations.form.as_mut() else {
            return Ok(());
        };
        let QuotationFocus::Line(index, _) = form.focus else {
            return Ok(());
        };
        match form.draft.request_removal(index)? {
            Removal::Removed => form.clamp_focus(),
            Removal::Kept => self.state.info("At least one item is required"),
            Removal::AwaitingConfirmation(_) => {}
        }
        Ok(())
    }

    fn confirm_line_removal(&mut self) -> ResultEngine<()> {
        let Some(form) = self.state.quotations.form.as_mut() else {
            return Ok(());
        };
        let pending = form.draft.confirm_removal()?;
        form.deleting = true;
        let line_id = pending.id;
        tracing::info!(line_id, "deleting quotation line");
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.delete_quotation_line(line_id).await;
            AppEvent::Quotations(QuotationsEvent::LineDeleted { line_id, result })
        });
        Ok(())
    }

    fn submit_quotation_form(&mut self) {
        let Some(form) = self.state.quotations.form.as_mut() else {
            return;
        };
        let request = match form.id {
            Some(id) => form
                .draft
                .validate_update()
                .map(|body| SaveRequest::Update(id, body)),
            None => form.draft.validate_new().map(SaveRequest::Create),
        };
        match request {
            Err(errors) => {
                form.errors = errors;
                form.focus_first_error();
                self.state.error("Please fill all required fields");
            }
            Ok(request) => {
                form.errors = FieldErrors::new();
                form.saving = true;
                let client = self.client.clone();
                self.spawn(async move {
                    let (id, result) = match request {
                        SaveRequest::Create(body) => (None, client.create_quotation(&body).await),
                        SaveRequest::Update(id, body) => {
                            (Some(id), client.update_quotation(id, &body).await)
                        }
                    };
                    AppEvent::Quotations(QuotationsEvent::Saved { id, result })
                });
            }
        }
    }

    pub(super) fn on_quotations_event(
        &mut self,
        event: QuotationsEvent,
        now: Instant,
    ) {
        match event {
            QuotationsEvent::Page { key, result } => {
                match self.state.quotations.view.apply(
                    key,
                    result,
                    now,
                    "Failed to load quotations",
                ) {
                    PageOutcome::Loaded(prefetch) => {
                        for key in prefetch {
                            self.fetch_quotations_page(key);
                        }
                    }
                    PageOutcome::Failed(message) => self.state.error(message),
                    PageOutcome::Ignored => {}
                }
            }
            QuotationsEvent::Loaded { id, result } => {
                let Some(form) = self
                    .state
                    .quotations
                    .form
                    .as_mut()
                    .filter(|form| form.id == Some(id))
                else {
                    return;
                };
                match result {
                    Ok(view) => {
                        form.draft = QuotationDraft::from_view(&view, today());
                        form.loading = false;
                    }
                    Err(err) => {
                        self.state
                            .error(err.user_message("Failed to load quotation"));
                        self.mount_quotations_list();
                    }
                }
            }
            QuotationsEvent::Reference(result) => match result {
                Ok(reference) => {
                    if let Some(form) = self.state.quotations.form.as_mut() {
                        if form.id.is_none() {
                            form.draft.reference = reference;
                        }
                    }
                }
                Err(err) => {
                    self.state
                        .error(err.user_message("Failed to load quotation reference"));
                }
            },
            QuotationsEvent::Buyers(result) => match result {
                Ok(buyers) => {
                    if let Some(form) = self.state.quotations.form.as_mut() {
                        form.buyers = buyers;
                    }
                }
                Err(err) => self.state.error(err.user_message("Failed to load buyers")),
            },
            QuotationsEvent::Catalog(result) => match result {
                Ok(catalog) => {
                    if let Some(form) = self.state.quotations.form.as_mut() {
                        form.catalog = catalog;
                    }
                }
                Err(err) => self.state.error(err.user_message("Failed to load items")),
            },
            QuotationsEvent::Saved { id, result } => self.on_quotation_saved(id, result),
            QuotationsEvent::LineDeleted { line_id, result } => {
                self.on_line_deleted(line_id, result);
            }
        }
    }

    fn on_quotation_saved(&mut self, id: Option<u64>, result: ClientResult<()>) {
        let Some(form) = self.state.quotations.form.as_mut() else {
            return;
        };
        form.saving = false;
        match result {
            Ok(()) => {
                self.state.quotations.view.invalidate();
                self.state.dashboard.invalidate();
                self.state.success(match id {
                    Some(_) => "Quotation updated successfully",
                    None => "Quotation created successfully",
                });
                self.mount_quotations_list();
            }
            Err(err) => {
                if let Some(errors) = err.field_errors() {
                    form.errors.replace_with_server(errors);
                    form.focus_first_error();
                }
                let fallback = match id {
                    Some(_) => "Failed to update quotation",
                    None => "Failed to create quotation",
                };
                self.state.error(err.user_message(fallback));
            }
        }
    }

    fn on_line_deleted(&mut self, line_id: u64, result: ClientResult<()>) {
        let Some(form) = self.state.quotations.form.as_mut() else {
            return;
        };
        if form
            .draft
            .pending_removal()
            .is_none_or(|pending| pending.id != line_id)
        {
            return;
        }
        form.deleting = false;
        match result {
            Ok(()) => {
                let removed = form.draft.complete_removal();
                form.clamp_focus();
                self.state.quotations.view.invalidate();
                match removed {
                    Ok(()) => self.state.success("Item deleted successfully"),
                    Err(err) => self.report_form_error(err),
                }
            }
            Err(err) => self.state.error(err.user_message("Failed to delete item")),
        }
    }
}

#[cfg(test)]
mod tests {
    use api_types::quotation::{QuotationStatus, QuotationSubView};

    use super::*;
    use crate::{
        app::{Section, ToastLevel},
        config::AppConfig,
    };

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 2).unwrap()
    }

    fn catalog_item(id: u64, price: f64) -> ItemView {
        ItemView {
            id,
            item_name: format!("Item {id}"),
            item_type: None,
            item_description: None,
            item_price: price,
            item_tax: 0.0,
            item_size: None,
            item_unit: Some("pcs".to_string()),
            item_status: Default::default(),
        }
    }

    fn edit_form() -> QuotationFormState {
        let mut form = QuotationFormState::edit(3, day());
        let view = QuotationView {
            id: 3,
            quotation_ref: "QT-3".to_string(),
            quotation_date: Some(day()),
            quotation_buyer_id: 1,
            quotation_valid_date: Some(day()),
            quotation_remarks: None,
            quotation_status: QuotationStatus::Pending,
            subs: vec![QuotationSubView {
                id: 30,
                quotation_sub_item_id: 7,
                quotation_sub_size: None,
                quotation_sub_unit: None,
                quotation_sub_qnty: 1.0,
                quotation_sub_rate: 4.0,
                quotation_sub_discount: 0.0,
                quotation_sub_tax: 0.0,
                quotation_sub_amount: 4.0,
            }],
        };
        form.draft = QuotationDraft::from_view(&view, day());
        form.loading = false;
        form
    }

    #[test]
    fn focus_order_covers_header_status_and_lines() {
        let create = QuotationFormState::create(day());
        assert_eq!(create.focus_order().len(), 4 + 7);
        assert!(!create.focus_order().contains(&QuotationFocus::Status));

        let edit = edit_form();
        assert_eq!(edit.focus_order()[4], QuotationFocus::Status);
    }

    #[test]
    fn first_error_takes_focus() {
        let mut form = QuotationFormState::create(day());
        form.draft.buyer_id = "2".to_string();
        form.draft.valid_until = "2026-06-01".to_string();
        form.errors = form.draft.validate_new().unwrap_err();
        form.focus_first_error();
        assert_eq!(form.focus, QuotationFocus::Line(0, LineField::Item));
    }

    #[test]
    fn picker_selection_fills_line() {
        let mut form = QuotationFormState::create(day());
        form.catalog = vec![catalog_item(1, 10.0), catalog_item(2, 25.0)];
        form.focus = QuotationFocus::Line(0, LineField::Item);
        assert_eq!(form.open_picker(), None);

        let picker = Picker {
            kind: PickerKind::Item(0),
            selected: 1,
        };
        form.choose(picker).unwrap();
        assert_eq!(form.draft.lines()[0].rate, "25");
        assert_eq!(form.item_name(0), Some("Item 2"));
    }

    #[test]
    fn empty_picker_reports_message() {
        let mut form = QuotationFormState::create(day());
        form.focus = QuotationFocus::Header(QuotationField::Buyer);
        assert_eq!(form.open_picker(), Some("No buyers available"));
        assert!(form.picker.is_none());
    }

    #[test]
    fn typing_edits_line_and_clears_error() {
        let mut form = edit_form();
        form.errors.insert("item_0_qnty", "Quantity is required");
        form.focus = QuotationFocus::Line(0, LineField::Quantity);
        form.edit_focused(|value| value.push('2')).unwrap();
        assert_eq!(form.draft.lines()[0].quantity, "12");
        assert_eq!(form.errors.get("item_0_qnty"), None);
        assert_eq!(form.draft.lines()[0].amount(), "48.00");
    }

    #[test]
    fn status_cycles_on_input() {
        let mut form = edit_form();
        form.focus = QuotationFocus::Status;
        form.edit_focused(|value| value.push(' ')).unwrap();
        assert_eq!(form.draft.status, QuotationStatus::Accepted);
    }

    fn app_with_form(form: QuotationFormState) -> App {
        let config = AppConfig {
            state_path: std::env::temp_dir()
                .join(format!("quotedesk_quotations_{}", std::process::id()))
                .join("state.json")
                .to_string_lossy()
                .into_owned(),
            ..AppConfig::default()
        };
        let mut app = App::new(config).unwrap();
        app.state.section = Section::Quotations;
        app.state.quotations.mode = QuotationsMode::Form;
        app.state.quotations.form = Some(form);
        app
    }

    #[test]
    fn stale_line_focus_shows_error_and_keeps_running() {
        let mut form = edit_form();
        form.focus = QuotationFocus::Line(4, LineField::Quantity);
        let mut app = app_with_form(form);

        assert!(app.quotation_form_key(AppAction::Input('3')).is_ok());
        let toast = app.state.toast.take().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        let form = app.state.quotations.form.as_ref().unwrap();
        assert_eq!(form.focus, QuotationFocus::Line(0, LineField::Quantity));
        assert_eq!(form.draft.lines()[0].quantity, "1");

        app.state.quotations.form.as_mut().unwrap().focus =
            QuotationFocus::Line(9, LineField::Rate);
        assert!(app.quotation_form_key(AppAction::RemoveRow).is_ok());
        assert_eq!(app.state.toast.as_ref().map(|t| t.level), Some(ToastLevel::Error));
        assert_eq!(app.state.quotations.form.as_ref().unwrap().draft.lines().len(), 1);
    }
}
