use std::time::Instant;

use api_types::{
    item::{ItemStatus, ItemView},
    pagination::Page,
};
use engine::{
    form::FieldErrors,
    item::{ItemDraft, ItemField},
    listing::{ListConfig, PageKey},
    status::StatusToggles,
};

use crate::{client::ClientError, error::Result, ui::keymap::AppAction};

use super::{
    App, AppEvent,
    list_view::{ListKeyOutcome, ListView, PageOutcome},
};

const LIST_NAME: &str = "items";

#[derive(Debug)]
pub enum ItemsEvent {
    Page {
        key: PageKey,
        result: std::result::Result<Page<ItemView>, ClientError>,
    },
    Loaded {
        id: u64,
        result: std::result::Result<ItemView, ClientError>,
    },
    Saved {
        id: Option<u64>,
        result: std::result::Result<(), ClientError>,
    },
    StatusUpdated {
        id: u64,
        status: ItemStatus,
        result: std::result::Result<(), ClientError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsMode {
    List,
    Form,
}

/// Create or edit form of one item.
#[derive(Debug)]
pub struct ItemFormState {
    /// `None` on create.
    pub id: Option<u64>,
    pub draft: ItemDraft,
    pub original: ItemDraft,
    pub focus: ItemField,
    pub errors: FieldErrors,
    pub loading: bool,
    pub saving: bool,
}

impl ItemFormState {
    fn create() -> Self {
        Self {
            id: None,
            draft: ItemDraft::new(),
            original: ItemDraft::new(),
            focus: ItemField::Name,
            errors: FieldErrors::new(),
            loading: false,
            saving: false,
        }
    }

    fn edit(id: u64) -> Self {
        Self {
            id: Some(id),
            loading: true,
            ..Self::create()
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.is_dirty(&self.original)
    }

    fn move_focus(&mut self, step: isize) {
        let fields = ItemField::ALL;
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = (current as isize + step).rem_euclid(fields.len() as isize) as usize;
        self.focus = fields[next];
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        if self.focus == ItemField::Status {
            self.draft.toggle_status();
        } else {
            let mut value = self.draft.field(self.focus).to_string();
            edit(&mut value);
            self.draft.set_field(self.focus, &value);
        }
        if self.errors.get(self.focus.key()).is_some() {
            self.draft.revalidate_field(self.focus, &mut self.errors);
        }
    }

    /// Moves the cursor to the first invalid field.
    fn focus_first_error(&mut self) {
        if let Some(field) = self
            .errors
            .first()
            .and_then(|error| ItemField::from_key(&error.field))
        {
            self.focus = field;
        }
    }
}

#[derive(Debug)]
pub struct ItemsState {
    pub view: ListView<ItemView>,
    pub mode: ItemsMode,
    pub form: Option<ItemFormState>,
    pub toggles: StatusToggles,
}

impl ItemsState {
    pub fn new(config: ListConfig) -> Self {
        Self {
            view: ListView::new(config),
            mode: ItemsMode::List,
            form: None,
            toggles: StatusToggles::new(),
        }
    }

    pub fn is_typing(&self) -> bool {
        match self.mode {
            ItemsMode::List => self.view.is_typing(),
            ItemsMode::Form => true,
        }
    }
}

impl App {
    /// Shows the item list, reopening the stashed page after a drill-down.
    pub(super) fn mount_items_list(&mut self) {
        self.state.items.mode = ItemsMode::List;
        self.state.items.form = None;
        if let Some(page) = self.take_return_page(LIST_NAME) {
            self.state.items.view.list.restore_page(page);
            self.state.items.view.retry();
        }
    }

    pub(super) fn tick_items(&mut self, now: Instant) {
        if self.state.items.mode != ItemsMode::List {
            return;
        }
        if let Some(key) = self.state.items.view.tick(now) {
            self.fetch_items_page(key);
        }
    }

    fn fetch_items_page(&self, key: PageKey) {
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.items(&key).await;
            AppEvent::Items(ItemsEvent::Page { key, result })
        });
    }

    pub(super) fn items_key(&mut self, action: AppAction, now: Instant) -> Result<()> {
        match self.state.items.mode {
            ItemsMode::List => self.items_list_key(action, now),
            ItemsMode::Form => self.item_form_key(action),
        }
        Ok(())
    }

    fn items_list_key(&mut self, action: AppAction, now: Instant) {
        match self.state.items.view.handle_key(action, now) {
            ListKeyOutcome::Handled => return,
            ListKeyOutcome::Invalid(message) => {
                self.state.error(message);
                return;
            }
            ListKeyOutcome::Unhandled => {}
        }

        match action {
            AppAction::Input('n') => {
                self.state.items.form = Some(ItemFormState::create());
                self.state.items.mode = ItemsMode::Form;
            }
            AppAction::Submit => {
                let Some(id) = self.state.items.view.selected_row().map(|item| item.id) else {
                    return;
                };
                let page = self.state.items.view.list.page_number();
                self.stash_return_page(LIST_NAME, page);
                self.open_item_edit(id);
            }
            AppAction::Input('s') => self.toggle_selected_status(),
            _ => {}
        }
    }

    fn open_item_edit(&mut self, id: u64) {
        self.state.items.form = Some(ItemFormState::edit(id));
        self.state.items.mode = ItemsMode::Form;
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.item(id).await;
            AppEvent::Items(ItemsEvent::Loaded { id, result })
        });
    }

    fn toggle_selected_status(&mut self) {
        let Some((id, current)) = self
            .state
            .items
            .view
            .selected_row()
            .map(|item| (item.id, item.item_status))
        else {
            return;
        };
        let role = self.state.role.clone();
        let Some(status) = self.state.items.toggles.begin(id, current, &role) else {
            return;
        };
        tracing::info!(id, status = status.as_str(), "updating item status");
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.update_item_status(id, status).await;
            AppEvent::Items(ItemsEvent::StatusUpdated { id, status, result })
        });
    }

    fn item_form_key(&mut self, action: AppAction) {
        if action == AppAction::Cancel || self.state.items.form.is_none() {
            self.mount_items_list();
            return;
        }
        let Some(form) = self.state.items.form.as_mut() else {
            return;
        };
        if form.loading || form.saving {
            return;
        }
        match action {
            AppAction::NextField | AppAction::Down => form.move_focus(1),
            AppAction::PrevField | AppAction::Up => form.move_focus(-1),
            AppAction::Input(ch) => form.edit_focused(|value| value.push(ch)),
            AppAction::Backspace => form.edit_focused(|value| {
                value.pop();
            }),
            AppAction::Left | AppAction::Right if form.focus == ItemField::Status => {
                form.draft.toggle_status();
            }
            AppAction::Submit | AppAction::Save => self.submit_item_form(),
            _ => {}
        }
    }

    fn submit_item_form(&mut self) {
        let Some(form) = self.state.items.form.as_mut() else {
            return;
        };
        match form.draft.validate() {
            Err(errors) => {
                form.errors = errors;
                form.focus_first_error();
                self.state.error("Please fix the errors in the form");
            }
            Ok(valid) => {
                form.errors = FieldErrors::new();
                form.saving = true;
                let id = form.id;
                let client = self.client.clone();
                self.spawn(async move {
                    let result = match id {
                        Some(id) => client.update_item(id, &valid.into_update()).await,
                        None => client.create_item(&valid.into_new()).await,
                    };
                    AppEvent::Items(ItemsEvent::Saved { id, result })
                });
            }
        }
    }

    pub(super) fn on_items_event(&mut self, event: ItemsEvent, now: Instant) -> Result<()> {
        match event {
            ItemsEvent::Page { key, result } => {
                match self
                    .state
                    .items
                    .view
                    .apply(key, result, now, "Failed to load items")
                {
                    PageOutcome::Loaded(prefetch) => {
                        for key in prefetch {
                            self.fetch_items_page(key);
                        }
                    }
                    PageOutcome::Failed(message) => self.state.error(message),
                    PageOutcome::Ignored => {}
                }
            }
            ItemsEvent::Loaded { id, result } => {
                let Some(form) = self
                    .state
                    .items
                    .form
                    .as_mut()
                    .filter(|form| form.id == Some(id))
                else {
                    return Ok(());
                };
                match result {
                    Ok(item) => {
                        form.draft = ItemDraft::from_view(&item);
                        form.original = form.draft.clone();
                        form.loading = false;
                    }
                    Err(err) => {
                        tracing::warn!(id, "failed to load item: {err}");
                        self.state
                            .error("Failed to load item data. Please try again.");
                        self.mount_items_list();
                    }
                }
            }
            ItemsEvent::Saved { id, result } => self.on_item_saved(id, result),
            ItemsEvent::StatusUpdated { id, status, result } => {
                self.state.items.toggles.finish(id);
                match result {
                    Ok(()) => {
                        self.state.items.view.invalidate();
                        self.state
                            .success(format!("Item status changed to {}", status.as_str()));
                    }
                    Err(err) => {
                        self.state
                            .error(err.user_message("Failed to update item status"));
                    }
                }
            }
        }
        Ok(())
    }

    fn on_item_saved(&mut self, id: Option<u64>, result: std::result::Result<(), ClientError>) {
        let Some(form) = self.state.items.form.as_mut() else {
            return;
        };
        form.saving = false;
        match result {
            Ok(()) => {
                self.state.items.view.invalidate();
                self.state.success(match id {
                    Some(_) => "Item updated successfully",
                    None => "Item created successfully",
                });
                self.mount_items_list();
            }
            Err(err) => {
                if let Some(errors) = err.field_errors() {
                    form.errors.replace_with_server(errors);
                    form.focus_first_error();
                }
                let fallback = match id {
                    Some(_) => "Failed to update item",
                    None => "Failed to create item",
                };
                self.state.error(err.user_message(fallback));
            }
        }
    }
}
