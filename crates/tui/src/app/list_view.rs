use std::time::Instant;

use api_types::pagination::Page;
use engine::listing::{ListConfig, ListController, Navigation, PageKey};

use crate::{client::ClientError, ui::keymap::AppAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Browse,
    Search,
    Jump,
}

/// Result of feeding a fetched page back to the list.
#[derive(Debug, PartialEq, Eq)]
pub enum PageOutcome {
    /// Pages to prefetch next.
    Loaded(Vec<PageKey>),
    /// The current page failed; the message goes to the user.
    Failed(String),
    /// A prefetch failed; nothing to show.
    Ignored,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ListKeyOutcome {
    Handled,
    Invalid(String),
    Unhandled,
}

/// A searchable, paginated table with its cursor and inline error.
#[derive(Debug)]
pub struct ListView<T> {
    pub list: ListController<T>,
    pub mode: ListMode,
    pub jump_input: String,
    pub selected: usize,
    pub error: Option<String>,
    failed: Option<PageKey>,
}

impl<T> ListView<T> {
    pub fn new(config: ListConfig) -> Self {
        Self {
            list: ListController::new(config),
            mode: ListMode::Browse,
            jump_input: String::new(),
            selected: 0,
            error: None,
            failed: None,
        }
    }

    pub fn rows(&self) -> &[T] {
        self.list
            .visible_page()
            .map(|page| page.data.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_row(&self) -> Option<&T> {
        self.rows().get(self.selected)
    }

    pub fn is_typing(&self) -> bool {
        self.mode != ListMode::Browse
    }

    /// Commits a debounced search and returns the page to fetch, if any. A
    /// page that just failed is not fetched again until [`retry`](Self::retry).
    pub fn tick(&mut self, now: Instant) -> Option<PageKey> {
        if self.list.tick(now) {
            self.selected = 0;
        }
        if self.failed.as_ref() == Some(&self.list.current_key()) {
            return None;
        }
        self.list.request(now)
    }

    pub fn apply(
        &mut self,
        key: PageKey,
        result: Result<Page<T>, ClientError>,
        now: Instant,
        failure: &str,
    ) -> PageOutcome {
        let is_current = key == self.list.current_key();
        match result {
            Ok(page) => {
                if is_current {
                    self.error = None;
                    self.failed = None;
                }
                let prefetch = self.list.on_loaded(key, page, now);
                self.selected = self.selected.min(self.rows().len().saturating_sub(1));
                PageOutcome::Loaded(prefetch)
            }
            Err(err) => {
                self.list.on_failed(&key);
                if !is_current {
                    tracing::debug!(page = key.page, "prefetch failed: {err}");
                    return PageOutcome::Ignored;
                }
                let message = err.user_message(failure);
                self.error = Some(message.clone());
                self.failed = Some(key);
                PageOutcome::Failed(message)
            }
        }
    }

    /// Clears the failure so the current page is fetched again.
    pub fn retry(&mut self) {
        self.error = None;
        self.failed = None;
    }

    /// Forgets every cached page.
    pub fn invalidate(&mut self) {
        self.list.invalidate();
        self.retry();
    }

    /// Handles the keys shared by every list: row and page navigation,
    /// search and page jump. Other keys are left to the caller.
    pub fn handle_key(&mut self, action: AppAction, now: Instant) -> ListKeyOutcome {
        match self.mode {
            ListMode::Browse => self.browse_key(action),
            ListMode::Search => {
                match action {
                    AppAction::Input(ch) => {
                        let mut text = self.list.raw_search().to_string();
                        text.push(ch);
                        self.list.set_search(text, now);
                    }
                    AppAction::Backspace => {
                        let mut text = self.list.raw_search().to_string();
                        text.pop();
                        self.list.set_search(text, now);
                    }
                    AppAction::Submit | AppAction::Cancel => self.mode = ListMode::Browse,
                    _ => {}
                }
                ListKeyOutcome::Handled
            }
            ListMode::Jump => match action {
                AppAction::Input(ch) if ch.is_ascii_digit() => {
                    self.jump_input.push(ch);
                    ListKeyOutcome::Handled
                }
                AppAction::Backspace => {
                    self.jump_input.pop();
                    ListKeyOutcome::Handled
                }
                AppAction::Cancel => {
                    self.mode = ListMode::Browse;
                    self.jump_input.clear();
                    ListKeyOutcome::Handled
                }
                AppAction::Submit => self.submit_jump(now),
                _ => ListKeyOutcome::Handled,
            },
        }
    }

    fn browse_key(&mut self, action: AppAction) -> ListKeyOutcome {
        match action {
            AppAction::Up => self.selected = self.selected.saturating_sub(1),
            AppAction::Down => {
                let last = self.rows().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
            }
            AppAction::Right | AppAction::NextPage => {
                if self.list.next_page() {
                    self.selected = 0;
                }
            }
            AppAction::Left | AppAction::PrevPage => {
                if self.list.prev_page() {
                    self.selected = 0;
                }
            }
            AppAction::Input('/') => self.mode = ListMode::Search,
            AppAction::Input('g') => {
                self.jump_input.clear();
                self.mode = ListMode::Jump;
            }
            AppAction::Input('r') => self.retry(),
            _ => return ListKeyOutcome::Unhandled,
        }
        ListKeyOutcome::Handled
    }

    fn submit_jump(&mut self, now: Instant) -> ListKeyOutcome {
        let target = self.jump_input.parse::<u32>().unwrap_or(0);
        self.jump_input.clear();
        self.mode = ListMode::Browse;
        match self.list.jump_to(target, now) {
            Ok(navigation) => {
                self.selected = 0;
                if navigation == Navigation::Fetch {
                    self.retry();
                }
                ListKeyOutcome::Handled
            }
            Err(err) => ListKeyOutcome::Invalid(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn page(number: u32, last: u32) -> Page<u32> {
        Page {
            data: vec![1, 2, 3],
            current_page: number,
            last_page: last,
            per_page: 10,
            total: 30,
        }
    }

    #[test]
    fn failed_page_waits_for_retry() {
        let now = Instant::now();
        let mut view = ListView::<u32>::new(ListConfig::default());
        let key = view.tick(now).unwrap();

        let outcome = view.apply(key, Err(ClientError::Server(String::new())), now, "Failed");
        assert_eq!(outcome, PageOutcome::Failed("Failed".to_string()));
        assert_eq!(view.error.as_deref(), Some("Failed"));
        assert_eq!(view.tick(now), None);

        view.handle_key(AppAction::Input('r'), now);
        assert_eq!(view.tick(now), Some(PageKey::new("", 1)));
    }

    #[test]
    fn typed_search_commits_after_debounce() {
        let start = Instant::now();
        let mut view = ListView::<u32>::new(ListConfig::default());
        let key = view.tick(start).unwrap();
        view.apply(key, Ok(page(1, 3)), start, "Failed");

        assert_eq!(view.handle_key(AppAction::Input('/'), start), ListKeyOutcome::Handled);
        for ch in "nut".chars() {
            view.handle_key(AppAction::Input(ch), start);
        }
        view.handle_key(AppAction::Backspace, start);
        view.handle_key(AppAction::Submit, start);
        assert!(!view.is_typing());

        assert_eq!(view.tick(start + Duration::from_millis(100)), None);
        assert_eq!(
            view.tick(start + Duration::from_millis(600)),
            Some(PageKey::new("nu", 1))
        );
    }

    #[test]
    fn jump_outside_range_is_reported() {
        let now = Instant::now();
        let mut view = ListView::<u32>::new(ListConfig::default());
        let key = view.tick(now).unwrap();
        view.apply(key, Ok(page(1, 3)), now, "Failed");

        view.handle_key(AppAction::Input('g'), now);
        view.handle_key(AppAction::Input('9'), now);
        let outcome = view.handle_key(AppAction::Submit, now);
        assert!(matches!(outcome, ListKeyOutcome::Invalid(message) if message.contains("between 1 and 3")));
        assert_eq!(view.list.page_number(), 1);
    }

    #[test]
    fn prefetch_failure_is_silent() {
        let now = Instant::now();
        let mut view = ListView::<u32>::new(ListConfig::default());
        let key = view.tick(now).unwrap();
        let PageOutcome::Loaded(prefetch) = view.apply(key, Ok(page(1, 3)), now, "Failed") else {
            panic!("current page should load");
        };
        let next = prefetch[0].clone();
        let outcome = view.apply(next, Err(ClientError::NotFound), now, "Failed");
        assert_eq!(outcome, PageOutcome::Ignored);
        assert!(view.error.is_none());
        assert_eq!(view.rows().len(), 3);
    }

    #[test]
    fn unhandled_keys_fall_through() {
        let now = Instant::now();
        let mut view = ListView::<u32>::new(ListConfig::default());
        assert_eq!(view.handle_key(AppAction::Submit, now), ListKeyOutcome::Unhandled);
        assert_eq!(view.handle_key(AppAction::Input('n'), now), ListKeyOutcome::Unhandled);
    }
}
