//! Paginated search list controller.
//!
//! The controller owns the list's navigation state and decides which pages
//! must be fetched; the caller performs the requests and reports back with
//! [`ListController::on_loaded`] or [`ListController::on_failed`]. Every timing
//! rule takes the current [`Instant`] as an argument.
//!
//! Fetches are keyed by `(committed search, page number)`. A page fetched less
//! than `stale_time` ago is served from the cache. When the current page
//! arrives, its neighbours are scheduled for prefetch.
//!
//! Every key carries the generation it was requested in.
//! [`ListController::invalidate`] starts a new generation, and responses
//! stamped with an older one are dropped.

use std::{
    collections::{HashMap, HashSet},
    time::{Duration, Instant},
};

use api_types::pagination::Page;

use crate::{EngineError, ResultEngine};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    /// Rows per page assumed until a loaded page reports its own.
    pub page_size: u32,
    pub debounce: Duration,
    pub stale_time: Duration,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            stale_time: DEFAULT_STALE_TIME,
        }
    }
}

/// Identity of one fetched page. `page` is 1-based, as the server counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub search: String,
    pub page: u32,
    /// Cache generation the request belongs to.
    pub generation: u64,
}

impl PageKey {
    pub fn new(search: impl Into<String>, page: u32) -> Self {
        Self {
            search: search.into(),
            page,
            generation: 0,
        }
    }

    fn sibling(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// Last-write-wins delay before a typed value is committed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the timer.
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.delay));
    }

    /// Takes the pending value once its timer has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    page: Page<T>,
    fetched_at: Instant,
}

/// Fetched pages with a freshness window.
#[derive(Debug, Clone)]
pub struct PageCache<T> {
    stale_time: Duration,
    entries: HashMap<PageKey, CacheEntry<T>>,
}

impl<T> PageCache<T> {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            entries: HashMap::new(),
        }
    }

    /// Cached page, fresh or not.
    pub fn get(&self, key: &PageKey) -> Option<&Page<T>> {
        self.entries.get(key).map(|entry| &entry.page)
    }

    pub fn is_fresh(&self, key: &PageKey, now: Instant) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| now.saturating_duration_since(entry.fetched_at) < self.stale_time)
    }

    pub fn insert(&mut self, key: PageKey, page: Page<T>, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                page,
                fetched_at: now,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of a page jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The target page is cached and fresh; nothing to fetch.
    Cached,
    /// The target page must go through [`ListController::request`].
    Fetch,
}

#[derive(Debug, Clone)]
pub struct ListController<T> {
    config: ListConfig,
    raw_search: String,
    search: String,
    page_index: u32,
    page_count: u32,
    debouncer: Debouncer,
    cache: PageCache<T>,
    in_flight: HashSet<PageKey>,
    displayed: Option<PageKey>,
    generation: u64,
}

impl<T> ListController<T> {
    pub fn new(config: ListConfig) -> Self {
        Self {
            config,
            raw_search: String::new(),
            search: String::new(),
            page_index: 0,
            page_count: 1,
            debouncer: Debouncer::new(config.debounce),
            cache: PageCache::new(config.stale_time),
            in_flight: HashSet::new(),
            displayed: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> ListConfig {
        self.config
    }

    /// Search text as typed.
    pub fn raw_search(&self) -> &str {
        &self.raw_search
    }

    /// Search text the fetches use.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// 0-based index of the current page.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// 1-based number of the current page.
    pub fn page_number(&self) -> u32 {
        self.page_index + 1
    }

    /// Page count reported by the last loaded current page.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn current_key(&self) -> PageKey {
        PageKey {
            search: self.search.clone(),
            page: self.page_number(),
            generation: self.generation,
        }
    }

    /// Records typed search text and restarts the debounce timer.
    pub fn set_search(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.raw_search.clone_from(&text);
        self.debouncer.push(text, now);
    }

    /// Commits the debounced search once its delay has elapsed. A new
    /// committed value starts again from the first page, including the first
    /// search typed into an empty box. Returns whether the committed search
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(text) = self.debouncer.poll(now) else {
            return false;
        };
        if text == self.search {
            return false;
        }
        tracing::debug!(search = %text, "search committed");
        self.search = text;
        self.page_index = 0;
        true
    }

    /// Key to fetch for the current page, unless it is fresh in the cache or
    /// already being fetched. The returned key is marked in flight.
    pub fn request(&mut self, now: Instant) -> Option<PageKey> {
        let key = self.current_key();
        if self.cache.is_fresh(&key, now) || self.in_flight.contains(&key) {
            return None;
        }
        self.in_flight.insert(key.clone());
        Some(key)
    }

    /// Stores a fetched page. When it is the current page, returns the
    /// adjacent pages to prefetch, already marked in flight. Pages requested
    /// before the last invalidation are dropped.
    pub fn on_loaded(&mut self, key: PageKey, page: Page<T>, now: Instant) -> Vec<PageKey> {
        if key.generation != self.generation {
            tracing::debug!(page = key.page, "dropping page requested before invalidation");
            return Vec::new();
        }
        self.in_flight.remove(&key);
        let page_count = page.page_count();
        self.cache.insert(key.clone(), page, now);

        if key != self.current_key() {
            return Vec::new();
        }
        self.page_count = page_count;
        self.displayed = Some(key.clone());

        let mut prefetch = Vec::new();
        if key.page < page_count {
            let next = key.sibling(key.page + 1);
            if !self.cache.is_fresh(&next, now) && !self.in_flight.contains(&next) {
                prefetch.push(next);
            }
        }
        if key.page > 1 {
            let previous = key.sibling(key.page - 1);
            if self.cache.get(&previous).is_none() && !self.in_flight.contains(&previous) {
                prefetch.push(previous);
            }
        }
        for key in &prefetch {
            tracing::debug!(search = %key.search, page = key.page, "prefetching page");
            self.in_flight.insert(key.clone());
        }
        prefetch
    }

    pub fn on_failed(&mut self, key: &PageKey) {
        self.in_flight.remove(key);
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.contains(&self.current_key())
    }

    /// Page to show: the current one when cached, otherwise the last page
    /// shown while the new one loads.
    pub fn visible_page(&self) -> Option<&Page<T>> {
        self.cache.get(&self.current_key()).or_else(|| {
            self.displayed
                .as_ref()
                .and_then(|displayed| self.cache.get(displayed))
        })
    }

    /// Whether [`visible_page`](Self::visible_page) is the current page.
    pub fn is_current_visible(&self) -> bool {
        self.cache.get(&self.current_key()).is_some()
    }

    pub fn next_page(&mut self) -> bool {
        if self.page_number() < self.page_count {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page_index > 0 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    /// Moves to the 1-based page `page` if it exists.
    pub fn jump_to(&mut self, page: u32, now: Instant) -> ResultEngine<Navigation> {
        if page < 1 || page > self.page_count {
            return Err(EngineError::InvalidPage(format!(
                "Page must be between 1 and {}",
                self.page_count
            )));
        }
        self.page_index = page - 1;
        if self.cache.is_fresh(&self.current_key(), now) {
            Ok(Navigation::Cached)
        } else {
            Ok(Navigation::Fetch)
        }
    }

    /// Returns to a stashed 1-based page. Cached pages are dropped so the row
    /// edited meanwhile is fetched again.
    pub fn restore_page(&mut self, page: u32) {
        self.page_index = page.saturating_sub(1);
        self.page_count = self.page_count.max(page);
        self.invalidate();
    }

    /// Forgets every cached page, forcing a re-fetch. Requests still in
    /// flight become stale.
    pub fn invalidate(&mut self) {
        tracing::debug!(pages = self.cache.len(), "list cache invalidated");
        self.generation += 1;
        self.cache.clear();
        self.in_flight.clear();
        self.displayed = None;
    }

    /// Serial number of `row` on the current page, counting from 1 across
    /// pages. Uses the page size the server reported.
    pub fn row_number(&self, row: usize) -> u64 {
        let per_page = self
            .visible_page()
            .map(|page| page.per_page)
            .filter(|per_page| *per_page > 0)
            .unwrap_or(self.config.page_size);
        u64::from(self.page_index) * u64::from(per_page) + row as u64 + 1
    }

    /// Page numbers to offer in the pager: first, current ±1 and last.
    pub fn page_buttons(&self) -> Vec<u32> {
        let current = self.page_number();
        let last = self.page_count;
        let mut pages: Vec<u32> = [1, current.saturating_sub(1), current, current + 1, last]
            .into_iter()
            .filter(|page| (1..=last).contains(page))
            .collect();
        pages.sort_unstable();
        pages.dedup();
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, last: u32) -> Page<u32> {
        Page {
            data: vec![number * 10, number * 10 + 1],
            current_page: number,
            last_page: last,
            per_page: 10,
            total: u64::from(last) * 10,
        }
    }

    fn key(search: &str, page: u32, generation: u64) -> PageKey {
        PageKey {
            generation,
            ..PageKey::new(search, page)
        }
    }

    fn controller() -> ListController<u32> {
        ListController::new(ListConfig::default())
    }

    fn load_current(list: &mut ListController<u32>, last: u32, now: Instant) -> Vec<PageKey> {
        let key = list.request(now).unwrap();
        let number = key.page;
        list.on_loaded(key, page(number, last), now)
    }

    #[test]
    fn debouncer_keeps_last_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.push("a", start);
        debouncer.push("ab", start + Duration::from_millis(300));
        assert_eq!(debouncer.poll(start + Duration::from_millis(600)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(800)),
            Some("ab".to_string())
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn new_search_resets_to_first_page() {
        let start = Instant::now();
        let mut list = controller();
        load_current(&mut list, 5, start);
        assert!(list.next_page());
        assert!(list.next_page());
        assert_eq!(list.page_index(), 2);

        list.set_search("bolt", start);
        assert!(!list.tick(start + Duration::from_millis(499)));
        assert_eq!(list.page_index(), 2);
        assert_eq!(list.raw_search(), "bolt");
        assert_eq!(list.search(), "");

        assert!(list.tick(start + Duration::from_millis(500)));
        assert_eq!(list.search(), "bolt");
        assert_eq!(list.page_index(), 0);
    }

    #[test]
    fn same_search_keeps_page() {
        let start = Instant::now();
        let mut list = controller();
        load_current(&mut list, 5, start);
        list.next_page();

        list.set_search("x", start);
        list.set_search("", start + Duration::from_millis(100));
        assert!(!list.tick(start + Duration::from_secs(1)));
        assert_eq!(list.page_index(), 1);
    }

    #[test]
    fn fresh_pages_are_not_refetched() {
        let start = Instant::now();
        let mut list = controller();
        load_current(&mut list, 3, start);
        list.next_page();
        list.prev_page();

        assert_eq!(list.request(start + Duration::from_secs(60)), None);
        assert_eq!(
            list.request(start + DEFAULT_STALE_TIME),
            Some(PageKey::new("", 1))
        );
    }

    #[test]
    fn in_flight_requests_are_not_duplicated() {
        let now = Instant::now();
        let mut list = controller();
        assert!(list.request(now).is_some());
        assert!(list.is_loading());
        assert_eq!(list.request(now), None);

        list.on_failed(&PageKey::new("", 1));
        assert!(!list.is_loading());
        assert!(list.request(now).is_some());
    }

    #[test]
    fn loading_current_page_prefetches_neighbours() {
        let now = Instant::now();
        let mut list = controller();

        let prefetch = load_current(&mut list, 3, now);
        assert_eq!(prefetch, [PageKey::new("", 2)]);
        assert!(list.on_loaded(PageKey::new("", 2), page(2, 3), now).is_empty());

        assert!(list.jump_to(3, now).is_ok());
        let prefetch = load_current(&mut list, 3, now);
        assert!(prefetch.is_empty(), "page 2 is cached, page 4 does not exist");
    }

    #[test]
    fn landing_mid_list_prefetches_both_sides() {
        let now = Instant::now();
        let mut list = controller();
        list.restore_page(4);
        let prefetch = load_current(&mut list, 9, now);
        assert_eq!(prefetch, [key("", 5, 1), key("", 3, 1)]);
    }

    #[test]
    fn jump_validates_range() {
        let now = Instant::now();
        let mut list = controller();
        load_current(&mut list, 4, now);

        assert!(matches!(list.jump_to(0, now), Err(EngineError::InvalidPage(_))));
        assert!(matches!(list.jump_to(5, now), Err(EngineError::InvalidPage(_))));
        assert_eq!(list.page_number(), 1);

        let prefetched = PageKey::new("", 2);
        list.on_loaded(prefetched, page(2, 4), now);
        assert_eq!(list.jump_to(2, now), Ok(Navigation::Cached));
        assert_eq!(list.jump_to(4, now), Ok(Navigation::Fetch));
        assert_eq!(list.page_index(), 3);
    }

    #[test]
    fn previous_data_stays_visible_while_loading() {
        let now = Instant::now();
        let mut list = controller();
        load_current(&mut list, 9, now);
        list.jump_to(6, now).unwrap();
        list.request(now);

        assert!(!list.is_current_visible());
        assert_eq!(list.visible_page().map(|p| p.current_page), Some(1));
    }

    #[test]
    fn invalidate_forces_refetch() {
        let now = Instant::now();
        let mut list = controller();
        load_current(&mut list, 2, now);
        list.invalidate();
        assert!(list.visible_page().is_none());
        assert_eq!(list.request(now), Some(key("", 1, 1)));
    }

    #[test]
    fn response_from_before_invalidation_is_dropped() {
        let now = Instant::now();
        let mut list = controller();
        let stale = list.request(now).unwrap();
        list.invalidate();
        let fresh = list.request(now).unwrap();
        assert_ne!(stale, fresh);

        let mut updated = page(1, 1);
        updated.data = vec![2];
        list.on_loaded(fresh, updated, now);
        let mut outdated = page(1, 1);
        outdated.data = vec![1];
        assert!(list.on_loaded(stale.clone(), outdated, now).is_empty());

        assert_eq!(list.visible_page().map(|p| p.data.clone()), Some(vec![2]));
        assert_eq!(list.request(now), None);

        list.on_failed(&stale);
        assert!(!list.is_loading());
    }

    #[test]
    fn stale_response_does_not_clear_the_refetch() {
        let now = Instant::now();
        let mut list = controller();
        let stale = list.request(now).unwrap();
        list.invalidate();
        assert!(list.request(now).is_some());

        list.on_loaded(stale, page(1, 1), now);
        assert!(list.is_loading());
        assert!(list.visible_page().is_none());
    }

    #[test]
    fn first_search_from_empty_box_resets_page() {
        let start = Instant::now();
        let mut list = controller();
        load_current(&mut list, 5, start);
        list.next_page();

        list.set_search("bolt", start);
        assert!(list.tick(start + DEFAULT_DEBOUNCE));
        assert_eq!(list.page_number(), 1);
    }

    #[test]
    fn rows_are_numbered_across_pages() {
        let now = Instant::now();
        let mut list = controller();
        load_current(&mut list, 3, now);
        assert_eq!(list.row_number(0), 1);
        list.next_page();
        list.next_page();
        assert_eq!(list.row_number(4), 25);
    }

    #[test]
    fn rows_follow_server_page_size() {
        let now = Instant::now();
        let mut list = ListController::new(ListConfig {
            page_size: 25,
            ..ListConfig::default()
        });
        list.restore_page(2);
        let key = list.request(now).unwrap();
        list.on_loaded(key, page(2, 3), now);
        assert_eq!(list.row_number(0), 11);
    }

    #[test]
    fn pager_shows_edges_and_neighbours() {
        let now = Instant::now();
        let mut list = controller();
        list.restore_page(5);
        load_current(&mut list, 10, now);
        assert_eq!(list.page_buttons(), [1, 4, 5, 6, 10]);

        let mut single = controller();
        load_current(&mut single, 1, now);
        assert_eq!(single.page_buttons(), [1]);
    }
}
