mod dashboard;
mod items;
mod list_view;
mod profile;
mod quotations;

use std::{
    future::Future,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyEvent};
use engine::status::Role;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    local_state::LocalState,
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use dashboard::DashboardState;
pub use items::{ItemFormState, ItemsMode, ItemsState};
pub use list_view::{ListMode, ListView};
pub use profile::ProfileState;
pub use quotations::{
    Picker, PickerKind, QuotationFocus, QuotationFormState, QuotationsMode, QuotationsState,
};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Items,
    Quotations,
    Settings,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Self::Dashboard,
        Self::Items,
        Self::Quotations,
        Self::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Items => "Items",
            Self::Quotations => "Quotations",
            Self::Settings => "Settings",
        }
    }

    fn from_digit(ch: char) -> Option<Self> {
        let index = ch.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub base_url: String,
    pub role: Role,
    pub toast: Option<ToastState>,
    pub dashboard: DashboardState,
    pub items: ItemsState,
    pub quotations: QuotationsState,
    pub profile: ProfileState,
}

impl AppState {
    fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(ToastLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.notify(ToastLevel::Error, message);
    }

    /// Whether keystrokes currently go into a text input.
    pub fn is_typing(&self) -> bool {
        match self.section {
            Section::Dashboard => false,
            Section::Items => self.items.is_typing(),
            Section::Quotations => self.quotations.is_typing(),
            Section::Settings => true,
        }
    }
}

/// Completion of a background request.
#[derive(Debug)]
pub enum AppEvent {
    Dashboard(dashboard::DashboardEvent),
    Items(items::ItemsEvent),
    Quotations(quotations::QuotationsEvent),
    Profile(profile::ProfileEvent),
}

pub struct App {
    config: AppConfig,
    client: Client,
    local_state: LocalState,
    pub state: AppState,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url, &config.token)?;
        let local_state = LocalState::load(&config.state_path)?;
        let list_config = config.list_config();
        let state = AppState {
            section: Section::Dashboard,
            base_url: config.base_url.clone(),
            role: Role::new(config.user_type.clone()),
            toast: None,
            dashboard: DashboardState::new(list_config.stale_time),
            items: ItemsState::new(list_config),
            quotations: QuotationsState::new(list_config),
            profile: ProfileState::default(),
        };
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            client,
            local_state,
            state,
            events_tx,
            events_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);
        self.enter_section(Section::Dashboard);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key)?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }

            while let Ok(app_event) = self.events_rx.try_recv() {
                self.handle_event(app_event)?;
            }
            self.tick(Instant::now());
        }

        Ok(())
    }

    /// Runs `request` in the background and feeds its result back to the
    /// event loop. Results arriving after the screen changed are still
    /// applied to the state they belong to.
    fn spawn<F>(&self, request: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away on shutdown.
            let _ = tx.send(request.await);
        });
    }

    fn tick(&mut self, now: Instant) {
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.state.toast = None;
        }
        match self.state.section {
            Section::Items => self.tick_items(now),
            Section::Quotations => self.tick_quotations(now),
            Section::Dashboard | Section::Settings => {}
        }
    }

    fn handle_event(&mut self, app_event: AppEvent) -> Result<()> {
        let now = Instant::now();
        match app_event {
            AppEvent::Dashboard(event) => self.on_dashboard_event(event, now),
            AppEvent::Items(event) => self.on_items_event(event, now)?,
            AppEvent::Quotations(event) => self.on_quotations_event(event, now),
            AppEvent::Profile(event) => self.on_profile_event(event),
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return Ok(());
        }

        if let AppAction::Input(ch) = action {
            if !self.state.is_typing() {
                if ch == 'q' {
                    self.should_quit = true;
                    return Ok(());
                }
                if let Some(section) = Section::from_digit(ch) {
                    self.enter_section(section);
                    return Ok(());
                }
            }
        }

        if self.state.section == Section::Settings && action == AppAction::Cancel {
            self.enter_section(Section::Dashboard);
            return Ok(());
        }

        let now = Instant::now();
        match self.state.section {
            Section::Dashboard => self.dashboard_key(action),
            Section::Items => self.items_key(action, now)?,
            Section::Quotations => self.quotations_key(action, now)?,
            Section::Settings => self.profile_key(action),
        }
        Ok(())
    }

    fn enter_section(&mut self, section: Section) {
        self.state.section = section;
        match section {
            Section::Dashboard => self.load_dashboard(Instant::now()),
            Section::Items => self.mount_items_list(),
            Section::Quotations => self.mount_quotations_list(),
            Section::Settings => self.load_profile_once(),
        }
    }

    /// Stashes the page `list` should reopen on after a drill-down.
    fn stash_return_page(&mut self, list: &str, page: u32) {
        self.local_state.stash_page(list, page);
        self.save_local_state();
    }

    /// Consumes the stashed page of `list`, if any.
    fn take_return_page(&mut self, list: &str) -> Option<u32> {
        let page = self.local_state.take_page(list)?;
        self.save_local_state();
        Some(page)
    }

    fn save_local_state(&mut self) {
        if let Err(err) = self.local_state.save(&self.config.state_path) {
            tracing::warn!("failed to save local state: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_select_sections() {
        assert_eq!(Section::from_digit('1'), Some(Section::Dashboard));
        assert_eq!(Section::from_digit('4'), Some(Section::Settings));
        assert_eq!(Section::from_digit('0'), None);
        assert_eq!(Section::from_digit('5'), None);
        assert_eq!(Section::from_digit('x'), None);
    }

    #[test]
    fn error_toast_replaces_previous_notice() {
        let mut state = AppState {
            section: Section::Dashboard,
            base_url: String::new(),
            role: Role::default(),
            toast: None,
            dashboard: DashboardState::new(Duration::from_secs(300)),
            items: ItemsState::new(Default::default()),
            quotations: QuotationsState::new(Default::default()),
            profile: ProfileState::default(),
        };
        state.success("Saved");
        state.error("Network error. Please check your connection.");
        let toast = state.toast.unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(toast.message.starts_with("Network error"));
    }
}
