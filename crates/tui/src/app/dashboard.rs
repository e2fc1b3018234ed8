use std::time::{Duration, Instant};

use api_types::dashboard::Dashboard;

use crate::{client::ClientError, ui::keymap::AppAction};

use super::{App, AppEvent};

#[derive(Debug)]
pub enum DashboardEvent {
    Loaded(Result<Dashboard, ClientError>),
}

#[derive(Debug)]
pub struct DashboardState {
    pub data: Option<Dashboard>,
    pub loading: bool,
    pub error: Option<String>,
    stale_time: Duration,
    fetched_at: Option<Instant>,
}

impl DashboardState {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            stale_time,
            fetched_at: None,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        self.fetched_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.stale_time)
    }

    /// Marks the dashboard stale so the next visit fetches it again.
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }
}

impl App {
    /// Fetches the dashboard unless a fresh copy is loaded or a fetch is
    /// already running.
    pub(super) fn load_dashboard(&mut self, now: Instant) {
        let dashboard = &mut self.state.dashboard;
        if dashboard.loading || dashboard.is_fresh(now) {
            return;
        }
        dashboard.loading = true;
        dashboard.error = None;
        let client = self.client.clone();
        self.spawn(async move {
            AppEvent::Dashboard(DashboardEvent::Loaded(client.dashboard().await))
        });
    }

    pub(super) fn dashboard_key(&mut self, action: AppAction) {
        if action == AppAction::Input('r') {
            self.state.dashboard.invalidate();
            self.load_dashboard(Instant::now());
        }
    }

    pub(super) fn on_dashboard_event(&mut self, event: DashboardEvent, now: Instant) {
        let DashboardEvent::Loaded(result) = event;
        self.state.dashboard.loading = false;
        match result {
            Ok(data) => {
                self.state.dashboard.data = Some(data);
                self.state.dashboard.fetched_at = Some(now);
            }
            Err(err) => {
                let message = err.user_message("Error loading dashboard");
                self.state.dashboard.error = Some(message.clone());
                self.state.error(message);
            }
        }
    }
}
