use chrono::{DateTime, Local};
use ratatui::widgets::ListState;

use crate::source::{FeedItem, Platform};
use crate::widget::ConnectionStatus;
use crate::worker::WidgetMsg;

pub struct App {
    /// The latest shuffled feed.  Replaced wholesale on every fetch.
    pub items: Vec<FeedItem>,
    /// Connection status per enabled platform, in platform order.
    pub connections: Vec<(Platform, ConnectionStatus)>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last fetch status message.
    pub status: String,
    /// A fetch is in flight; further refreshes are ignored until it lands.
    pub fetching: bool,
    pub last_fetched: Option<DateTime<Local>>,
    refresh_requested: bool,
}

impl App {
    pub fn new(platforms: &[Platform]) -> Self {
        Self {
            items: Vec::new(),
            connections: platforms
                .iter()
                .map(|p| (*p, ConnectionStatus::NotConnected))
                .collect(),
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            fetching: false,
            last_fetched: None,
            refresh_requested: false,
        }
    }

    /// Apply one message from the worker.
    pub fn apply(&mut self, msg: WidgetMsg) {
        match msg {
            WidgetMsg::Status(platform, status) => self.set_connection(platform, status),
            WidgetMsg::Items(items) => {
                let count = items.len();
                self.replace_items(items);
                self.fetching = false;
                self.last_fetched = Some(Local::now());
                self.status = format!("Fetched {count} items");
            }
            WidgetMsg::Error(e) => {
                self.fetching = false;
                self.status = format!("Error: {e}");
            }
        }
    }

    /// Swap in a new feed and reset the selection to the top.
    pub fn replace_items(&mut self, items: Vec<FeedItem>) {
        self.items = items;
        let selected = if self.items.is_empty() { None } else { Some(0) };
        self.list_state.select(selected);
    }

    pub fn set_connection(&mut self, platform: Platform, status: ConnectionStatus) {
        if let Some(slot) = self.connections.iter_mut().find(|(p, _)| *p == platform) {
            slot.1 = status;
        }
    }

    // -- refresh -------------------------------------------------------------

    /// Ask for a new fetch.  Ignored while one is already running.
    pub fn request_refresh(&mut self) {
        if !self.fetching {
            self.refresh_requested = true;
        }
    }

    /// Consume a pending refresh request, marking the fetch as in flight.
    pub fn take_refresh_request(&mut self) -> bool {
        if !self.refresh_requested {
            return false;
        }
        self.refresh_requested = false;
        self.fetching = true;
        self.status = "Fetching…".into();
        true
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.items.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(self.items.len() - 1));
        }
    }
}
