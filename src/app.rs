use crate::browser::{open_link, BrowserLauncher};
use crate::feed::FeedSnapshot;
use crate::nav::{NavError, NavState, Navigator, OverlayKind, Widget};
use crate::refresh::{Orchestrator, RefreshOutcome, RefreshRejected};
use crate::sources::{FeedSource, SourceRegistry};
use crate::store::FeedStore;
use crate::ui::Action;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::time::Instant;

/// Placeholder shown in every pane while a refresh cycle runs.
pub const LOADING_TEXT: &str = "Fetching Feed Data";

const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Events
// ============================================================================

/// Messages from background tasks, applied in order on the UI task.
#[derive(Debug)]
pub enum AppEvent {
    RefreshFinished {
        generation: u64,
        outcome: RefreshOutcome,
    },
}

// ============================================================================
// Panes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub label: String,
    /// Dimmed second line (the feed url or entry link).
    pub secondary: Option<String>,
}

/// A selectable list of rows. Selection is `None` only when the list is empty.
#[derive(Debug, Clone, Default)]
pub struct ListPane {
    items: Vec<ListRow>,
    selected: usize,
}

impl ListPane {
    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = 0;
    }

    pub fn add_item(&mut self, label: impl Into<String>, secondary: Option<String>) {
        self.items.push(ListRow {
            label: label.into(),
            secondary,
        });
    }

    pub fn items(&self) -> &[ListRow] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    pub fn selected_row(&self) -> Option<&ListRow> {
        self.items.get(self.selected)
    }

    /// Moves the selection. Returns `false` if `index` is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Returns `true` if the selection moved.
    pub fn next(&mut self) -> bool {
        self.select(self.selected.saturating_add(1))
    }

    pub fn prev(&mut self) -> bool {
        self.selected > 0 && self.select(self.selected - 1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextPane {
    text: String,
}

impl TextPane {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

// ============================================================================
// Overlays
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Done,
    Yes,
    No,
    Okay,
}

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::Done => "Done",
            Button::Yes => "Yes",
            Button::No => "No",
            Button::Okay => "Okay",
        }
    }
}

/// Menu bar item highlighted while its overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRegion {
    Refresh,
    Help,
    Quit,
}

impl MenuRegion {
    pub const ALL: [MenuRegion; 3] = [MenuRegion::Refresh, MenuRegion::Help, MenuRegion::Quit];

    pub fn label(self) -> &'static str {
        match self {
            MenuRegion::Refresh => "(r) Refresh",
            MenuRegion::Help => "(h) Help",
            MenuRegion::Quit => "(q) Quit",
        }
    }

    fn for_overlay(kind: OverlayKind) -> Option<Self> {
        match kind {
            OverlayKind::Refresh => Some(MenuRegion::Refresh),
            OverlayKind::Help => Some(MenuRegion::Help),
            OverlayKind::Quit => Some(MenuRegion::Quit),
            OverlayKind::OpenLink | OverlayKind::Error => None,
        }
    }
}

pub fn help_text(feeds_file: &str) -> String {
    format!(
        "Use Arrow keys to navigate list items\n\n\
         Use Enter and Esc to move between feed and entries lists\n\n\
         Hit Enter on an entry to open it in your default browser\n\n\
         Feeds config are loaded from {}\n\n\
         Ctrl-C or q to exit",
        feeds_file
    )
}

/// The dialog drawn for the open overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub kind: OverlayKind,
    pub message: String,
    pub buttons: &'static [Button],
    pub selected: usize,
    /// Link awaiting confirmation (OpenLink only).
    pub link: Option<String>,
}

impl Modal {
    fn new(kind: OverlayKind, message: impl Into<String>) -> Self {
        let buttons: &'static [Button] = match kind {
            OverlayKind::Help => &[Button::Done],
            OverlayKind::Quit | OverlayKind::Refresh | OverlayKind::OpenLink => {
                &[Button::Yes, Button::No]
            }
            OverlayKind::Error => &[Button::Okay],
        };
        Self {
            kind,
            message: message.into(),
            buttons,
            selected: 0,
            link: None,
        }
    }

    pub fn selected_button(&self) -> Button {
        self.buttons[self.selected.min(self.buttons.len() - 1)]
    }

    pub fn has_button(&self, button: Button) -> bool {
        self.buttons.contains(&button)
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.buttons.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + self.buttons.len() - 1) % self.buttons.len();
    }

    /// Button pressed by Esc; `None` on the error overlay.
    pub fn cancel_button(&self) -> Option<Button> {
        match self.kind {
            OverlayKind::Help => Some(Button::Done),
            OverlayKind::Quit | OverlayKind::Refresh | OverlayKind::OpenLink => Some(Button::No),
            OverlayKind::Error => None,
        }
    }
}

// ============================================================================
// App
// ============================================================================

/// All UI state, owned by the UI task.
///
/// Background work only sees the narrow handles it needs: the orchestrator
/// hands refresh tasks a [`FeedStore`] clone and an event sender.
pub struct App {
    pub nav: Navigator,
    pub feed_list: ListPane,
    pub entries_list: ListPane,
    pub content: TextPane,
    pub modal: Option<Modal>,
    pub menu_highlight: Option<MenuRegion>,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    /// Message of the error that ended the session, if any.
    pub fatal_error: Option<String>,
    /// Shown in the help overlay.
    pub feeds_file: String,

    store: FeedStore,
    sources: Arc<SourceRegistry>,
    orchestrator: Orchestrator,
    launcher: Arc<dyn BrowserLauncher>,
}

impl App {
    pub fn new(
        store: FeedStore,
        orchestrator: Orchestrator,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> Self {
        Self {
            nav: Navigator::new(),
            feed_list: ListPane::default(),
            entries_list: ListPane::default(),
            content: TextPane::default(),
            modal: None,
            menu_highlight: None,
            status_message: None,
            needs_redraw: true,
            fatal_error: None,
            feeds_file: "feeds.json".to_string(),
            store,
            sources: Arc::new(SourceRegistry::default()),
            orchestrator,
            launcher,
        }
    }

    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn is_refreshing(&self) -> bool {
        !self.orchestrator.is_idle()
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds).
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------------
    // Refresh
    // ------------------------------------------------------------------------

    /// Clears the store, shows the loading placeholders and spawns a cycle.
    ///
    /// Rejected without touching anything while a cycle is outstanding.
    pub fn start_refresh(&mut self) -> Result<u64, RefreshRejected> {
        if self.is_refreshing() {
            let rejected = RefreshRejected::AlreadyRunning;
            self.set_status(rejected.to_string());
            return Err(rejected);
        }
        self.store.clear();
        self.show_loading();
        self.orchestrator.start()
    }

    pub fn show_loading(&mut self) {
        self.feed_list.clear();
        self.feed_list.add_item(LOADING_TEXT, None);
        self.entries_list.clear();
        self.entries_list.add_item(LOADING_TEXT, None);
        self.content.set_text(LOADING_TEXT);
    }

    /// Applies a finished cycle: rebuild the lists, or show the error overlay.
    pub fn apply_refresh_outcome(&mut self, generation: u64, outcome: RefreshOutcome) {
        if !self.orchestrator.finish(generation) {
            tracing::debug!(generation, "Ignoring result of stale refresh");
            return;
        }
        match outcome {
            Ok(registry) => {
                self.sources = registry;
                self.rebuild_feed_list();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Refresh failed");
                self.show_error(e.to_string());
            }
        }
    }

    fn rebuild_feed_list(&mut self) {
        self.feed_list.clear();
        for source in self.sources.iter() {
            let snapshot = self.store.get(&source.id);
            self.feed_list
                .add_item(snapshot.display_name.clone(), Some(source.id.clone()));
        }
        self.load_entries();
    }

    // ------------------------------------------------------------------------
    // Browsing
    // ------------------------------------------------------------------------

    pub fn selected_source(&self) -> Option<&FeedSource> {
        if self.is_refreshing() {
            return None;
        }
        self.feed_list
            .selected()
            .and_then(|index| self.sources.get(index))
    }

    pub fn selected_snapshot(&self) -> Option<Arc<FeedSnapshot>> {
        self.selected_source().map(|source| self.store.get(&source.id))
    }

    /// Fills the entries list from the selected feed and shows its first entry.
    fn load_entries(&mut self) {
        self.entries_list.clear();
        if let Some(snapshot) = self.selected_snapshot() {
            for entry in &snapshot.entries {
                let link = (!entry.link.is_empty()).then(|| entry.link.clone());
                self.entries_list.add_item(entry.title.clone(), link);
            }
        }
        self.show_entry();
    }

    /// Shows the selected entry's content, or clears the pane.
    fn show_entry(&mut self) {
        let content = self.selected_snapshot().and_then(|snapshot| {
            self.entries_list
                .selected()
                .and_then(|index| snapshot.entries.get(index))
                .map(|entry| entry.content.clone())
        });
        match content {
            Some(text) => self.content.set_text(text),
            None => self.content.clear(),
        }
    }

    fn browsing(&self) -> bool {
        self.nav.state() == NavState::Browsing && !self.is_refreshing()
    }

    pub fn select_feed(&mut self, index: usize) -> bool {
        if !self.browsing() || !self.feed_list.select(index) {
            return false;
        }
        self.load_entries();
        true
    }

    pub fn select_entry(&mut self, index: usize) -> bool {
        if !self.browsing() || !self.entries_list.select(index) {
            return false;
        }
        self.show_entry();
        true
    }

    /// Moves the selection of the focused list by one row.
    pub fn move_selection(&mut self, down: bool) {
        if !self.browsing() {
            return;
        }
        let (list, is_feeds) = match self.nav.focused() {
            Widget::FeedList => (&mut self.feed_list, true),
            Widget::EntriesList => (&mut self.entries_list, false),
            Widget::Modal => return,
        };
        let moved = if down { list.next() } else { list.prev() };
        if moved {
            if is_feeds {
                self.load_entries();
            } else {
                self.show_entry();
            }
        }
    }

    /// Enter on the focused list.
    pub fn activate(&mut self) {
        if !self.browsing() {
            return;
        }
        match self.nav.focused() {
            Widget::FeedList => self.focus(Widget::EntriesList),
            Widget::EntriesList => self.confirm_open_entry(),
            Widget::Modal => {}
        }
    }

    /// Esc on the entries list returns to the feed list.
    pub fn back(&mut self) {
        if self.nav.state() == NavState::Browsing && self.nav.focused() == Widget::EntriesList {
            self.focus(Widget::FeedList);
        }
    }

    fn focus(&mut self, widget: Widget) {
        if let Err(e) = self.nav.focus(widget) {
            tracing::debug!(error = %e, "Focus change refused");
        }
    }

    fn confirm_open_entry(&mut self) {
        let link = self.selected_snapshot().and_then(|snapshot| {
            self.entries_list
                .selected()
                .and_then(|index| snapshot.entries.get(index))
                .map(|entry| entry.link.clone())
        });
        if let Some(link) = link {
            if self.open_overlay(OverlayKind::OpenLink).is_ok() {
                if let Some(modal) = self.modal.as_mut() {
                    modal.link = Some(link);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------------

    /// Opens an overlay with its standard message.
    ///
    /// Refused while another overlay is open; see [`App::show_error`] for errors.
    pub fn open_overlay(&mut self, kind: OverlayKind) -> Result<(), NavError> {
        self.nav.open_overlay(kind)?;
        let message = match kind {
            OverlayKind::Help => help_text(&self.feeds_file),
            OverlayKind::Quit => "Are you sure you want to quit?".to_string(),
            OverlayKind::Refresh => "Do you want to refresh feed data?".to_string(),
            OverlayKind::OpenLink => "Open entry in browser?".to_string(),
            OverlayKind::Error => "An unexpected error occurred".to_string(),
        };
        self.modal = Some(Modal::new(kind, message));
        self.menu_highlight = MenuRegion::for_overlay(kind);
        Ok(())
    }

    /// Opens the error overlay, replacing any other overlay.
    ///
    /// A second error while one is showing is logged and dropped.
    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        if let Err(e) = self.nav.open_overlay(OverlayKind::Error) {
            tracing::warn!(error = %e, message = %message, "Error overlay already showing");
            return;
        }
        self.modal = Some(Modal::new(OverlayKind::Error, message));
        self.menu_highlight = None;
    }

    fn close_overlay(&mut self, restore: Option<Widget>) {
        let result = match restore {
            Some(widget) => self.nav.close_overlay_to(widget),
            None => self.nav.close_overlay(),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to close overlay");
            return;
        }
        self.modal = None;
        self.menu_highlight = None;
    }

    /// Presses a button of the open overlay.
    ///
    /// Buttons the overlay does not have are ignored.
    pub fn press_button(&mut self, button: Button) -> Action {
        let Some(modal) = self.modal.as_ref() else {
            return Action::Continue;
        };
        if !modal.has_button(button) {
            return Action::Continue;
        }

        match (modal.kind, button) {
            (OverlayKind::Quit, Button::Yes) => return Action::Quit,
            (OverlayKind::Error, Button::Okay) => {
                self.fatal_error = Some(modal.message.clone());
                return Action::Quit;
            }
            (OverlayKind::Refresh, Button::Yes) => {
                self.close_overlay(None);
                // Already reported in the status bar when rejected
                let _ = self.start_refresh();
            }
            (OverlayKind::OpenLink, Button::Yes) => {
                let link = modal.link.clone().unwrap_or_default();
                self.close_overlay(Some(Widget::EntriesList));
                self.launch(&link);
            }
            (OverlayKind::OpenLink, _) => self.close_overlay(Some(Widget::EntriesList)),
            _ => self.close_overlay(None),
        }
        Action::Continue
    }

    fn launch(&mut self, link: &str) {
        match open_link(self.launcher.as_ref(), link) {
            Ok(()) => tracing::info!(url = %link, "Opened entry in browser"),
            Err(e) => {
                tracing::warn!(url = %link, error = %e, "Failed to open entry in browser");
                self.set_status(format!("Could not open link: {}", e));
            }
        }
    }
}
