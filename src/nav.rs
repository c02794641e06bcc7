//! Page and focus state machine.
//!
//! The base page holds the feed list and the entries list. Overlays (help,
//! confirmations, errors) are pushed above it one at a time. Opening an
//! overlay saves the focused widget; closing it puts focus back.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Help,
    Quit,
    Refresh,
    OpenLink,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Feeds,
    Overlay(OverlayKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    FeedList,
    EntriesList,
    /// The button row of whichever overlay is in front.
    Modal,
}

impl Widget {
    fn lives_on(self, page: Page) -> bool {
        match page {
            Page::Feeds => matches!(self, Widget::FeedList | Widget::EntriesList),
            Page::Overlay(_) => self == Widget::Modal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Browsing,
    Overlay(OverlayKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("an overlay is already open")]
    OverlayOpen,
    #[error("no overlay is open")]
    NoOverlay,
    #[error("the error overlay can only be left by quitting")]
    Terminal,
    #[error("{0:?} is not on the front page")]
    NotOnFrontPage(Widget),
}

/// Invariants:
/// - `page_stack` is never empty and starts with [`Page::Feeds`]
/// - `saved_focus` is `Some` exactly while an overlay is open
/// - `focused` always lives on the front page
#[derive(Debug, Clone)]
pub struct Navigator {
    page_stack: Vec<Page>,
    focused: Widget,
    saved_focus: Option<Widget>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            page_stack: vec![Page::Feeds],
            focused: Widget::FeedList,
            saved_focus: None,
        }
    }

    pub fn state(&self) -> NavState {
        match self.front_page() {
            Page::Feeds => NavState::Browsing,
            Page::Overlay(kind) => NavState::Overlay(kind),
        }
    }

    pub fn front_page(&self) -> Page {
        self.page_stack.last().copied().unwrap_or(Page::Feeds)
    }

    pub fn overlay(&self) -> Option<OverlayKind> {
        match self.front_page() {
            Page::Overlay(kind) => Some(kind),
            Page::Feeds => None,
        }
    }

    pub fn focused(&self) -> Widget {
        self.focused
    }

    pub fn saved_focus(&self) -> Option<Widget> {
        self.saved_focus
    }

    /// Base-page list that draws the highlighted border, if any.
    ///
    /// `None` while an overlay is open.
    pub fn highlighted(&self) -> Option<Widget> {
        match self.state() {
            NavState::Browsing => Some(self.focused),
            NavState::Overlay(_) => None,
        }
    }

    /// Pushes an overlay and moves focus to it.
    ///
    /// Only one overlay is open at a time. [`OverlayKind::Error`] is the
    /// exception: it replaces whatever overlay is open and keeps the focus
    /// saved by that overlay.
    pub fn open_overlay(&mut self, kind: OverlayKind) -> Result<(), NavError> {
        match self.overlay() {
            None => {
                self.saved_focus = Some(self.focused);
                self.page_stack.push(Page::Overlay(kind));
            }
            Some(OverlayKind::Error) => return Err(NavError::Terminal),
            Some(_) if kind == OverlayKind::Error => {
                self.page_stack.pop();
                self.page_stack.push(Page::Overlay(kind));
            }
            Some(_) => return Err(NavError::OverlayOpen),
        }
        self.focused = Widget::Modal;
        Ok(())
    }

    /// Pops the overlay and restores the saved focus.
    pub fn close_overlay(&mut self) -> Result<Widget, NavError> {
        let restore = self.saved_focus.unwrap_or(Widget::FeedList);
        self.close_overlay_to(restore)
    }

    /// Pops the overlay and focuses `widget` instead of the saved focus.
    pub fn close_overlay_to(&mut self, widget: Widget) -> Result<Widget, NavError> {
        match self.overlay() {
            None => Err(NavError::NoOverlay),
            Some(OverlayKind::Error) => Err(NavError::Terminal),
            Some(_) if !widget.lives_on(Page::Feeds) => Err(NavError::NotOnFrontPage(widget)),
            Some(_) => {
                self.page_stack.pop();
                self.saved_focus = None;
                self.focused = widget;
                Ok(widget)
            }
        }
    }

    /// Moves focus within the front page.
    pub fn focus(&mut self, widget: Widget) -> Result<(), NavError> {
        if !widget.lives_on(self.front_page()) {
            return Err(NavError::NotOnFrontPage(widget));
        }
        self.focused = widget;
        Ok(())
    }
}
