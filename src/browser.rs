//! Opening entry links in the user's default browser.

use crate::util::{validate_url_for_open, UrlValidationError};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("refusing to open link: {0}")]
    InvalidLink(#[from] UrlValidationError),
    #[error("entry has no link")]
    MissingLink,
    #[error("failed to launch browser: {0}")]
    Io(#[from] std::io::Error),
}

pub trait BrowserLauncher: Send + Sync {
    fn open_default(&self, url: &str) -> Result<(), LaunchError>;
}

/// Hands links to the platform opener via the `open` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open_default(&self, url: &str) -> Result<(), LaunchError> {
        let link = escape_link(url);
        tracing::debug!(url = %link, "Opening link in browser");
        open::that(link.as_ref())?;
        Ok(())
    }
}

/// Checks `link` and passes it to `launcher`.
///
/// Empty links and anything other than http/https are refused before the
/// launcher is called.
pub fn open_link(launcher: &dyn BrowserLauncher, link: &str) -> Result<(), LaunchError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(LaunchError::MissingLink);
    }
    validate_url_for_open(link)?;
    launcher.open_default(link)
}

/// Escapes a link for the current platform's opener.
pub fn escape_link(url: &str) -> Cow<'_, str> {
    escape_link_for(std::env::consts::OS, url)
}

/// `cmd /c start` treats `&` as a command separator.
pub fn escape_link_for<'a>(os: &str, url: &'a str) -> Cow<'a, str> {
    if os == "windows" && url.contains('&') {
        Cow::Owned(url.replace('&', "^&"))
    } else {
        Cow::Borrowed(url)
    }
}
