//! Stub collaborators shared by unit tests.

use crate::browser::{BrowserLauncher, LaunchError};
use crate::feed::{FeedParser, ParseError, RawFeed, RawItem};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type ErrorFactory = Box<dyn Fn() -> ParseError + Send + Sync>;

enum Canned {
    Feed(RawFeed),
    Error(ErrorFactory),
    Panic,
}

/// In-memory [`FeedParser`] keyed by source id.
///
/// Unknown ids fail with `ParseError::Invalid`.
#[derive(Default)]
pub struct StubParser {
    responses: HashMap<String, Canned>,
    gates: HashMap<String, Arc<Notify>>,
    calls: Arc<AtomicUsize>,
}

impl StubParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, id: &str, feed: RawFeed) -> Self {
        self.responses.insert(id.to_string(), Canned::Feed(feed));
        self
    }

    /// Feed with `count` simple entries titled `"<name> <n>"`.
    pub fn with_entries(self, id: &str, name: &str, count: usize) -> Self {
        let items = (1..=count)
            .map(|n| RawItem {
                title: format!("{} {}", name, n),
                description_html: format!("<p>{} body {}</p>", name, n),
                link: Some(format!("{}/{}", id, n)),
            })
            .collect();
        self.with_feed(
            id,
            RawFeed {
                title: Some(name.to_string()),
                items,
            },
        )
    }

    pub fn with_error<F>(mut self, id: &str, make: F) -> Self
    where
        F: Fn() -> ParseError + Send + Sync + 'static,
    {
        self.responses
            .insert(id.to_string(), Canned::Error(Box::new(make)));
        self
    }

    pub fn with_panic(mut self, id: &str) -> Self {
        self.responses.insert(id.to_string(), Canned::Panic);
        self
    }

    /// Parsing `id` waits until the returned handle is notified.
    pub fn gate(&mut self, id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.insert(id.to_string(), notify.clone());
        notify
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl FeedParser for StubParser {
    async fn parse(&self, source_id: &str) -> Result<RawFeed, ParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gates.get(source_id) {
            gate.notified().await;
        }
        match self.responses.get(source_id) {
            Some(Canned::Feed(feed)) => Ok(feed.clone()),
            Some(Canned::Error(make)) => Err(make()),
            Some(Canned::Panic) => panic!("stub parser panicked on {}", source_id),
            None => Err(ParseError::Invalid(format!("no stub for {}", source_id))),
        }
    }
}

/// Records opened links; optionally fails every launch.
#[derive(Default, Clone)]
pub struct StubBrowser {
    pub opened: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl StubBrowser {
    pub fn failing(message: &str) -> Self {
        Self {
            opened: Arc::default(),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl BrowserLauncher for StubBrowser {
    fn open_default(&self, url: &str) -> Result<(), LaunchError> {
        if let Some(message) = &self.fail_with {
            return Err(LaunchError::Io(std::io::Error::other(message.clone())));
        }
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.to_string());
        }
        Ok(())
    }
}
