use crate::feed::parser::{FeedParser, ParseError};
use crate::feed::types::{Entry, FeedSnapshot, RawFeed, RawItem};
use crate::sources::FeedSource;
use crate::util::{html_to_text, strip_control_chars};
use std::sync::Arc;
use thiserror::Error;

/// Errors that end the fetch of one source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("error loading feed {source_id}: {cause}")]
    Parser {
        source_id: String,
        #[source]
        cause: ParseError,
    },
    /// The feed parsed but carried no items; usually a misconfigured url.
    #[error("error feed at url: {source_id} has no entries")]
    Empty { source_id: String },
}

impl FetchError {
    pub fn source_id(&self) -> &str {
        match self {
            FetchError::Parser { source_id, .. } | FetchError::Empty { source_id } => source_id,
        }
    }
}

/// Fetches one source and sanitizes it into a [`FeedSnapshot`].
///
/// Cheap to clone; the parser is shared behind an `Arc` so the refresh task
/// can drive many fetches at once.
#[derive(Clone)]
pub struct Fetcher {
    parser: Arc<dyn FeedParser>,
}

impl Fetcher {
    pub fn new(parser: Arc<dyn FeedParser>) -> Self {
        Self { parser }
    }

    /// Downloads and converts a single source.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Parser`] when the parser fails (network, status, bad XML)
    /// - [`FetchError::Empty`] when the feed has zero items
    pub async fn fetch(&self, source: &FeedSource) -> Result<FeedSnapshot, FetchError> {
        let raw = self
            .parser
            .parse(&source.id)
            .await
            .map_err(|cause| FetchError::Parser {
                source_id: source.id.clone(),
                cause,
            })?;

        if raw.items.is_empty() {
            return Err(FetchError::Empty {
                source_id: source.id.clone(),
            });
        }

        let snapshot = normalize(source, raw);
        tracing::debug!(
            url = %source.id,
            name = %snapshot.display_name,
            entries = snapshot.entries.len(),
            "Fetched feed"
        );
        Ok(snapshot)
    }
}

fn normalize(source: &FeedSource, raw: RawFeed) -> FeedSnapshot {
    let display_name = raw
        .title
        .map(|t| clean_text(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| source.id.clone());

    let entries = raw.items.into_iter().map(to_entry).collect();

    FeedSnapshot {
        display_name,
        entries,
    }
}

fn to_entry(item: RawItem) -> Entry {
    Entry {
        title: clean_text(&item.title),
        content: clean_text(&item.description_html),
        link: item.link.unwrap_or_default(),
    }
}

/// Plain, terminal-safe, trimmed text of an HTML fragment.
fn clean_text(html: &str) -> String {
    let text = html_to_text(html);
    strip_control_chars(&text).trim().to_string()
}
