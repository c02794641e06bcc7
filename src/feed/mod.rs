//! Feed retrieval: download, decode and sanitize one source at a time.
//!
//! - [`parser`] - the [`FeedParser`] seam and its HTTP + `feed-rs` implementation
//! - [`fetcher`] - turns a raw feed into a terminal-safe [`FeedSnapshot`]
//!
//! Fanning out over every source is the job of [`crate::refresh`].

mod fetcher;
mod parser;
mod types;

pub use fetcher::{FetchError, Fetcher};
pub use parser::{parse_feed_bytes, FeedParser, HttpFeedParser, ParseError};
pub use types::{Entry, FeedSnapshot, RawFeed, RawItem};
