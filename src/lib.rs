//! Clacks: a terminal Atom/RSS reader.
//!
//! Feeds listed in a JSON file are fetched concurrently into an in-memory
//! [`store::FeedStore`] and browsed through a three-pane TUI.

pub mod app;
pub mod browser;
pub mod config;
pub mod feed;
pub mod nav;
pub mod refresh;
pub mod sources;
pub mod store;
pub mod ui;
pub mod util;

#[cfg(test)]
mod testing;
