use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use clacks::app::{App, AppEvent};
use clacks::browser::SystemBrowser;
use clacks::config::Config;
use clacks::feed::{Fetcher, HttpFeedParser};
use clacks::refresh::Orchestrator;
use clacks::sources::FileSourceLoader;
use clacks::store::FeedStore;
use clacks::ui;

#[derive(Parser, Debug)]
#[command(name = "clacks", about = "Terminal Atom/RSS reader")]
struct Args {
    /// JSON file listing the feeds to read
    #[arg(long, value_name = "FILE", default_value = "feeds.json")]
    feeds: PathBuf,

    /// Settings file (defaults to ~/.config/clacks/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Get the default settings path (~/.config/clacks/config.toml)
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("clacks")
            .join("config.toml"),
    )
}

/// Filter used when `RUST_LOG` is unset.
///
/// Without a log file the only sink is stderr, which shares the terminal
/// with the TUI, so nothing is logged unless asked for.
fn default_directive(to_file: bool) -> &'static str {
    if to_file {
        "info"
    } else {
        "off"
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_file.is_some())));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let config = match args.config.clone().or_else(default_config_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load settings from '{}'", path.display()))?,
        None => {
            tracing::warn!("HOME not set, using default settings");
            Config::default()
        }
    };

    let parser = HttpFeedParser::new(&config).context("Failed to build HTTP client")?;
    let fetcher = Fetcher::new(Arc::new(parser));
    let store = FeedStore::new();

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let orchestrator = Orchestrator::new(
        Arc::new(FileSourceLoader::new(args.feeds.clone())),
        fetcher,
        store.clone(),
        config.max_concurrent_fetches,
        event_tx,
    );

    let mut app = App::new(store, orchestrator, Arc::new(SystemBrowser));
    app.feeds_file = args.feeds.display().to_string();

    if let Err(e) = app.start_refresh() {
        tracing::warn!(error = %e, "Initial refresh not started");
    }

    ui::run(&mut app, event_rx).await?;

    if let Some(message) = app.fatal_error.take() {
        anyhow::bail!(message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_logging_is_silent_by_default() {
        assert_eq!(default_directive(false), "off");
        assert_eq!(default_directive(true), "info");
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["clacks"]);
        assert_eq!(args.feeds, PathBuf::from("feeds.json"));
        assert!(args.config.is_none());
        assert!(args.log_file.is_none());
    }
}
