//! Refresh cycles: load the source registry, fetch every source, publish.
//!
//! A cycle is all-or-nothing. Sources are fetched concurrently through a
//! bounded pool whose results come back in registry order; each success is
//! written to the [`FeedStore`] as it is yielded and the first failure ends
//! the cycle. Fetches still in flight at that point are dropped. Snapshots
//! already written stay in the store but the UI never shows them, because
//! a failed cycle ends in the error overlay.

use crate::app::AppEvent;
use crate::feed::{FetchError, Fetcher};
use crate::sources::{ConfigError, FeedSource, SourceLoader, SourceRegistry};
use crate::store::FeedStore;
use crate::util::catch_task_panic;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("refresh task panicked: {0}")]
    Panicked(String),
}

/// What a cycle reports back: the registry it fetched, or why it failed.
pub type RefreshOutcome = Result<Arc<SourceRegistry>, RefreshError>;

/// Fetches every source in `registry` into `store`.
///
/// # Errors
///
/// - [`ConfigError::NoSources`] for an empty registry
/// - the first [`FetchError`] in registry order
pub async fn run(
    registry: Arc<SourceRegistry>,
    fetcher: &Fetcher,
    store: &FeedStore,
    max_concurrent: usize,
) -> RefreshOutcome {
    if registry.is_empty() {
        return Err(ConfigError::NoSources.into());
    }

    let sources: Vec<FeedSource> = registry.iter().cloned().collect();
    let total = sources.len();
    let mut results = stream::iter(sources)
        .map(|source| {
            let fetcher = fetcher.clone();
            async move {
                let result = fetcher.fetch(&source).await;
                (source, result)
            }
        })
        .buffered(max_concurrent.max(1));

    while let Some((source, result)) = results.next().await {
        match result {
            Ok(snapshot) => store.put(&source.id, snapshot),
            Err(e) => {
                tracing::warn!(url = %source.id, error = %e, "Feed fetch failed, aborting refresh");
                return Err(e.into());
            }
        }
    }

    tracing::info!(sources = total, "Refresh complete");
    Ok(registry)
}

async fn cycle(
    loader: Arc<dyn SourceLoader>,
    fetcher: Fetcher,
    store: FeedStore,
    max_concurrent: usize,
) -> RefreshOutcome {
    let registry = load_registry(loader).await?;
    run(registry, &fetcher, &store, max_concurrent).await
}

/// Reads the registry on the blocking pool; loaders touch the filesystem.
async fn load_registry(loader: Arc<dyn SourceLoader>) -> Result<Arc<SourceRegistry>, RefreshError> {
    let loaded = tokio::task::spawn_blocking(move || loader.load())
        .await
        .map_err(|e| RefreshError::Panicked(format!("source loader failed: {}", e)))?;
    Ok(Arc::new(loaded?))
}

/// Whether a cycle is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RefreshRejected {
    #[error("Refresh already in progress")]
    AlreadyRunning,
}

/// Starts refresh cycles on the runtime, one at a time.
///
/// Owned by the UI task. Every started cycle sends exactly one
/// [`AppEvent::RefreshFinished`], even if it panics; the UI hands its
/// generation back through [`Orchestrator::finish`].
pub struct Orchestrator {
    loader: Arc<dyn SourceLoader>,
    fetcher: Fetcher,
    store: FeedStore,
    max_concurrent: usize,
    event_tx: mpsc::Sender<AppEvent>,
    state: RefreshState,
    last_generation: u64,
}

impl Orchestrator {
    pub fn new(
        loader: Arc<dyn SourceLoader>,
        fetcher: Fetcher,
        store: FeedStore,
        max_concurrent: usize,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            loader,
            fetcher,
            store,
            max_concurrent,
            event_tx,
            state: RefreshState::Idle,
            last_generation: 0,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == RefreshState::Idle
    }

    /// Spawns a new cycle and returns its generation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<u64, RefreshRejected> {
        if let RefreshState::Refreshing { generation } = self.state {
            tracing::debug!(generation, "Refresh requested while one is running");
            return Err(RefreshRejected::AlreadyRunning);
        }

        self.last_generation += 1;
        let generation = self.last_generation;
        self.state = RefreshState::Refreshing { generation };

        let loader = Arc::clone(&self.loader);
        let fetcher = self.fetcher.clone();
        let store = self.store.clone();
        let max_concurrent = self.max_concurrent;
        let tx = self.event_tx.clone();

        tracing::info!(generation, "Starting refresh");
        tokio::spawn(async move {
            let outcome = catch_task_panic(cycle(loader, fetcher, store, max_concurrent))
                .await
                .unwrap_or_else(|panic_msg| {
                    tracing::error!(generation, panic = %panic_msg, "Refresh task panicked");
                    Err(RefreshError::Panicked(panic_msg))
                });

            if let Err(e) = tx
                .send(AppEvent::RefreshFinished {
                    generation,
                    outcome,
                })
                .await
            {
                tracing::debug!(error = %e, "UI gone before refresh finished");
            }
        });

        Ok(generation)
    }

    /// Returns the guard to idle if `generation` is the outstanding cycle.
    ///
    /// Returns `false` for a stale generation, leaving the state unchanged.
    pub fn finish(&mut self, generation: u64) -> bool {
        match self.state {
            RefreshState::Refreshing { generation: current } if current == generation => {
                self.state = RefreshState::Idle;
                true
            }
            _ => false,
        }
    }
}
