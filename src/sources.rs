//! Feed source registry loaded from `feeds.json`.
//!
//! The file lists the feeds to poll, in display order:
//!
//! ```json
//! { "feeds": [ { "url": "https://example.com/feed.atom" } ] }
//! ```
//!
//! The registry is reloaded at the start of each refresh cycle, so edits to
//! the file show up on the next refresh without a restart.

use crate::util::validate_source_url;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum sources file size (1 MB).
const MAX_FILE_SIZE: u64 = 1_048_576;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find feeds config file {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read feeds config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading feeds config, please check structure: {0}")]
    Malformed(String),

    #[error("feeds config file too large: {0} bytes (max {MAX_FILE_SIZE} bytes)")]
    TooLarge(u64),

    #[error("no feeds configured, add at least one feed url")]
    NoSources,
}

/// One configured feed endpoint, identified by its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedSource {
    pub id: String,
}

impl FeedSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Ordered list of sources with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<FeedSource>,
}

#[derive(Deserialize)]
struct FeedsFile {
    feeds: Vec<FeedsFileEntry>,
}

#[derive(Deserialize)]
struct FeedsFileEntry {
    url: String,
}

impl SourceRegistry {
    /// Builds a registry from ids in order, dropping later duplicates.
    ///
    /// No URL validation happens here; use [`SourceRegistry::parse`] for
    /// user-supplied content.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let sources = ids
            .into_iter()
            .map(Into::<String>::into)
            .filter(|id: &String| {
                let fresh = seen.insert(id.clone());
                if !fresh {
                    tracing::warn!(url = %id, "Duplicate feed url in config, ignoring");
                }
                fresh
            })
            .map(FeedSource::new)
            .collect();
        Self { sources }
    }

    /// Load and validate the sources file at `path`.
    ///
    /// - Missing file → `ConfigError::NotFound`
    /// - Invalid JSON, wrong structure or a non-http(s) url → `ConfigError::Malformed`
    /// - An empty `feeds` array is accepted here; the refresh cycle rejects it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(meta.len()));
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(io_err(e)),
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                io_err(e)
            }
        })?;

        let registry = Self::parse(&content)?;
        tracing::info!(path = %path.display(), sources = registry.len(), "Loaded feed sources");
        Ok(registry)
    }

    /// Parse sources file content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: FeedsFile =
            serde_json::from_str(content).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        let mut ids = Vec::with_capacity(file.feeds.len());
        for entry in file.feeds {
            validate_source_url(&entry.url)
                .map_err(|e| ConfigError::Malformed(format!("feed url {:?}: {}", entry.url, e)))?;
            // Id stays as written (trimmed), not the normalized Url form
            ids.push(entry.url.trim().to_string());
        }

        Ok(Self::new(ids))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FeedSource> {
        self.sources.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedSource> {
        self.sources.iter()
    }
}

impl<'a> IntoIterator for &'a SourceRegistry {
    type Item = &'a FeedSource;
    type IntoIter = std::slice::Iter<'a, FeedSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Where a refresh cycle gets its sources from.
pub trait SourceLoader: Send + Sync {
    fn load(&self) -> Result<SourceRegistry, ConfigError>;
}

/// Reads the registry from a JSON file on every cycle.
#[derive(Debug, Clone)]
pub struct FileSourceLoader {
    path: PathBuf,
}

impl FileSourceLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceLoader for FileSourceLoader {
    fn load(&self) -> Result<SourceRegistry, ConfigError> {
        SourceRegistry::load(&self.path)
    }
}

/// A fixed registry, handy when sources come from somewhere other than a file.
impl SourceLoader for SourceRegistry {
    fn load(&self) -> Result<SourceRegistry, ConfigError> {
        Ok(self.clone())
    }
}
