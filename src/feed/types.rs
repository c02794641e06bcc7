/// One displayable item of a feed, already sanitized for the terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub content: String,
    /// Empty when the item carried no link.
    pub link: String,
}

/// Result of the most recent successful fetch of one source.
///
/// Replaced wholesale on every fetch, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub display_name: String,
    pub entries: Vec<Entry>,
}

impl FeedSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Feed as handed back by a [`FeedParser`](super::FeedParser), before sanitizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeed {
    pub title: Option<String>,
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub description_html: String,
    pub link: Option<String>,
}
