use crate::config::Config;
use crate::feed::types::{RawFeed, RawItem};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_REDIRECTS: usize = 5;

/// Errors from downloading or decoding a single feed document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("response too large")]
    ResponseTooLarge,
    #[error("incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Body is not RSS, Atom or JSON Feed.
    #[error("invalid feed: {0}")]
    Invalid(String),
}

/// Turns a source id into a raw feed.
#[async_trait]
pub trait FeedParser: Send + Sync {
    async fn parse(&self, source_id: &str) -> Result<RawFeed, ParseError>;
}

/// Downloads feeds over HTTP and decodes them with `feed-rs`.
#[derive(Debug, Clone)]
pub struct HttpFeedParser {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFeedParser {
    pub fn new(config: &Config) -> Result<Self, ParseError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(redirect_policy())
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, config.request_timeout()))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("redirect loop detected");
        }
        tracing::debug!(to = %url, hop = attempt.previous().len() + 1, "Following redirect");
        attempt.follow()
    })
}

#[async_trait]
impl FeedParser for HttpFeedParser {
    async fn parse(&self, source_id: &str) -> Result<RawFeed, ParseError> {
        let bytes = tokio::time::timeout(self.timeout, async {
            let response = self.client.get(source_id).send().await?;
            if !response.status().is_success() {
                return Err(ParseError::HttpStatus(response.status().as_u16()));
            }
            read_limited_bytes(response, MAX_FEED_SIZE).await
        })
        .await
        .map_err(|_| ParseError::Timeout)??;

        tracing::debug!(url = %source_id, bytes = bytes.len(), "Downloaded feed");
        parse_feed_bytes(&bytes)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ParseError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(ParseError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ParseError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(ParseError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

/// Decodes an RSS, Atom or JSON Feed document.
///
/// Item description prefers the summary and falls back to the content body;
/// a missing title becomes `Untitled`; the first link is used.
pub fn parse_feed_bytes(bytes: &[u8]) -> Result<RawFeed, ParseError> {
    let feed = feed_rs::parser::parse(bytes).map_err(|e| ParseError::Invalid(e.to_string()))?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let description_html = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            RawItem {
                title,
                description_html,
                link,
            }
        })
        .collect();

    Ok(RawFeed {
        title: feed.title.map(|t| t.content),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Test Feed</title>
    <item>
        <title>First</title>
        <description>&lt;p&gt;Hello&lt;/p&gt;</description>
        <link>https://example.com/first</link>
    </item>
    <item><description>No title here</description></item>
</channel></rss>"#;

    const VALID_ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Atom Feed</title>
    <id>urn:test</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <entry>
        <title>Only content</title>
        <id>urn:test:1</id>
        <updated>2024-01-01T00:00:00Z</updated>
        <link href="https://example.com/atom/1"/>
        <content type="html">&lt;b&gt;body&lt;/b&gt;</content>
    </entry>
</feed>"#;

    fn parser() -> HttpFeedParser {
        HttpFeedParser::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_parse_rss_bytes() {
        let feed = parse_feed_bytes(VALID_RSS.as_bytes()).unwrap();
        assert_eq!(feed.title.as_deref(), Some("Test Feed"));
        assert_eq!(
            feed.items,
            vec![
                RawItem {
                    title: "First".into(),
                    description_html: "<p>Hello</p>".into(),
                    link: Some("https://example.com/first".into()),
                },
                RawItem {
                    title: "Untitled".into(),
                    description_html: "No title here".into(),
                    link: None,
                },
            ]
        );
    }

    #[test]
    fn test_parse_atom_falls_back_to_content_body() {
        let feed = parse_feed_bytes(VALID_ATOM.as_bytes()).unwrap();
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].description_html, "<b>body</b>");
        assert_eq!(feed.items[0].link.as_deref(), Some("https://example.com/atom/1"));
    }

    #[test]
    fn test_parse_garbage_is_invalid() {
        assert!(matches!(
            parse_feed_bytes(b"<not valid xml"),
            Err(ParseError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_http_parse_success_sends_user_agent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .and(header("user-agent", "Clacks - Terminal Atom/RSS Reader"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .insert_header("Content-Type", "application/xml"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let feed = parser()
            .parse(&format!("{}/feed", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(feed.items.len(), 2);
    }

    #[tokio::test]
    async fn test_http_404_is_status_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        match parser().parse(&format!("{}/feed", mock_server.uri())).await {
            Err(ParseError::HttpStatus(404)) => {}
            other => panic!("Expected HttpStatus(404), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_500_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = parser().parse(&format!("{}/feed", mock_server.uri())).await;
        assert!(matches!(result, Err(ParseError::HttpStatus(500))));
    }

    #[tokio::test]
    async fn test_http_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let parser = HttpFeedParser::with_client(reqwest::Client::new(), Duration::from_millis(100));
        let result = parser.parse(&format!("{}/feed", mock_server.uri())).await;
        assert!(matches!(result, Err(ParseError::Timeout)));
    }

    #[tokio::test]
    async fn test_http_oversized_body_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b' '; MAX_FEED_SIZE + 1]))
            .mount(&mock_server)
            .await;

        let result = parser().parse(&format!("{}/feed", mock_server.uri())).await;
        assert!(matches!(result, Err(ParseError::ResponseTooLarge)));
    }
}
