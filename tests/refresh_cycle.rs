//! End-to-end refresh cycles: feeds file on disk, feeds served over HTTP,
//! results applied to the app the way the event loop does it.
//!
//! Each test writes its own feeds file and starts its own mock server.

use clacks::app::{App, AppEvent};
use clacks::browser::{BrowserLauncher, LaunchError};
use clacks::config::Config;
use clacks::feed::{Fetcher, HttpFeedParser};
use clacks::nav::{NavState, OverlayKind, Widget};
use clacks::refresh::Orchestrator;
use clacks::sources::FileSourceLoader;
use clacks::store::FeedStore;
use clacks::ui::{handle_app_event, handle_key, Action};
use crossterm::event::{KeyCode, KeyModifiers};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rss(title: &str, items: &[(&str, &str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, description, link)| {
            format!(
                "<item><title>{title}</title><description>{description}</description><link>{link}</link></item>"
            )
        })
        .collect();
    format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>{title}</title>{items}</channel></rss>"#)
}

async fn serve(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Feeds file in the temp dir, removed on drop.
struct FeedsFile(PathBuf);

impl FeedsFile {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "clacks-test-{}-{}.json",
            std::process::id(),
            name
        ));
        Self(path)
    }

    fn write(&self, urls: &[String]) {
        let feeds: Vec<String> = urls
            .iter()
            .map(|url| format!(r#"{{ "url": "{url}" }}"#))
            .collect();
        let json = format!(r#"{{ "feeds": [ {} ] }}"#, feeds.join(", "));
        std::fs::write(&self.0, json).unwrap();
    }
}

impl Drop for FeedsFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[derive(Default, Clone)]
struct RecordingBrowser {
    opened: Arc<Mutex<Vec<String>>>,
}

impl BrowserLauncher for RecordingBrowser {
    fn open_default(&self, url: &str) -> Result<(), LaunchError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

struct Session {
    app: App,
    rx: mpsc::Receiver<AppEvent>,
    browser: RecordingBrowser,
}

impl Session {
    fn new(feeds_file: &FeedsFile) -> Self {
        let parser = HttpFeedParser::new(&Config::default()).unwrap();
        let store = FeedStore::new();
        let (tx, rx) = mpsc::channel(8);
        let orchestrator = Orchestrator::new(
            Arc::new(FileSourceLoader::new(feeds_file.0.clone())),
            Fetcher::new(Arc::new(parser)),
            store.clone(),
            4,
            tx,
        );
        let browser = RecordingBrowser::default();
        let app = App::new(store, orchestrator, Arc::new(browser.clone()));
        Self { app, rx, browser }
    }

    async fn next_event(&mut self) {
        let event = self.rx.recv().await.unwrap();
        handle_app_event(&mut self.app, event);
    }

    fn press(&mut self, code: KeyCode) -> Action {
        handle_key(&mut self.app, code, KeyModifiers::NONE)
    }

    fn feed_labels(&self) -> Vec<String> {
        self.app
            .feed_list
            .items()
            .iter()
            .map(|row| row.label.clone())
            .collect()
    }
}

#[tokio::test]
async fn test_feeds_listed_in_file_order_with_cleaned_content() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/news.xml",
        rss(
            "News",
            &[
                (
                    "Launch",
                    "&lt;p&gt;Hello &amp;amp; welcome&lt;/p&gt;",
                    "https://news.example/launch",
                ),
                ("Second", "plain", "https://news.example/second"),
            ],
        ),
    )
    .await;
    serve(
        &server,
        "/blog.xml",
        rss("Blog", &[("Post", "words", "https://blog.example/post")]),
    )
    .await;

    let file = FeedsFile::new("order");
    file.write(&[
        format!("{}/blog.xml", server.uri()),
        format!("{}/news.xml", server.uri()),
    ]);

    let mut session = Session::new(&file);
    session.app.start_refresh().unwrap();
    assert_eq!(session.app.content.text(), clacks::app::LOADING_TEXT);

    session.next_event().await;
    assert_eq!(session.feed_labels(), vec!["Blog", "News"]);
    assert_eq!(session.app.entries_list.len(), 1);

    session.press(KeyCode::Down);
    assert_eq!(session.app.entries_list.len(), 2);
    assert_eq!(session.app.content.text(), "Hello & welcome");
    assert_eq!(session.app.store().len(), 2);
}

#[tokio::test]
async fn test_failing_feed_shows_error_and_okay_quits() {
    let server = MockServer::start().await;
    serve(&server, "/ok.xml", rss("Ok", &[("A", "a", "https://ok.example/a")])).await;
    Mock::given(method("GET"))
        .and(path("/gone.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let file = FeedsFile::new("failing");
    let gone = format!("{}/gone.xml", server.uri());
    file.write(&[format!("{}/ok.xml", server.uri()), gone.clone()]);

    let mut session = Session::new(&file);
    session.app.start_refresh().unwrap();
    session.next_event().await;

    assert_eq!(
        session.app.nav.state(),
        NavState::Overlay(OverlayKind::Error)
    );
    let message = session.app.modal.as_ref().unwrap().message.clone();
    assert!(message.starts_with("error loading feed"), "got {message}");
    assert!(message.contains(&gone), "got {message}");

    assert_eq!(session.press(KeyCode::Esc), Action::Continue);
    assert_eq!(session.press(KeyCode::Enter), Action::Quit);
    assert_eq!(session.app.fatal_error.as_deref(), Some(message.as_str()));
}

#[tokio::test]
async fn test_missing_feeds_file_is_reported() {
    let file = FeedsFile::new("missing");
    let mut session = Session::new(&file);
    session.app.start_refresh().unwrap();
    session.next_event().await;

    let message = &session.app.modal.as_ref().unwrap().message;
    assert!(
        message.contains("could not find feeds config file"),
        "got {message}"
    );
}

#[tokio::test]
async fn test_refresh_picks_up_edited_feeds_file() {
    let server = MockServer::start().await;
    serve(&server, "/one.xml", rss("One", &[("1", "x", "https://one.example/1")])).await;
    serve(&server, "/two.xml", rss("Two", &[("2", "y", "https://two.example/2")])).await;

    let file = FeedsFile::new("reload");
    file.write(&[format!("{}/one.xml", server.uri())]);

    let mut session = Session::new(&file);
    session.app.start_refresh().unwrap();
    session.next_event().await;
    assert_eq!(session.feed_labels(), vec!["One"]);

    file.write(&[
        format!("{}/one.xml", server.uri()),
        format!("{}/two.xml", server.uri()),
    ]);
    session.press(KeyCode::Char('r'));
    session.press(KeyCode::Char('y'));
    assert!(session.app.is_refreshing());

    // A second request while the cycle runs is refused
    assert!(session.app.start_refresh().is_err());

    session.next_event().await;
    assert_eq!(session.feed_labels(), vec!["One", "Two"]);
    assert_eq!(session.app.nav.focused(), Widget::FeedList);
}

#[tokio::test]
async fn test_open_entry_link_in_browser() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/feed.xml",
        rss(
            "Feed",
            &[
                ("First", "a", "https://site.example/first"),
                ("Second", "b", "https://site.example/second"),
            ],
        ),
    )
    .await;

    let file = FeedsFile::new("open");
    file.write(&[format!("{}/feed.xml", server.uri())]);

    let mut session = Session::new(&file);
    session.app.start_refresh().unwrap();
    session.next_event().await;

    session.press(KeyCode::Enter);
    session.press(KeyCode::Down);
    session.press(KeyCode::Enter);
    assert_eq!(
        session.app.nav.state(),
        NavState::Overlay(OverlayKind::OpenLink)
    );

    session.press(KeyCode::Char('n'));
    assert!(session.browser.opened.lock().unwrap().is_empty());

    session.press(KeyCode::Enter);
    session.press(KeyCode::Enter);
    assert_eq!(
        *session.browser.opened.lock().unwrap(),
        vec!["https://site.example/second".to_string()]
    );
    assert_eq!(session.app.nav.focused(), Widget::EntriesList);
}
