//! Per-post retry behaviour for each browser family

use crate::support::*;
use community_archiver::{ArchiveError, BrowserFamily, DomError};
use tempfile::TempDir;

fn nudges(browser: &FakeBrowser) -> usize {
    browser.log().iter().filter(|entry| *entry == "scroll 100").count()
}

#[tokio::test]
async fn test_chrome_backs_off_on_out_of_bounds() {
    let out = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    install_feed(
        &browser,
        vec![PostFixture::new("P1").failing_scrolls(InjectedFailure::OutOfBounds, 2)],
        1,
    );

    let archiver = test_archiver(&browser, test_settings(out.path(), FEED_URL));
    let stats = archiver.run().await.unwrap();

    assert_eq!(stats.posts_archived, 1);
    assert_eq!(dir_entries(out.path()), vec!["P1"]);
    assert_eq!(nudges(&browser), 0);
}

#[tokio::test]
async fn test_firefox_nudges_on_out_of_bounds() {
    let out = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    install_feed(
        &browser,
        vec![PostFixture::new("P1").failing_scrolls(InjectedFailure::OutOfBounds, 1)],
        1,
    );

    let mut settings = test_settings(out.path(), FEED_URL);
    settings.browser = BrowserFamily::Firefox;

    let archiver = test_archiver(&browser, settings);
    let stats = archiver.run().await.unwrap();

    assert_eq!(stats.posts_archived, 1);
    assert_eq!(nudges(&browser), 1);

    // The nudge happens before the post page is opened
    let log = browser.log();
    let nudge = log.iter().position(|e| e == "scroll 100").unwrap();
    let visit = log.iter().position(|e| *e == format!("goto {}", post_url("P1"))).unwrap();
    assert!(nudge < visit);
}

#[tokio::test]
async fn test_nudges_count_against_attempt_cap() {
    let out = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    install_feed(
        &browser,
        vec![PostFixture::new("P1").failing_scrolls(InjectedFailure::OutOfBounds, 10)],
        1,
    );

    let mut settings = test_settings(out.path(), FEED_URL);
    settings.browser = BrowserFamily::Firefox;

    let archiver = test_archiver(&browser, settings);
    let result = archiver.run().await;

    match result {
        Err(ArchiveError::RetriesExhausted { url, attempts, .. }) => {
            assert_eq!(url, post_url("P1"));
            assert_eq!(attempts, 5);
        }
        other => panic!("expected RetriesExhausted, got {:?}", other.map(|s| s.posts_archived)),
    }
    assert_eq!(nudges(&browser), 4);
}

#[tokio::test]
async fn test_stale_element_exhausts_retries() {
    let out = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    install_feed(
        &browser,
        vec![PostFixture::new("P1").failing_scrolls(InjectedFailure::Stale, 5)],
        1,
    );

    let archiver = test_archiver(&browser, test_settings(out.path(), FEED_URL));
    let result = archiver.run().await;

    match result {
        Err(ArchiveError::RetriesExhausted {
            attempts, source, ..
        }) => {
            assert_eq!(attempts, 5);
            assert!(matches!(*source, ArchiveError::Dom(DomError::Stale(_))));
        }
        other => panic!("expected RetriesExhausted, got {:?}", other.map(|s| s.posts_archived)),
    }
    assert!(dir_entries(out.path()).is_empty());
    assert_eq!(browser.visits(&post_url("P1")), 0);
}

#[tokio::test]
async fn test_recovers_on_last_attempt() {
    let out = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    install_feed(
        &browser,
        vec![PostFixture::new("P1").failing_scrolls(InjectedFailure::Stale, 4)],
        1,
    );

    let archiver = test_archiver(&browser, test_settings(out.path(), FEED_URL));
    let stats = archiver.run().await.unwrap();

    assert_eq!(stats.posts_archived, 1);
}
