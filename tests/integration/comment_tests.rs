//! Comment collection on a post's own page

use crate::support::*;
use community_archiver::config::{CommentCategory, CommentSelection};
use community_archiver::{Comment, StopReason};
use std::path::Path;
use tempfile::TempDir;

fn comments(count: usize) -> Vec<CommentFixture> {
    (1..=count).map(|n| CommentFixture::new(&format!("C{}", n))).collect()
}

fn comment_files(out: &Path, post: &str) -> Vec<String> {
    dir_entries(&out.join(post).join("comments"))
}

fn read_comment(out: &Path, post: &str, comment: &str) -> Comment {
    let raw = std::fs::read_to_string(out.join(post).join("comments").join(format!("{}.json", comment)))
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_comment_cap_on_single_post() {
    let out = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    install_post(&browser, PostFixture::new("P1"), comments(8), false);

    let mut settings = test_settings(out.path(), &post_url("P1"));
    settings.comments = CommentSelection::new([CommentCategory::All], Some(5));

    let archiver = test_archiver(&browser, settings);
    let stats = archiver.run().await.unwrap();

    assert_eq!(stats.stop_reason, Some(StopReason::FeedExhausted));
    assert_eq!(stats.posts_archived, 1);
    assert_eq!(stats.comments_saved, 5);
    assert_eq!(
        comment_files(out.path(), "P1"),
        vec!["C1.json", "C2.json", "C3.json", "C4.json", "C5.json"]
    );
}

#[tokio::test]
async fn test_single_post_uses_its_own_comment_count() {
    let out = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    install_post(&browser, PostFixture::new("P1"), comments(3), false);

    let archiver = test_archiver(&browser, test_settings(out.path(), &post_url("P1")));
    archiver.run().await.unwrap();

    let raw = std::fs::read_to_string(out.path().join("P1").join("post.json")).unwrap();
    let post: community_archiver::Post = serde_json::from_str(&raw).unwrap();
    assert_eq!(post.num_comments.as_deref(), Some("3"));

    // No comments were requested and no auxiliary tab was needed
    assert!(!out.path().join("P1").join("comments").exists());
    assert!(!browser.log().iter().any(|entry| entry.starts_with("open ")));
}

#[tokio::test]
async fn test_category_filter() {
    let fixtures = vec![
        CommentFixture::new("C1").pinned(),
        CommentFixture::new("C2").hearted(),
        CommentFixture::new("C3"),
    ];

    let cases = [
        (vec![CommentCategory::Pinned], vec!["C1.json"]),
        (
            vec![CommentCategory::Pinned, CommentCategory::Hearted],
            vec!["C1.json", "C2.json"],
        ),
        (
            vec![CommentCategory::All, CommentCategory::Pinned],
            vec!["C1.json", "C2.json", "C3.json"],
        ),
    ];

    for (categories, expected) in cases {
        let out = TempDir::new().unwrap();
        let browser = FakeBrowser::new();
        install_post(&browser, PostFixture::new("P1"), fixtures.clone(), false);

        let mut settings = test_settings(out.path(), &post_url("P1"));
        settings.comments = CommentSelection::new(categories, None);

        let archiver = test_archiver(&browser, settings);
        archiver.run().await.unwrap();

        assert_eq!(comment_files(out.path(), "P1"), expected);
    }
}

#[tokio::test]
async fn test_comment_fields() {
    let out = TempDir::new().unwrap();
    let browser = FakeBrowser::new();
    let fixtures = vec![CommentFixture::new("Cx1")
        .pinned()
        .hearted()
        .member_for("Member for 2 years")
        .body(r#"<span>nice <img alt="wave" src="e.png"> <a href="/x">link</a></span>"#)];
    install_post(&browser, PostFixture::new("P1"), fixtures, false);

    let mut settings = test_settings(out.path(), &post_url("P1"));
    settings.comments = CommentSelection::new([CommentCategory::Members], None);

    let archiver = test_archiver(&browser, settings);
    archiver.run().await.unwrap();

    let comment = read_comment(out.path(), "P1", "Cx1");
    assert_eq!(comment.author.as_deref(), Some("@author-Cx1"));
    assert_eq!(comment.relative_date.as_deref(), Some("1 day ago"));
    assert_eq!(comment.member_length.as_deref(), Some("Member for 2 years"));
    assert_eq!(comment.likes.as_deref(), Some("4"));
    assert_eq!(comment.replies.as_deref(), Some("2 replies"));
    assert!(comment.is_pinned);
    assert!(comment.is_hearted);
    assert_eq!(comment.contents.as_deref(), Some("nice <::wave::> link"));
    assert_eq!(comment.link, comment_url("P1", "Cx1"));
}

#[tokio::test]
async fn test_comments_collected_in_auxiliary_tab() {
    let out = TempDir::new().unwrap();
    let browser = FakeBrowser::new();

    let posts = vec![PostFixture::new("P1"), PostFixture::new("P2")];
    install_post(&browser, posts[0].clone(), comments(2), false);
    install_post(&browser, posts[1].clone(), comments(1), false);
    browser.add_page(FEED_URL, move || feed_page(&posts, 2, false));

    let mut settings = test_settings(out.path(), FEED_URL);
    settings.comments = CommentSelection::new([CommentCategory::All], None);

    let archiver = test_archiver(&browser, settings);
    let stats = archiver.run().await.unwrap();

    assert_eq!(stats.comments_saved, 3);
    assert_eq!(comment_files(out.path(), "P1"), vec!["C1.json", "C2.json"]);
    assert_eq!(comment_files(out.path(), "P2"), vec!["C1.json"]);
    assert_eq!(browser.tab_count(), 1);
}
