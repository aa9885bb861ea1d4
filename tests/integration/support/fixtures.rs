//! Community feed, post page and comment fixtures built on the fake DOM

use super::dom::{el, FakeBrowser, Node, Page};
use community_archiver::browser::SettleWait;
use community_archiver::config::ArchiverSettings;
use community_archiver::storage::ArchiveWriter;
use community_archiver::{Archiver, DomError};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const CHANNEL_URL: &str = "https://www.youtube.com/channel/UCtester";
pub const CHANNEL_PATH: &str = "/channel/UCtester";
pub const SIGN_IN_URL: &str = "https://accounts.google.com/ServiceLogin?service=youtube";
pub const FEED_URL: &str = "https://www.youtube.com/@tester/community";
pub const AVATAR_URL: &str = "https://yt3.ggpht.com/avatar=s88-c-k";

pub fn post_url(id: &str) -> String {
    format!("{}/community?lb={}", CHANNEL_URL, id)
}

pub fn comment_url(post_id: &str, comment_id: &str) -> String {
    format!("{}/community?lc={}&lb={}", CHANNEL_URL, comment_id, post_id)
}

/// Post permalink as the page markup writes it, relative to the site root
pub fn post_href(id: &str) -> String {
    format!("{}/community?lb={}", CHANNEL_PATH, id)
}

/// Comment permalink as the page markup writes it
pub fn comment_href(post_id: &str, comment_id: &str) -> String {
    format!("{}/community?lc={}&lb={}", CHANNEL_PATH, comment_id, post_id)
}

/// Kind of error injected into a feed element's scroll-into-view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    OutOfBounds,
    Stale,
}

impl InjectedFailure {
    fn error(&self) -> DomError {
        match self {
            Self::OutOfBounds => DomError::OutOfBounds("move target out of bounds".to_string()),
            Self::Stale => DomError::Stale("stale element reference".to_string()),
        }
    }
}

/// A two-choice poll whose percentages are hidden until a choice is clicked
#[derive(Debug, Clone)]
pub struct PollFixture {
    pub choices: Vec<(String, u8)>,
    pub total_votes: String,
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct PostFixture {
    pub id: String,
    pub text: Option<String>,
    pub members: bool,
    pub images: Vec<String>,
    pub links: Vec<String>,
    pub likes: String,
    pub poll: Option<PollFixture>,
    pub scroll_failures: Vec<InjectedFailure>,
    pub sign_in_prompt: bool,
}

impl PostFixture {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            text: Some(format!("Text of {}", id)),
            members: false,
            images: Vec::new(),
            links: Vec::new(),
            likes: "1.2K".to_string(),
            poll: None,
            scroll_failures: Vec::new(),
            sign_in_prompt: false,
        }
    }

    pub fn members(mut self) -> Self {
        self.members = true;
        self
    }

    pub fn without_text(mut self) -> Self {
        self.text = None;
        self
    }

    pub fn image(mut self, src: &str) -> Self {
        self.images.push(src.to_string());
        self
    }

    pub fn link(mut self, href: &str) -> Self {
        self.links.push(href.to_string());
        self
    }

    pub fn poll(mut self, poll: PollFixture) -> Self {
        self.poll = Some(poll);
        self
    }

    /// Puts a sign-in link ahead of the channel link, as signed-out pages do
    pub fn sign_in_prompt(mut self) -> Self {
        self.sign_in_prompt = true;
        self
    }

    pub fn failing_scrolls(mut self, failure: InjectedFailure, count: usize) -> Self {
        self.scroll_failures = vec![failure; count];
        self
    }

    pub fn url(&self) -> String {
        post_url(&self.id)
    }
}

#[derive(Debug, Clone)]
pub struct CommentFixture {
    pub id: String,
    pub author: String,
    pub body_html: String,
    pub pinned: bool,
    pub hearted: bool,
    pub creator: bool,
    pub member_for: Option<String>,
}

impl CommentFixture {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            author: format!("@author-{}", id),
            body_html: format!("<span>comment {}</span>", id),
            pinned: false,
            hearted: false,
            creator: false,
            member_for: None,
        }
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn hearted(mut self) -> Self {
        self.hearted = true;
        self
    }

    pub fn body(mut self, html: &str) -> Self {
        self.body_html = html.to_string();
        self
    }

    pub fn member_for(mut self, tooltip: &str) -> Self {
        self.member_for = Some(tooltip.to_string());
        self
    }
}

fn poll_nodes(poll: &PollFixture) -> Vec<Arc<Node>> {
    let revealed = Arc::new(AtomicBool::new(!poll.hidden));

    let mut rows = Vec::new();
    for (label, percent) in &poll.choices {
        let percentage = el("span").class("vote-percentage").build();
        let choice = el("div").class("choice-info").child(percentage.clone()).build();
        rows.push((choice, percentage, label.clone(), *percent));
    }

    let render = {
        let rows = rows.clone();
        let revealed = revealed.clone();
        move || {
            let shown = revealed.load(Ordering::SeqCst);
            for (choice, percentage, label, percent) in &rows {
                if shown {
                    percentage.set_text(format!("{}%", percent));
                    choice.set_text(format!("{}\n{}%", label, percent));
                } else {
                    percentage.set_text("");
                    choice.set_text(format!("{}\n", label));
                }
            }
        }
    };
    render();

    let render = Arc::new(render);
    for (choice, _, _, _) in &rows {
        let render = render.clone();
        let revealed = revealed.clone();
        choice.on_click(move || {
            revealed.fetch_xor(true, Ordering::SeqCst);
            render();
        });
    }

    let mut nodes: Vec<Arc<Node>> = rows.into_iter().map(|(choice, ..)| choice).collect();
    nodes.push(el("span").id("vote-info").text(&poll.total_votes).build());
    nodes
}

/// Builds the `#post` element for a fixture
///
/// Feed copies carry the injected scroll failures; post-page copies do not.
pub fn post_node(post: &PostFixture, in_feed: bool) -> Arc<Node> {
    let mut node = el("ytd-backstage-post-renderer").id("post");
    if post.sign_in_prompt {
        node = node.child(el("a").attr("href", SIGN_IN_URL).text("Sign in").build());
    }
    let mut node = node
        .child(el("a").attr("href", CHANNEL_PATH).text("Tester").build())
        .child(el("img").attr("src", AVATAR_URL).build())
        .child(el("a").attr("href", &post_href(&post.id)).text("3 days ago").build());

    if post.members {
        node = node.child(
            el("div")
                .class("ytd-sponsors-only-badge-renderer")
                .text("Members only")
                .build(),
        );
    }

    if let Some(text) = &post.text {
        node = node.child(el("yt-formatted-string").id("content").text(text).build());
    }

    for src in &post.images {
        node = node.child(el("img").attr("src", src).build());
    }

    for href in &post.links {
        node = node.child(el("a").attr("href", href).text(href).build());
    }

    if let Some(poll) = &post.poll {
        node = node.children(poll_nodes(poll));
    }

    let node = node
        .child(el("span").id("vote-count-middle").text(&post.likes).build())
        .child(el("div").id("reply-button-end").text("12\nComments").build())
        .child(el("div").class("more-button").text("Read more").build())
        .build();

    if in_feed {
        node.fail_scrolls(post.scroll_failures.iter().map(InjectedFailure::error));
    }
    node
}

pub fn comment_node(post_id: &str, comment: &CommentFixture) -> Arc<Node> {
    let mut node = el("ytd-comment-thread-renderer")
        .child(el("a").id("author-text").text(&comment.author).build())
        .child(
            el("span")
                .id("published-time-text")
                .text("1 day ago")
                .child(
                    el("a")
                        .attr("href", &comment_href(post_id, &comment.id))
                        .text("1 day ago")
                        .build(),
                )
                .build(),
        )
        .child(el("span").id("vote-count-middle").text("4").build())
        .child(el("div").id("more-replies").text("2 replies").build())
        .html(&format!(
            r#"<div id="header"><a id="author-text">{}</a></div><yt-formatted-string id="content-text">{}</yt-formatted-string>"#,
            comment.author, comment.body_html
        ));

    if comment.pinned {
        node = node.child(el("div").id("pinned-comment-badge").build());
    }
    if comment.hearted {
        node = node.child(el("div").id("creator-heart-button").build());
    }
    if comment.creator {
        node = node.child(el("div").id("author-comment-badge").build());
    }
    if let Some(tooltip) = &comment.member_for {
        node = node.child(
            el("div")
                .id("custom-badge")
                .child(el("yt-img-shadow").attr("shared-tooltip-text", tooltip).build())
                .build(),
        );
    }

    node.build()
}

fn comments_panel(count: usize) -> Arc<Node> {
    el("ytd-comments")
        .child(el("h2").id("count").text(&format!("{} Comments", count)).build())
        .build()
}

/// A post's dedicated page: the post, its comments panel and comment threads
pub fn post_page(post: &PostFixture, comments: &[CommentFixture], signed_in: bool) -> Page {
    let mut roots = Vec::new();
    if signed_in {
        roots.push(el("button").id("avatar-btn").build());
    }
    roots.push(post_node(post, false));
    roots.push(comments_panel(comments.len()));
    roots.extend(comments.iter().map(|c| comment_node(&post.id, c)));
    Page::new(roots)
}

/// A feed page rendering `per_batch` posts initially and per downward scroll
pub fn feed_page(posts: &[PostFixture], per_batch: usize, signed_in: bool) -> Page {
    let mut batches = posts.chunks(per_batch.max(1));

    let mut roots = Vec::new();
    if signed_in {
        roots.push(el("button").id("avatar-btn").build());
    }
    if let Some(first) = batches.next() {
        roots.extend(first.iter().map(|p| post_node(p, true)));
    }

    batches.fold(Page::new(roots), |page, batch| {
        page.then(batch.iter().map(|p| post_node(p, true)))
    })
}

/// Registers a feed at `FEED_URL` plus one dedicated page per post
pub fn install_feed(browser: &FakeBrowser, posts: Vec<PostFixture>, per_batch: usize) {
    for post in &posts {
        let fixture = post.clone();
        browser.add_page(&post.url(), move || post_page(&fixture, &[], false));
    }
    browser.add_page(FEED_URL, move || feed_page(&posts, per_batch, false));
}

/// Registers a single post page at the post's URL
pub fn install_post(
    browser: &FakeBrowser,
    post: PostFixture,
    comments: Vec<CommentFixture>,
    signed_in: bool,
) {
    browser.add_page(&post.url(), move || post_page(&post, &comments, signed_in));
}

/// Settings for a fast, small crawl into `output`
pub fn test_settings(output: &Path, url: &str) -> ArchiverSettings {
    let mut settings = ArchiverSettings::new(url);
    settings.output_dir = output.to_path_buf();
    settings.tuning.crawl.stall_rounds = 3;
    settings.tuning.crawl.comment_stall_rounds = 2;
    settings
}

pub fn test_archiver(browser: &FakeBrowser, settings: ArchiverSettings) -> Archiver<FakeBrowser> {
    let writer = ArchiveWriter::new(&settings.output_dir).unwrap();
    Archiver::new(browser.clone(), settings, writer).with_settle(SettleWait::immediate())
}

/// Names of the entries directly inside `dir`, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
