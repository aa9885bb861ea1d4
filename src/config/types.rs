use crate::browser::BrowserFamily;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Default folder for archive output, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "archive-output";

/// Everything a single archiver run needs to know
#[derive(Debug, Clone)]
pub struct ArchiverSettings {
    /// Feed or single-post URL to archive
    pub url: String,

    /// Root directory for archive units
    pub output_dir: PathBuf,

    /// Browser profile directory (e.g. `~/.config/chromium`)
    pub profile_dir: Option<PathBuf>,

    /// Chrome profile name inside `profile_dir`
    pub profile_name: Option<String>,

    /// Netscape cookie file to install before crawling
    pub cookie_path: Option<PathBuf>,

    /// Which browser family drives the session
    pub browser: BrowserFamily,

    /// Override for the browser binary
    pub binary_override: Option<String>,

    /// WebDriver server endpoint; `None` uses the family default
    pub webdriver_url: Option<String>,

    /// Run without a visible window
    pub headless: bool,

    /// Stop after this many posts have been seen (skipped posts count)
    pub max_posts: Option<usize>,

    /// Members-post filter
    pub members: Option<MembersFilter>,

    /// Which comments to save, and how many per post
    pub comments: CommentSelection,

    /// Capture a PNG of every post
    pub take_screenshots: bool,

    /// Skip posts whose directory already exists
    pub skip_existing: bool,

    /// Timing and threshold knobs
    pub tuning: Tuning,
}

impl ArchiverSettings {
    /// Creates settings for `url` with every option at its default
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            profile_dir: None,
            profile_name: None,
            cookie_path: None,
            browser: BrowserFamily::Chrome,
            binary_override: None,
            webdriver_url: None,
            headless: true,
            max_posts: None,
            members: None,
            comments: CommentSelection::default(),
            take_screenshots: false,
            skip_existing: false,
            tuning: Tuning::default(),
        }
    }

    /// Window size used for the browser session
    ///
    /// Headless screenshot runs use a square window so tall posts fit.
    pub fn window_size(&self) -> (u32, u32) {
        if self.headless && self.take_screenshots {
            (1920, 1920)
        } else {
            (1920, 1080)
        }
    }
}

/// Whether to keep only members posts or drop them entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MembersFilter {
    /// Only archive posts carrying the members badge
    MembersOnly,
    /// Ignore posts carrying the members badge
    NoMembers,
}

impl MembersFilter {
    /// Returns true if a post with the given membership flag passes the filter
    pub fn admits(filter: Option<Self>, is_members: bool) -> bool {
        match filter {
            None => true,
            Some(Self::MembersOnly) => is_members,
            Some(Self::NoMembers) => !is_members,
        }
    }
}

/// Categories of comments that can be saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum CommentCategory {
    All,
    Hearted,
    Pinned,
    Creator,
    Members,
}

impl fmt::Display for CommentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Hearted => "hearted",
            Self::Pinned => "pinned",
            Self::Creator => "creator",
            Self::Members => "members",
        };
        write!(f, "{}", name)
    }
}

/// Requested comment categories plus the per-post cap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentSelection {
    pub categories: BTreeSet<CommentCategory>,
    pub max_comments: Option<usize>,
}

impl CommentSelection {
    pub fn new(categories: impl IntoIterator<Item = CommentCategory>, max_comments: Option<usize>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
            max_comments,
        }
    }

    /// Returns true if no comments were requested at all
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn wants(&self, category: CommentCategory) -> bool {
        self.categories.contains(&category)
    }

    /// Returns true once `saved` comments have hit the cap
    pub fn cap_reached(&self, saved: usize) -> bool {
        self.max_comments.is_some_and(|max| saved >= max)
    }
}

/// Tunable timings and thresholds, loadable from a TOML file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Tuning {
    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub crawl: CrawlTuning,
}

/// Settle-wait durations in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait after navigation, refresh and tab open
    #[serde(rename = "page-load-ms")]
    pub page_load_ms: u64,

    /// Wait after clicking a poll entry to reveal percentages
    #[serde(rename = "poll-reveal-ms")]
    pub poll_reveal_ms: u64,

    /// Wait after closing an auxiliary tab
    #[serde(rename = "tab-close-ms")]
    pub tab_close_ms: u64,

    /// Wait after scrolling the window
    #[serde(rename = "scroll-ms")]
    pub scroll_ms: u64,

    /// Wait between failed attempts at the same post
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            page_load_ms: 1000,
            poll_reveal_ms: 500,
            tab_close_ms: 500,
            scroll_ms: 1000,
            retry_backoff_ms: 1000,
        }
    }
}

/// Crawl loop thresholds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CrawlTuning {
    /// Consecutive unproductive feed scrolls before the feed counts as exhausted
    #[serde(rename = "stall-rounds")]
    pub stall_rounds: u32,

    /// Consecutive empty comment scrolls before comment collection stops
    #[serde(rename = "comment-stall-rounds")]
    pub comment_stall_rounds: u32,

    /// Attempts per post before the run fails
    #[serde(rename = "post-attempts")]
    pub post_attempts: u32,

    /// Attempts per feed scroll before the run fails
    #[serde(rename = "scroll-attempts")]
    pub scroll_attempts: u32,

    /// Pixels scrolled per round
    #[serde(rename = "scroll-step")]
    pub scroll_step: i64,

    /// Pixels scrolled to get an out-of-bounds element back into range
    #[serde(rename = "nudge-step")]
    pub nudge_step: i64,
}

impl Default for CrawlTuning {
    fn default() -> Self {
        Self {
            stall_rounds: 30,
            comment_stall_rounds: 5,
            post_attempts: 5,
            scroll_attempts: 3,
            scroll_step: 500,
            nudge_step: 100,
        }
    }
}
