use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single archived community post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Canonical post URL; the post id is derived from it
    pub url: String,

    /// Raw text body
    pub text: String,

    /// High-resolution image URLs, avatar excluded
    pub images: Vec<String>,

    /// Outbound links, channel and sign-in links excluded
    pub links: Vec<String>,

    pub is_members: bool,

    /// Human-relative date, e.g. "3 days ago"
    pub relative_date: String,

    /// Comment count as shown in the feed (may be abbreviated)
    pub approximate_num_comments: Option<String>,

    /// Comment count from the post's own comments panel
    pub num_comments: Option<String>,

    /// Like count as shown, e.g. "1.2K"
    pub num_thumbs_up: Option<String>,

    pub poll: Option<Poll>,

    pub when_archived: DateTime<Utc>,
}

/// A poll attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub entries: Vec<PollEntry>,
    pub total_votes: Option<String>,
}

/// One poll option and its share of the vote
///
/// Either field is `None` when it could not be read from the rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollEntry {
    pub option: Option<String>,
    pub percentage: Option<u8>,
}

impl PollEntry {
    /// Parses the two-line text of a rendered poll choice
    ///
    /// The first line is the option label and the second the percentage, e.g.
    /// `"Option A\n42%"`. Anything unreadable degrades to `None`; this never
    /// fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use community_archiver::model::PollEntry;
    ///
    /// let entry = PollEntry::parse("Option A\n42%");
    /// assert_eq!(entry.option.as_deref(), Some("Option A"));
    /// assert_eq!(entry.percentage, Some(42));
    ///
    /// let hidden = PollEntry::parse("Option B\n");
    /// assert_eq!(hidden.percentage, None);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut lines = raw.lines();

        let option = lines.next().map(str::to_string);
        let percentage = lines.next().and_then(parse_percentage);

        Self { option, percentage }
    }
}

fn parse_percentage(line: &str) -> Option<u8> {
    let number = line.split('%').next()?.trim();
    number.parse::<u8>().ok().filter(|p| *p <= 100)
}
