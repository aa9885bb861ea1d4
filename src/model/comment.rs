use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single archived comment thread row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: Option<String>,

    /// Human-relative date, e.g. "2 weeks ago"
    pub relative_date: Option<String>,

    /// Members badge tooltip, e.g. "Member for 2 years"
    pub member_length: Option<String>,

    pub likes: Option<String>,

    /// The creator hearted this comment
    pub is_hearted: bool,

    pub is_pinned: bool,

    /// Body text with emotes written as `<::name::>`
    pub contents: Option<String>,

    /// Reply summary, e.g. "12 replies"
    pub replies: Option<String>,

    /// Comment permalink; the comment id is derived from it
    pub link: String,

    pub when_archived: DateTime<Utc>,
}
