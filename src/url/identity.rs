use crate::ArchiveError;
use url::Url;

/// Query parameter carrying a post's identity
pub const POST_ID_PARAM: &str = "lb";

/// Query parameter carrying a comment's identity
pub const COMMENT_ID_PARAM: &str = "lc";

/// Returns true if `href` is the canonical link of a community post
///
/// Feed elements contain many anchors (channel, avatar, external links); only
/// the post's own permalink is a `community?` URL carrying the identity param.
pub fn is_post_link(href: &str) -> bool {
    href.contains("community?") && href.contains(&format!("{}=", POST_ID_PARAM))
}

/// Derives a post's stable identifier from its URL
///
/// The `lb` query parameter is the identity; every other query parameter,
/// the fragment and the path are noise. Single-post URLs of the form
/// `/post/<id>` carry no `lb` and use the last path segment instead.
///
/// # Arguments
///
/// * `url` - Canonical post URL or single-post URL
///
/// # Returns
///
/// * `Ok(String)` - The post identifier
/// * `Err(ArchiveError::InvalidPostUrl)` - The URL does not identify a post
///
/// # Examples
///
/// ```
/// use community_archiver::url::post_id;
///
/// let id = post_id("https://www.youtube.com/channel/UC1/community?lb=Ugkx42&si=abc").unwrap();
/// assert_eq!(id, "Ugkx42");
/// ```
pub fn post_id(url: &str) -> Result<String, ArchiveError> {
    let invalid = || ArchiveError::InvalidPostUrl {
        url: url.to_string(),
    };
    let parsed = Url::parse(url).map_err(|_| invalid())?;

    if let Some(id) = query_param(&parsed, POST_ID_PARAM) {
        return Ok(id);
    }

    let mut segments = parsed.path_segments().ok_or_else(invalid)?;
    match (segments.next(), segments.next(), segments.next()) {
        (Some("post"), Some(id), None) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(invalid()),
    }
}

/// Derives a comment's identifier from its permalink
///
/// Uses the `lc` query parameter when present, otherwise the raw query
/// string, otherwise `"unknown"`.
pub fn comment_id(link: &str) -> String {
    let Ok(parsed) = Url::parse(link) else {
        return link
            .rsplit('/')
            .next()
            .and_then(|tail| tail.split_once('?'))
            .map(|(_, query)| query.to_string())
            .filter(|query| !query.is_empty())
            .unwrap_or_else(|| "unknown".to_string());
    };

    if let Some(id) = query_param(&parsed, COMMENT_ID_PARAM) {
        return id;
    }

    parsed
        .query()
        .filter(|query| !query.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
