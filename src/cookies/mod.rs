//! Netscape cookie-file support
//!
//! Cookies exported from a logged-in browser let the archiver see
//! members-only posts and poll results without driving a login flow.

mod parser;

pub use parser::{parse_cookies, Cookie};

use crate::ArchiveError;
use std::path::Path;

/// Loads cookies from a Netscape-format cookie file
///
/// # Arguments
///
/// * `path` - Path to the cookie file
///
/// # Returns
///
/// * `Ok(Vec<Cookie>)` - Every well-formed cookie in the file
/// * `Err(ArchiveError::CookieFileMissing)` - The path does not exist
/// * `Err(ArchiveError::Io)` - The file exists but could not be read
pub fn load_cookies(path: &Path) -> Result<Vec<Cookie>, ArchiveError> {
    if !path.exists() {
        return Err(ArchiveError::CookieFileMissing {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let cookies = parse_cookies(&content);
    tracing::debug!("Parsed {} cookies from {}", cookies.len(), path.display());
    Ok(cookies)
}

/// Keeps only the cookies whose domain appears in `url`
pub fn cookies_for_url<'a>(cookies: &'a [Cookie], url: &str) -> Vec<&'a Cookie> {
    cookies
        .iter()
        .filter(|cookie| url.contains(&cookie.domain))
        .collect()
}
