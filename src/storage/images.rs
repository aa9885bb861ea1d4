//! Image fetching and format detection

use reqwest::Client;
use std::time::Duration;

/// Extension used when the downloaded bytes match no known format
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Builds the HTTP client used for image downloads
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_image_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Downloads an image, treating non-success statuses as errors
pub async fn fetch_image(client: &Client, url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}

/// Picks a file extension from the format signature of `bytes`
///
/// # Examples
///
/// ```
/// use community_archiver::storage::detect_extension;
///
/// let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
/// assert_eq!(detect_extension(png), "png");
/// assert_eq!(detect_extension(b"not an image"), "png");
/// ```
pub fn detect_extension(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or(DEFAULT_IMAGE_EXTENSION)
}
