/// Size suffix requesting the largest rendition the image CDN serves
pub const HIGH_RES_SUFFIX: &str = "=s3840";

/// Rewrites an image URL to its high-resolution variant
///
/// Feed images carry a size directive after the first `=` (e.g. `=s640` or
/// `=s640-c-fcrop64=...`). Everything from that `=` on is replaced with
/// `HIGH_RES_SUFFIX`; URLs without a directive get the suffix appended.
///
/// # Examples
///
/// ```
/// use community_archiver::url::upgrade_image_url;
///
/// assert_eq!(
///     upgrade_image_url("https://yt3.ggpht.com/abc=s640-c-fcrop64"),
///     "https://yt3.ggpht.com/abc=s3840"
/// );
/// ```
pub fn upgrade_image_url(url: &str) -> String {
    let base = url.split('=').next().unwrap_or(url);
    format!("{}{}", base, HIGH_RES_SUFFIX)
}
