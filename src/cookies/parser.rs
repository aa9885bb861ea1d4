/// A single cookie-file entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub domain: String,
    pub path: String,
    pub http_only: bool,
    pub expiry: i64,
    pub name: String,
    pub value: String,
}

/// Parses the contents of a Netscape cookie file
///
/// Follows <https://everything.curl.dev/http/cookies/fileformat>. Each entry is
/// one line of seven tab-separated fields: domain, include-subdomains flag,
/// path, http-only flag, expiry epoch, name, value.
///
/// Lines are silently skipped when they:
/// - are blank or start with `#`
/// - are not newline-terminated
/// - do not have exactly seven fields
/// - carry a non-integer expiry
///
/// # Example
///
/// ```
/// use community_archiver::cookies::parse_cookies;
///
/// let cookies = parse_cookies(".youtube.com\tTRUE\t/\tTRUE\t0\tSID\tabc\n");
/// assert_eq!(cookies[0].value, "abc");
/// ```
pub fn parse_cookies(content: &str) -> Vec<Cookie> {
    content
        .split_inclusive('\n')
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<Cookie> {
    let line = line.trim_start();

    // Ignore empty lines or comments
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if !line.ends_with('\n') {
        return None;
    }

    let fields: Vec<&str> = line.trim_end().split('\t').collect();
    if fields.len() != 7 {
        return None;
    }

    let expiry = fields[4].parse::<i64>().ok()?;

    Some(Cookie {
        domain: fields[0].to_string(),
        path: fields[2].to_string(),
        http_only: fields[3].eq_ignore_ascii_case("true"),
        expiry,
        name: fields[5].to_string(),
        value: fields[6].to_string(),
    })
}
