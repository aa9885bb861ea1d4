use crate::config::types::{ArchiverSettings, CrawlTuning, Tuning};
use crate::ConfigError;
use url::Url;

/// Validates the entire settings object
pub fn validate(settings: &ArchiverSettings) -> Result<(), ConfigError> {
    validate_target_url(&settings.url)?;
    validate_limits(settings)?;
    validate_webdriver_url(settings.webdriver_url.as_deref())?;
    validate_tuning(&settings.tuning)?;
    Ok(())
}

/// Validates the tuning section on its own (also used by the TOML loader)
pub fn validate_tuning(tuning: &Tuning) -> Result<(), ConfigError> {
    validate_crawl_tuning(&tuning.crawl)
}

/// Validates the URL to archive
fn validate_target_url(url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid URL '{}': {}", url, e)))?;

    if parsed.scheme() != "https" && parsed.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "URL '{}' must use http or https",
            url
        )));
    }

    Ok(())
}

/// Validates post and comment caps
fn validate_limits(settings: &ArchiverSettings) -> Result<(), ConfigError> {
    if settings.max_posts == Some(0) {
        return Err(ConfigError::Validation(
            "max_posts must be >= 1 when set".to_string(),
        ));
    }

    if settings.comments.max_comments == Some(0) {
        return Err(ConfigError::Validation(
            "max_comments must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_webdriver_url(url: Option<&str>) -> Result<(), ConfigError> {
    if let Some(url) = url {
        Url::parse(url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid webdriver_url '{}': {}", url, e))
        })?;
    }
    Ok(())
}

/// Validates crawl thresholds
fn validate_crawl_tuning(crawl: &CrawlTuning) -> Result<(), ConfigError> {
    let counters = [
        ("stall_rounds", crawl.stall_rounds),
        ("comment_stall_rounds", crawl.comment_stall_rounds),
        ("post_attempts", crawl.post_attempts),
        ("scroll_attempts", crawl.scroll_attempts),
    ];

    for (name, value) in counters {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    if crawl.scroll_step <= 0 {
        return Err(ConfigError::Validation(format!(
            "scroll_step must be > 0, got {}",
            crawl.scroll_step
        )));
    }

    Ok(())
}
