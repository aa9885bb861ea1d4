use crate::config::types::Tuning;
use crate::config::validation::validate_tuning;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a tuning file from the given path
///
/// Sections and keys that are absent keep their defaults, so an empty file is
/// a valid tuning file.
///
/// # Arguments
///
/// * `path` - Path to the TOML tuning file
///
/// # Returns
///
/// * `Ok(Tuning)` - Successfully loaded and validated tuning
/// * `Err(ConfigError)` - Failed to load, parse, or validate the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use community_archiver::config::load_tuning;
///
/// let tuning = load_tuning(Path::new("tuning.toml")).unwrap();
/// println!("Stall rounds: {}", tuning.crawl.stall_rounds);
/// ```
pub fn load_tuning(path: &Path) -> Result<Tuning, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_tuning(&content)
}

/// Parses tuning TOML from a string and validates it
pub fn parse_tuning(content: &str) -> Result<Tuning, ConfigError> {
    let tuning: Tuning = toml::from_str(content)?;
    validate_tuning(&tuning)?;
    Ok(tuning)
}

/// Computes a SHA-256 hash of the tuning file content
///
/// Logged at startup so an archive can be traced back to the timings that
/// produced it.
pub fn compute_tuning_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a tuning file and returns both the tuning and its hash
pub fn load_tuning_with_hash(path: &Path) -> Result<(Tuning, String), ConfigError> {
    let tuning = load_tuning(path)?;
    let hash = compute_tuning_hash(path)?;
    Ok((tuning, hash))
}
