//! Storage module for persisting archive units
//!
//! This module handles everything written to the output directory:
//! - One directory per post, keyed by the post identifier
//! - `post.json` metadata plus ordinally named image files
//! - `comments/<comment_id>.json` and an optional `screenshot.png`
//!
//! Every write is idempotent and failures are contained per file.

mod images;
mod writer;

pub use images::{build_image_client, detect_extension, fetch_image, DEFAULT_IMAGE_EXTENSION};
pub use writer::ArchiveWriter;

use std::path::PathBuf;

/// File name of the post metadata document
pub const POST_FILE: &str = "post.json";

/// File name of the post screenshot
pub const SCREENSHOT_FILE: &str = "screenshot.png";

/// Subdirectory holding one document per saved comment
pub const COMMENTS_DIR: &str = "comments";

/// What a single `save_post` call managed to write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Directory of the archive unit
    pub post_dir: PathBuf,

    /// `post.json` was written
    pub metadata_written: bool,

    /// Images fetched and written by this call
    pub images_written: usize,

    /// Images already on disk and left untouched
    pub images_existing: usize,

    /// Images that could not be fetched or written
    pub images_failed: usize,
}

impl SaveReport {
    /// Returns true if every part of the post was persisted
    pub fn is_complete(&self) -> bool {
        self.metadata_written && self.images_failed == 0
    }
}
