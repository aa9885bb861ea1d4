//! Directory-per-post archive writer

use crate::model::{Comment, Post};
use crate::storage::images::{build_image_client, detect_extension, fetch_image};
use crate::storage::{SaveReport, COMMENTS_DIR, POST_FILE, SCREENSHOT_FILE};
use crate::url::{comment_id, post_id};
use crate::ArchiveError;
use reqwest::Client;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Writes posts, comments, images and screenshots under an output root
///
/// The layout is `<root>/<post_id>/`:
/// - `post.json`
/// - `<post_id>-<n>.<ext>` for the n-th image (zero-based)
/// - `screenshot.png`
/// - `comments/<comment_id>.json`
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    root: PathBuf,
    client: Client,
}

impl ArchiveWriter {
    /// Creates a writer rooted at `root`, creating the directory if needed
    ///
    /// # Returns
    ///
    /// * `Ok(ArchiveWriter)` - Root exists and the image client is ready
    /// * `Err(ArchiveError)` - Root could not be created or the client failed to build
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let client = build_image_client()?;
        Self::with_client(root, client)
    }

    /// Creates a writer that downloads images with `client`
    pub fn with_client(root: impl Into<PathBuf>, client: Client) -> Result<Self, ArchiveError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, client })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the archive unit for `post_id`
    pub fn post_dir(&self, post_id: &str) -> PathBuf {
        self.root.join(post_id)
    }

    /// Returns true if an archive unit already exists for `post_url`
    pub fn contains(&self, post_url: &str) -> Result<bool, ArchiveError> {
        let id = post_id(post_url)?;
        Ok(self.post_dir(&id).exists())
    }

    /// Persists a post's metadata and images
    ///
    /// Directory creation, the metadata write and every image are attempted
    /// independently; failures are logged and reported in the `SaveReport`,
    /// never returned.
    ///
    /// # Returns
    ///
    /// * `Ok(SaveReport)` - What was written
    /// * `Err(ArchiveError::InvalidPostUrl)` - The post URL carries no identity
    pub async fn save_post(&self, post: &Post) -> Result<SaveReport, ArchiveError> {
        let id = post_id(&post.url)?;
        let dir = self.post_dir(&id);
        let mut report = SaveReport {
            post_dir: dir.clone(),
            ..SaveReport::default()
        };

        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            tracing::warn!("Couldn't create directory for post at {}: {}", dir.display(), e);
            return Ok(report);
        }

        let data_path = dir.join(POST_FILE);
        match write_json(&data_path, post).await {
            Ok(()) => report.metadata_written = true,
            Err(e) => tracing::warn!("Couldn't save post data at {}: {}", data_path.display(), e),
        }

        for (index, image_url) in post.images.iter().enumerate() {
            let stem = format!("{}-{}", id, index);

            match existing_with_stem(&dir, &stem).await {
                Ok(Some(path)) => {
                    tracing::debug!("Image already saved at {}", path.display());
                    report.images_existing += 1;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Couldn't list {}: {}", dir.display(), e);
                    report.images_failed += 1;
                    continue;
                }
            }

            match self.save_image(&dir, &stem, image_url).await {
                Ok(path) => {
                    tracing::debug!("Saved image {}", path.display());
                    report.images_written += 1;
                }
                Err(e) => {
                    tracing::warn!("Couldn't save image `{}`: {}", image_url, e);
                    report.images_failed += 1;
                }
            }
        }

        Ok(report)
    }

    async fn save_image(&self, dir: &Path, stem: &str, url: &str) -> Result<PathBuf, ArchiveError> {
        let bytes = fetch_image(&self.client, url).await?;
        let path = dir.join(format!("{}.{}", stem, detect_extension(&bytes)));
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }

    /// Persists one comment under its parent post's directory
    ///
    /// The parent directory and `comments/` are created if absent.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(path))` - The comment document was written
    /// * `Ok(None)` - Writing failed; the failure was logged
    /// * `Err(ArchiveError::InvalidPostUrl)` - The parent URL carries no identity
    pub async fn save_comment(
        &self,
        post_url: &str,
        comment: &Comment,
    ) -> Result<Option<PathBuf>, ArchiveError> {
        let dir = self.post_dir(&post_id(post_url)?).join(COMMENTS_DIR);

        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            tracing::warn!("Couldn't make directory at {}: {}", dir.display(), e);
            return Ok(None);
        }

        let path = dir.join(format!("{}.json", comment_id(&comment.link)));
        match write_json(&path, comment).await {
            Ok(()) => Ok(Some(path)),
            Err(e) => {
                tracing::warn!("Couldn't save comment data at {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Writes a PNG screenshot next to the post's metadata
    pub async fn save_screenshot(
        &self,
        post_url: &str,
        png: &[u8],
    ) -> Result<Option<PathBuf>, ArchiveError> {
        let dir = self.post_dir(&post_id(post_url)?);
        let path = dir.join(SCREENSHOT_FILE);

        let written = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&path, png).await
        };

        match written.await {
            Ok(()) => Ok(Some(path)),
            Err(e) => {
                tracing::warn!("Couldn't save screenshot at {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArchiveError> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Finds a file in `dir` named `<stem>.<any extension>`
async fn existing_with_stem(dir: &Path, stem: &str) -> std::io::Result<Option<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.file_stem().is_some_and(|s| s == stem) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
