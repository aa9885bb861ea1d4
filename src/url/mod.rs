//! URL handling module for Community-Archiver
//!
//! Post and comment identity is carried in query parameters of their
//! permalinks, not in the path. This module extracts those identities and
//! rewrites image URLs to their high-resolution variant.

mod identity;
mod image;

// Re-export main functions
pub use identity::{comment_id, is_post_link, post_id, COMMENT_ID_PARAM, POST_ID_PARAM};
pub use image::{upgrade_image_url, HIGH_RES_SUFFIX};
