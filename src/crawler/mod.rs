//! Crawler module for archiving a community feed
//!
//! This module contains the core crawling logic, including:
//! - The scroll-driven crawl engine (`Archiver`)
//! - Per-post extraction and persistence (`PostBuilder`)
//! - Comment section collection (`CommentCollector`)
//! - The bounded retry combinator and per-run session state

mod builder;
mod comments;
mod coordinator;
pub mod retry;
mod session;

pub use builder::{BuildReport, PostBuilder};
pub use comments::CommentCollector;
pub use coordinator::{run_archiver, Archiver};
pub use retry::{retry, Attempt, Disposition, RetryError, RetryPolicy};
pub use session::CrawlSession;
