//! Bounded retry combinator
//!
//! The crawl retries two kinds of flaky work: handling a single post and
//! scrolling the feed. Both go through `retry`, which owns attempt
//! accounting and backoff; callers only classify their errors.

use crate::browser::{BrowserFamily, OutOfBoundsRecovery};
use crate::{ArchiveError, DomError};
use std::future::Future;
use std::time::Duration;

/// How a failed attempt should be followed up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Wait the policy backoff, then try again
    Backoff,
    /// Try again immediately; the next attempt is told to nudge the page first
    Nudge,
    /// Give up now and return the error unchanged
    Fatal,
}

/// Information handed to each attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// 1-based attempt number
    pub number: u32,
    /// The previous attempt failed with a `Nudge` disposition
    pub after_nudge: bool,
}

/// Attempt cap and backoff shared by every attempt of one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }
}

/// Why `retry` gave up
#[derive(Debug)]
pub enum RetryError<E> {
    /// An attempt failed with an error classified as fatal
    Fatal(E),
    /// Every attempt failed; `last` is the final error
    Exhausted { attempts: u32, last: E },
}

impl RetryError<ArchiveError> {
    /// Folds the retry outcome back into an `ArchiveError` for `url`
    pub fn into_archive_error(self, url: &str) -> ArchiveError {
        match self {
            Self::Fatal(e) => e,
            Self::Exhausted { attempts, last } => ArchiveError::RetriesExhausted {
                url: url.to_string(),
                attempts,
                source: Box::new(last),
            },
        }
    }
}

/// Runs `op` until it succeeds, a fatal error occurs, or the cap is reached
///
/// Every attempt, including ones following a nudge, counts against
/// `policy.max_attempts`, so the loop always terminates.
///
/// # Arguments
///
/// * `policy` - Attempt cap and backoff
/// * `classify` - Maps an error to its `Disposition`
/// * `op` - The operation; receives the current `Attempt`
///
/// # Returns
///
/// * `Ok(T)` - The first successful result
/// * `Err(RetryError)` - A fatal error, or the last error once attempts ran out
pub async fn retry<T, E, Op, Fut, Classify>(
    policy: &RetryPolicy,
    mut classify: Classify,
    mut op: Op,
) -> Result<T, RetryError<E>>
where
    Op: FnMut(Attempt) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Classify: FnMut(&E) -> Disposition,
    E: std::fmt::Display,
{
    let mut attempt = Attempt {
        number: 1,
        after_nudge: false,
    };

    loop {
        let error = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        let disposition = classify(&error);
        if disposition == Disposition::Fatal {
            return Err(RetryError::Fatal(error));
        }

        if attempt.number >= policy.max_attempts {
            return Err(RetryError::Exhausted {
                attempts: attempt.number,
                last: error,
            });
        }

        tracing::debug!(
            "Attempt {}/{} failed ({:?}): {}",
            attempt.number,
            policy.max_attempts,
            disposition,
            error
        );

        if disposition == Disposition::Backoff && !policy.backoff.is_zero() {
            tokio::time::sleep(policy.backoff).await;
        }

        attempt = Attempt {
            number: attempt.number + 1,
            after_nudge: disposition == Disposition::Nudge,
        };
    }
}

/// Classifies a post-handling error for `family`
///
/// Configuration and environment failures are fatal. Out-of-bounds scroll
/// targets follow the family's recovery strategy; anything else backs off.
pub fn classify_post_error(family: BrowserFamily, error: &ArchiveError) -> Disposition {
    if error.is_fatal() {
        return Disposition::Fatal;
    }

    match error {
        ArchiveError::Dom(DomError::OutOfBounds(_)) => match family.out_of_bounds_recovery() {
            OutOfBoundsRecovery::Backoff => Disposition::Backoff,
            OutOfBoundsRecovery::Nudge => Disposition::Nudge,
        },
        _ => Disposition::Backoff,
    }
}
