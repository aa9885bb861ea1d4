//! Integration tests for the archiver, driven against an in-memory browser

mod support;

mod comment_tests;
mod retry_tests;
