//! Shared test support: a fake DOM and community-page fixtures
#![allow(dead_code)]

pub mod fixtures;

pub use dom::{el, FakeBrowser, FakeElement, Node, Page, FAKE_PNG};
pub use fixtures::*;
