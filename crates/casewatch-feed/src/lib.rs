//! # casewatch-feed
//!
//! Atom feed client for the National Archives Find Case Law service.
//!
//! One HTTP GET per run, a small non-validating XML pull parser, and
//! entry extraction into [`casewatch_core::CaseRecord`]s. Entries
//! missing a title or an alternate link are dropped silently; a missing
//! published date falls back to the `"Unknown"` sentinel.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod atom;
mod client;
mod error;
pub mod xml;

pub use client::FeedClient;
pub use error::{Error, Result};
