//! Kazani article rendering pipeline.
//!
//! Stored article bodies (structured IR as JSON, CommonMark markup, or trusted
//! raw HTML) are brought into one intermediate representation and rendered to
//! a single HTML fragment. See [`application::render`] for the entry points.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
