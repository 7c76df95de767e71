//! Read-only introspection server for a branch-based development pipeline.
//!
//! Exposes the repository's categorized branches, per-branch JSON context
//! documents and the Markdown documentation tree over HTTP. Everything is
//! recomputed from git and the filesystem on each request.

pub mod api;
pub mod catalog;
pub mod config;
pub mod context;
pub mod docs;
pub mod models;
