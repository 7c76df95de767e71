//! Domain models for the pipeline introspection server.
//!
//! # Core Concepts
//!
//! - [`BranchCategory`]: The four workflow categories (`discovery`, `integration`,
//!   `modules`, `context`) that pipeline branch names are prefixed with.
//! - [`BranchCategoryMap`] / [`BranchListing`]: Live branch names grouped by category.
//! - [`DocNode`]: The documentation tree, mirroring the `docs/` directory with
//!   Markdown files as leaves.
//!
//! Nothing here is persisted. Every value is rebuilt from git and the
//! filesystem on each request.
//!
//! The remaining types are the JSON bodies of the HTTP endpoints.

mod branch;
mod doc;
mod service;

pub use branch::*;
pub use doc::*;
pub use service::*;
