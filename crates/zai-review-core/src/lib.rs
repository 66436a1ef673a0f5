//! Core types, configuration, and error handling for the Z.ai review action.
//!
//! This crate provides the shared foundation used by the review crate and the
//! `zai-review` binary:
//! - [`ReviewError`]: unified error type using `thiserror`
//! - [`Settings`]: immutable run configuration built from action inputs and
//!   the triggering event payload
//! - Shared types: [`ChangedFile`], [`FileStatus`]

mod config;
mod error;
mod types;

pub use config::{
    ActionInputs, EventPayload, GitHubConfig, LlmConfig, RepoRef, Settings, DEFAULT_GITHUB_API_URL,
    DEFAULT_MODEL, ZAI_API_URL,
};
pub use error::ReviewError;
pub use types::{ChangedFile, FileStatus};

/// A convenience `Result` type for review operations.
pub type Result<T> = std::result::Result<T, ReviewError>;
