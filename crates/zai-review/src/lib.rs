//! Pull-request review orchestration against the Z.ai chat-completions API.
//!
//! Provides the review pipeline: GitHub client for listing changed files and
//! posting the comment, prompt construction, the LLM client, and GitHub
//! Actions workflow-command formatting.

pub mod github;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod workflow;
