use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ReviewError;

/// Model used when the `ZAI_MODEL` input is not set.
pub const DEFAULT_MODEL: &str = "glm-4.7";

/// Z.ai chat-completions endpoint.
pub const ZAI_API_URL: &str = "https://api.z.ai/api/coding/paas/v4/chat/completions";

/// GitHub REST API base used outside GitHub Enterprise.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Raw action inputs as collected by the binary from flags and environment.
///
/// Empty strings are treated the same as missing values.
///
/// # Examples
///
/// ```
/// use zai_review_core::ActionInputs;
///
/// let inputs = ActionInputs {
///     api_key: Some("zai-key".into()),
///     repository: Some("octocat/hello-world".into()),
///     ..ActionInputs::default()
/// };
/// assert!(inputs.model.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    /// `ZAI_API_KEY` input.
    pub api_key: Option<String>,
    /// `ZAI_MODEL` input.
    pub model: Option<String>,
    /// `GITHUB_TOKEN` input, or the `GITHUB_TOKEN` environment variable.
    pub github_token: Option<String>,
    /// `owner/repo` of the repository the workflow runs in.
    pub repository: Option<String>,
    /// Path to the JSON payload of the triggering event.
    pub event_path: Option<PathBuf>,
    /// GitHub REST API base URL.
    pub github_api_url: Option<String>,
}

/// The subset of a GitHub event payload the action reads.
///
/// # Examples
///
/// ```
/// use zai_review_core::EventPayload;
///
/// let event = EventPayload::from_json(r#"{"action":"opened","pull_request":{"number":7}}"#).unwrap();
/// assert_eq!(event.pull_number(), Some(7));
///
/// let push = EventPayload::from_json(r#"{"ref":"refs/heads/main"}"#).unwrap();
/// assert_eq!(push.pull_number(), None);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRequestEvent>,
}

#[derive(Debug, Clone, Deserialize)]
struct PullRequestEvent {
    #[serde(default)]
    number: Option<u64>,
}

impl EventPayload {
    /// Parse an event payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Serialization`] if the text is not valid JSON
    /// or `pull_request.number` is neither an integer nor null.
    pub fn from_json(content: &str) -> Result<Self, ReviewError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load the payload from `path`.
    ///
    /// A missing path or a path that does not exist yields an empty payload.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Config`] if the file exists but cannot be read
    /// or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ReviewError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::warn!("GITHUB_EVENT_PATH {} does not exist", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReviewError::Config(format!(
                "failed to read event payload from {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&content).map_err(|e| {
            ReviewError::Config(format!(
                "failed to parse event payload {}: {e}",
                path.display()
            ))
        })
    }

    /// Number of the pull request that triggered the run, if any.
    ///
    /// A missing, null, or zero number counts as no pull request.
    pub fn pull_number(&self) -> Option<u64> {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.number)
            .filter(|&n| n != 0)
    }
}

/// Repository coordinates in `owner/name` form.
///
/// # Examples
///
/// ```
/// use zai_review_core::RepoRef;
///
/// let repo: RepoRef = "rust-lang/rust".parse().unwrap();
/// assert_eq!(repo.owner, "rust-lang");
/// assert_eq!(repo.name, "rust");
/// assert_eq!(repo.to_string(), "rust-lang/rust");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl FromStr for RepoRef {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ReviewError::Config(format!(
                "invalid repository '{s}', expected owner/repo"
            ))),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Chat-completion provider settings.
#[derive(Clone)]
pub struct LlmConfig {
    /// Bearer credential for the Z.ai API.
    pub api_key: String,
    /// Model identifier sent in the request body.
    pub model: String,
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
}

impl LlmConfig {
    /// Settings for the Z.ai endpoint with the given key and model.
    ///
    /// # Examples
    ///
    /// ```
    /// use zai_review_core::{LlmConfig, ZAI_API_URL};
    ///
    /// let config = LlmConfig::new("key", "glm-4.7");
    /// assert_eq!(config.endpoint, ZAI_API_URL);
    /// ```
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: ZAI_API_URL.to_string(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// GitHub REST API settings.
#[derive(Clone)]
pub struct GitHubConfig {
    /// Access token. Required once the GitHub client is built.
    pub token: Option<String>,
    /// REST API base URL.
    pub api_url: String,
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Immutable settings for one action run.
///
/// Built once by [`Settings::load`] and passed to the review pipeline.
///
/// # Examples
///
/// ```
/// use zai_review_core::{ActionInputs, EventPayload, Settings};
///
/// let inputs = ActionInputs {
///     api_key: Some("zai-key".into()),
///     repository: Some("octocat/hello-world".into()),
///     ..ActionInputs::default()
/// };
/// let event = EventPayload::from_json(r#"{"pull_request":{"number":42}}"#).unwrap();
/// let settings = Settings::from_parts(inputs, &event).unwrap();
/// assert_eq!(settings.llm.model, "glm-4.7");
/// assert_eq!(settings.pull_number, Some(42));
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    /// Chat-completion provider settings.
    pub llm: LlmConfig,
    /// GitHub API settings.
    pub github: GitHubConfig,
    /// Repository the workflow runs in.
    pub repo: RepoRef,
    /// Pull request that triggered the run, if the event was a pull request.
    pub pull_number: Option<u64>,
}

impl Settings {
    /// Read the event payload named by `inputs` and build settings.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Config`] if a required input is missing or the
    /// event payload cannot be read.
    pub fn load(inputs: ActionInputs) -> Result<Self, ReviewError> {
        let event = EventPayload::load(inputs.event_path.as_deref())?;
        Self::from_parts(inputs, &event)
    }

    /// Build settings from already collected inputs and event payload.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Config`] if `ZAI_API_KEY` or the repository is
    /// missing, or the repository is not in `owner/repo` form.
    pub fn from_parts(inputs: ActionInputs, event: &EventPayload) -> Result<Self, ReviewError> {
        let api_key = non_empty(inputs.api_key).ok_or_else(|| {
            ReviewError::Config("Input required and not supplied: ZAI_API_KEY".into())
        })?;
        let model = non_empty(inputs.model).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let repository = non_empty(inputs.repository).ok_or_else(|| {
            ReviewError::Config(
                "GITHUB_REPOSITORY not set. Expected the repository in owner/repo form".into(),
            )
        })?;
        let repo: RepoRef = repository.parse()?;

        let api_url = non_empty(inputs.github_api_url)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string());

        Ok(Self {
            llm: LlmConfig::new(api_key, model),
            github: GitHubConfig {
                token: non_empty(inputs.github_token),
                api_url,
            },
            repo,
            pull_number: event.pull_number(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
