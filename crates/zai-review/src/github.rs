use octocrab::service::middleware::retry::RetryConfig;
use serde::Serialize;
use zai_review_core::{ChangedFile, GitHubConfig, RepoRef, ReviewError};

/// Page size for the changed-files listing. Only the first page is fetched,
/// so pull requests with more files are reviewed partially.
pub const FILES_PER_PAGE: u8 = 100;

#[derive(Serialize)]
struct ListFilesParams {
    per_page: u8,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// GitHub REST client for listing pull-request files and posting comments.
///
/// Built with retries disabled: every call is sent once.
///
/// # Examples
///
/// ```no_run
/// use zai_review_core::GitHubConfig;
/// use zai_review::github::GitHubClient;
///
/// # #[tokio::main]
/// # async fn main() {
/// let client = GitHubClient::new(&GitHubConfig {
///     token: Some("ghp_xxxx".into()),
///     api_url: "https://api.github.com".into(),
/// })
/// .unwrap();
/// # }
/// ```
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
}

impl GitHubClient {
    /// Create a client from the GitHub settings.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Config`] if no token is available or the API
    /// URL is invalid, or [`ReviewError::Transport`] if the client cannot be
    /// built.
    pub fn new(config: &GitHubConfig) -> Result<Self, ReviewError> {
        let token = config.token.clone().ok_or_else(|| {
            ReviewError::Config(
                "GITHUB_TOKEN not set. Pass the GITHUB_TOKEN input or set GITHUB_TOKEN env var"
                    .into(),
            )
        })?;

        let octocrab = octocrab::Octocrab::builder()
            .base_uri(config.api_url.as_str())
            .map_err(|e| {
                ReviewError::Config(format!("invalid GitHub API URL '{}': {e}", config.api_url))
            })?
            .personal_token(token)
            .add_retry_config(RetryConfig::None)
            .build()
            .map_err(|e| ReviewError::Transport(format!("failed to create GitHub client: {e}")))?;

        Ok(Self { octocrab })
    }

    /// List the files changed by a pull request, first page only.
    ///
    /// Records are returned as GitHub sends them, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::GitHub`] on an API error response and
    /// [`ReviewError::Transport`] on network failure.
    pub async fn list_changed_files(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> Result<Vec<ChangedFile>, ReviewError> {
        let route = format!(
            "/repos/{}/{}/pulls/{pull_number}/files",
            repo.owner, repo.name
        );
        let params = ListFilesParams {
            per_page: FILES_PER_PAGE,
        };

        self.octocrab
            .get(route, Some(&params))
            .await
            .map_err(|e| github_error("failed to list pull request files", e))
    }

    /// Post `body` as an issue comment on the pull request.
    ///
    /// Returns the comment's web URL when GitHub reports one.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::GitHub`] on an API error response and
    /// [`ReviewError::Transport`] on network failure.
    pub async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<Option<String>, ReviewError> {
        let route = format!(
            "/repos/{}/{}/issues/{issue_number}/comments",
            repo.owner, repo.name
        );

        let response: serde_json::Value = self
            .octocrab
            .post(route, Some(&CommentBody { body }))
            .await
            .map_err(|e| github_error("failed to post comment", e))?;

        Ok(response
            .get("html_url")
            .and_then(|u| u.as_str())
            .map(str::to_string))
    }
}

fn github_error(action: &str, err: octocrab::Error) -> ReviewError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            ReviewError::GitHub(format!("{action}: {} ({})", source.message, source.status_code))
        }
        other => ReviewError::Transport(format!("{action}: {other}")),
    }
}
