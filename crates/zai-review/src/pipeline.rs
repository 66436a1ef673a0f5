use zai_review_core::{ChangedFile, ReviewError, Settings};

use crate::github::GitHubClient;
use crate::llm::LlmClient;
use crate::prompt;

/// Heading that starts every posted review comment.
pub const COMMENT_HEADING: &str = "## Z.ai Code Review";

/// How a review run ended.
///
/// # Examples
///
/// ```
/// use zai_review::pipeline::ReviewOutcome;
///
/// let outcome = ReviewOutcome::Posted {
///     files_reviewed: 2,
///     comment_url: None,
/// };
/// assert!(outcome.is_posted());
/// assert!(!ReviewOutcome::Skipped.is_posted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// No changed file carried a patch; nothing was sent or posted.
    Skipped,
    /// The review was generated and posted as a comment.
    Posted {
        /// Number of files whose patch was sent to the model.
        files_reviewed: usize,
        /// Web URL of the posted comment, when GitHub returned one.
        comment_url: Option<String>,
    },
}

impl ReviewOutcome {
    /// Whether a comment was posted.
    pub fn is_posted(&self) -> bool {
        matches!(self, Self::Posted { .. })
    }
}

/// Format the comment body for a review.
///
/// # Examples
///
/// ```
/// use zai_review::pipeline::format_comment;
///
/// assert_eq!(format_comment("Looks good."), "## Z.ai Code Review\n\nLooks good.");
/// ```
pub fn format_comment(review: &str) -> String {
    format!("{COMMENT_HEADING}\n\n{review}")
}

/// Progress line logged before the review request. Counts every listed
/// file, including those whose patch is left out of the prompt.
fn sending_message(files: &[ChangedFile]) -> String {
    format!("Sending {} file(s) to Z.ai for review...", files.len())
}

/// Review orchestrator for one pull request.
///
/// Lists the changed files, builds the prompt, asks the model once, and posts
/// one comment. Steps run strictly in sequence and nothing is retried.
pub struct ReviewPipeline {
    settings: Settings,
}

impl ReviewPipeline {
    /// Create a pipeline for the given run settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Run the review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Config`] before any network call when the run
    /// was not triggered by a pull request or no GitHub token is set.
    /// Propagates GitHub and LLM failures from later steps; in that case no
    /// comment has been posted.
    pub async fn run(&self) -> Result<ReviewOutcome, ReviewError> {
        let Some(pull_number) = self.settings.pull_number else {
            return Err(ReviewError::Config(
                "This action only runs on pull_request events.".into(),
            ));
        };
        let repo = &self.settings.repo;

        let github = GitHubClient::new(&self.settings.github)?;

        tracing::info!("Fetching changed files for PR #{pull_number}...");
        let files = github.list_changed_files(repo, pull_number).await?;
        tracing::debug!(files = files.len(), repo = %repo, "listed changed files");

        if !prompt::has_reviewable_changes(&files) {
            tracing::info!("No patchable changes found. Skipping review.");
            return Ok(ReviewOutcome::Skipped);
        }

        let files_reviewed = files.iter().filter(|f| f.has_patch()).count();
        let review_prompt = prompt::build_review_prompt(&files);

        let llm = LlmClient::new(&self.settings.llm)?;
        tracing::info!("{}", sending_message(&files));
        tracing::debug!(model = llm.model(), prompt_chars = review_prompt.len(), "sending review request");
        let review = llm.review(&review_prompt).await?;

        let comment_url = github
            .create_comment(repo, pull_number, &format_comment(&review))
            .await?;

        match &comment_url {
            Some(url) => tracing::info!("Review posted successfully: {url}"),
            None => tracing::info!("Review posted successfully."),
        }

        Ok(ReviewOutcome::Posted {
            files_reviewed,
            comment_url,
        })
    }
}
