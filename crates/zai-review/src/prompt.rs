use zai_review_core::ChangedFile;

/// Instruction sent as the system message of every review request.
pub const SYSTEM_PROMPT: &str = "You are an expert code reviewer. Review the provided code \
changes and give clear, actionable feedback.";

const REVIEW_INSTRUCTION: &str = "Please review the following pull request changes and \
provide concise, constructive feedback. Focus on bugs, logic errors, security issues, and \
meaningful improvements. Skip trivial style comments.";

/// Whether any file in the pull request carries a patch worth reviewing.
///
/// # Examples
///
/// ```
/// use zai_review::prompt::has_reviewable_changes;
/// use zai_review_core::{ChangedFile, FileStatus};
///
/// let files = vec![ChangedFile {
///     filename: "logo.png".into(),
///     status: FileStatus::Added,
///     patch: None,
/// }];
/// assert!(!has_reviewable_changes(&files));
/// ```
pub fn has_reviewable_changes(files: &[ChangedFile]) -> bool {
    files.iter().any(ChangedFile::has_patch)
}

/// Build the user prompt: the review instruction followed by one diff block
/// per file with a patch, in input order.
///
/// Files without a patch are left out. With no patched file at all the
/// result is just the instruction; callers skip the review in that case.
///
/// # Examples
///
/// ```
/// use zai_review::prompt::build_review_prompt;
/// use zai_review_core::{ChangedFile, FileStatus};
///
/// let files = vec![ChangedFile {
///     filename: "src/main.rs".into(),
///     status: FileStatus::Modified,
///     patch: Some("+fn main() {}".into()),
/// }];
/// let prompt = build_review_prompt(&files);
/// assert!(prompt.contains("### src/main.rs (modified)"));
/// assert!(prompt.contains("```diff\n+fn main() {}\n```"));
/// ```
pub fn build_review_prompt(files: &[ChangedFile]) -> String {
    let diffs = files
        .iter()
        .filter_map(diff_block)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{REVIEW_INSTRUCTION}\n\n{diffs}")
}

fn diff_block(file: &ChangedFile) -> Option<String> {
    let patch = file.patch.as_deref().filter(|p| !p.is_empty())?;
    Some(format!(
        "### {} ({})\n```diff\n{patch}\n```",
        file.filename, file.status
    ))
}
