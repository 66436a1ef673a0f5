use std::fmt;

use serde::{Deserialize, Serialize};

/// A file changed by a pull request, as listed by the GitHub API.
///
/// # Examples
///
/// ```
/// use zai_review_core::{ChangedFile, FileStatus};
///
/// let file = ChangedFile {
///     filename: "src/lib.rs".into(),
///     status: FileStatus::Modified,
///     patch: Some("@@ -1 +1 @@\n-a\n+b".into()),
/// };
/// assert!(file.has_patch());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path of the file relative to the repository root.
    pub filename: String,
    /// How the file changed.
    pub status: FileStatus,
    /// Unified diff for the file. Absent for binary or oversized files.
    #[serde(default)]
    pub patch: Option<String>,
}

impl ChangedFile {
    /// Whether the file carries a non-empty patch.
    ///
    /// # Examples
    ///
    /// ```
    /// use zai_review_core::{ChangedFile, FileStatus};
    ///
    /// let binary = ChangedFile {
    ///     filename: "logo.png".into(),
    ///     status: FileStatus::Added,
    ///     patch: None,
    /// };
    /// assert!(!binary.has_patch());
    /// ```
    pub fn has_patch(&self) -> bool {
        self.patch.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Change status of a pull-request file.
///
/// Unrecognized values deserialize to [`FileStatus::Unknown`].
///
/// # Examples
///
/// ```
/// use zai_review_core::FileStatus;
///
/// let status: FileStatus = serde_json::from_str("\"renamed\"").unwrap();
/// assert_eq!(status, FileStatus::Renamed);
/// assert_eq!(status.to_string(), "renamed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// New file.
    Added,
    /// Deleted file.
    Removed,
    /// Edited in place.
    Modified,
    /// Moved, possibly with edits.
    Renamed,
    /// Copied from another file.
    Copied,
    /// Mode or metadata change.
    Changed,
    /// Listed without changes.
    Unchanged,
    /// Any status this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}
