//! GitHub Actions workflow commands.
//!
//! The runner reads `::command::value` lines from the step's stdout. Only the
//! `error` command is needed: it marks the run failed with an annotation.

/// Format an `::error::` workflow command for `message`.
///
/// # Examples
///
/// ```
/// use zai_review::workflow::error_command;
///
/// assert_eq!(error_command("boom"), "::error::boom");
/// assert_eq!(error_command("line 1\nline 2"), "::error::line 1%0Aline 2");
/// ```
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Print an `::error::` command so the runner reports the step as failed.
pub fn set_failed(message: &str) {
    println!("{}", error_command(message));
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
