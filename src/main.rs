use std::path::PathBuf;

use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;
use zai_review::pipeline::{ReviewOutcome, ReviewPipeline};
use zai_review::workflow;
use zai_review_core::{ActionInputs, ReviewError, Settings};

#[derive(Parser)]
#[command(
    name = "zai-review",
    version,
    about = "Review a GitHub pull request with Z.ai and post the result as a comment",
    long_about = "Review a GitHub pull request with Z.ai and post the result as a comment.\n\n\
                   Runs as a GitHub Action step on pull_request events. Inputs are read from\n\
                   the INPUT_* variables the runner sets, or from the flags below.\n\n\
                   Examples:\n  \
                     zai-review                                   Run inside a workflow\n  \
                     zai-review --repository octocat/hello-world \\\n    \
                       --event-path event.json --model glm-4.7    Run locally against a saved event"
)]
struct Cli {
    /// Z.ai API key (required)
    #[arg(long, env = "INPUT_ZAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier (default: glm-4.7)
    #[arg(long, env = "INPUT_ZAI_MODEL")]
    model: Option<String>,

    /// GitHub token used to list files and post the comment
    #[arg(
        long,
        env = "INPUT_GITHUB_TOKEN",
        hide_env_values = true,
        long_help = "GitHub token used to list files and post the comment.\n\n\
                     Falls back to the GITHUB_TOKEN environment variable."
    )]
    github_token: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    env_github_token: Option<String>,

    /// Repository in owner/repo form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Path to the triggering event's JSON payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    github_api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn into_inputs(self) -> ActionInputs {
        ActionInputs {
            api_key: self.api_key,
            model: self.model,
            github_token: self
                .github_token
                .filter(|t| !t.trim().is_empty())
                .or(self.env_github_token),
            repository: self.repository,
            event_path: self.event_path,
            github_api_url: self.github_api_url,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        workflow::set_failed(&err.to_string());
        return Err(err.into());
    }
    Ok(())
}

async fn run(cli: Cli) -> std::result::Result<(), ReviewError> {
    let settings = Settings::load(cli.into_inputs())?;
    tracing::debug!(?settings, "loaded settings");

    let outcome = ReviewPipeline::new(settings).run().await?;
    if let ReviewOutcome::Posted { files_reviewed, .. } = outcome {
        tracing::debug!(files_reviewed, "review complete");
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info,zai_review=debug,zai_review_core=debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stdout)
        .init();
}
