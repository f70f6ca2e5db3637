use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookwright::commands::{self, CommandError, Workspace};
use bookwright::config::Config;
use bookwright::llm::OpenAiClient;
use bookwright::models::{ChapterNumber, DEFAULT_TARGET_WORDS};
use bookwright::pipeline::PlaceholderChecker;
use bookwright::vcs::{GitHubClient, GitRepository, VersionControl};

#[derive(Parser)]
#[command(name = "bkw")]
#[command(about = "Draft a manuscript with an LLM and publish it through git")]
struct Cli {
    /// Project root holding manuscript/ and prompts/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter manuscript + prompts
    Init,
    /// Generate/refresh manuscript/outline.md using the LLM
    Outline {
        /// One-liner/short synopsis
        #[arg(long)]
        synopsis: String,
    },
    /// Draft a chapter using outline + bible
    Expand {
        #[arg(long)]
        chapter: ChapterNumber,

        /// Approx target words
        #[arg(long, default_value_t = DEFAULT_TARGET_WORDS)]
        target_words: u32,
    },
    /// Append continuity notes to manuscript/bible.md
    Continuity,
    /// Create or switch to a branch
    Branch {
        /// Branch name
        #[arg(long)]
        name: String,
    },
    /// Stage and commit all changes
    Commit {
        /// Commit message
        #[arg(long)]
        message: String,
    },
    /// Push the current branch and open a pull request
    Pr {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        body: String,
    },
}

/// Initialize tracing on stderr so stdout carries only command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "bookwright=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env(&cli.root);
    let ws = Workspace::new(&config);
    let repo = || GitRepository::detect(&config.root);

    let result = match cli.command {
        Commands::Init => commands::init(&ws),
        Commands::Outline { synopsis } => {
            let llm = OpenAiClient::from_config(&config.llm);
            commands::outline(&ws, &llm, &synopsis).await
        }
        Commands::Expand {
            chapter,
            target_words,
        } => {
            let llm = OpenAiClient::from_config(&config.llm);
            commands::expand(&ws, &llm, chapter, target_words).await
        }
        Commands::Continuity => commands::continuity(&ws, &PlaceholderChecker),
        Commands::Branch { name } => {
            let repo = repo();
            commands::branch(repo.as_ref().map(|r| r as &dyn VersionControl), &name)
        }
        Commands::Commit { message } => {
            let repo = repo();
            commands::commit(repo.as_ref().map(|r| r as &dyn VersionControl), &message)
        }
        Commands::Pr { title, body } => {
            let repo = repo();
            let host = GitHubClient::from_config(&config.hosting);
            commands::pull_request(
                &config.hosting,
                repo.as_ref().map(|r| r as &dyn VersionControl),
                &host,
                &title,
                &body,
            )
            .await
        }
    };

    match result {
        Ok(report) => {
            println!("{}", report);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(e) => {
            report_failure(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report_failure(e: &CommandError) {
    tracing::error!(error = %e, "Command failed");
    eprintln!("[!] {}", e);
}
