//! gh-approve-deploy: review pending GitHub Actions deployments.
//!
//! Quick start:
//!   gh-approve-deploy -r octo/app -e production -i 1234 --approve
//!   gh-approve-deploy -r octo/app -e production -i 1234 --reject
//!
//! Authentication comes from the GitHub CLI (`gh auth login`) or GH_TOKEN.

use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use gh_approve_deploy::cli::review;
use gh_approve_deploy::deploy::{DeploymentRequest, DesiredState};
use gh_approve_deploy::error::AckError;
use tracing_subscriber::EnvFilter;

/// Approve or reject a deployment waiting on a GitHub environment.
#[derive(Parser)]
#[command(
    name = "gh-approve-deploy",
    version,
    about = "Approve or reject a pending GitHub Actions deployment",
    long_about = "Approve or reject a workflow run that is waiting for review\n\
                  on a protected GitHub environment.\n\n\
                  Examples:\n  \
                  gh-approve-deploy -r octo/app -e production -i 1234 --approve\n  \
                  gh-approve-deploy -r octo/app -e staging -i 1234 --reject"
)]
struct Cli {
    /// Github repository name including owner, optionally prefixed by host
    #[arg(short, long, env = "GH_REPO", value_name = "[HOST/]OWNER/REPO")]
    repo: String,

    /// Github environment name
    #[arg(short, long, value_name = "NAME")]
    env: String,

    /// Github Action run id to approve
    #[arg(short = 'i', long = "run-id", value_name = "ID")]
    run_id: String,

    /// Approve deployment
    #[arg(long)]
    approve: bool,

    /// Reject deployment
    #[arg(long)]
    reject: bool,
}

impl Cli {
    fn into_request(self) -> Result<DeploymentRequest, AckError> {
        let state = DesiredState::from_flags(self.approve, self.reject)?;
        DeploymentRequest::new(self.repo, self.run_id, self.env, state)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Quiet unless RUST_LOG asks for more; logs go to stderr so stdout only
    // carries the confirmation.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gh_approve_deploy=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => std::process::exit(0),
                _ => std::process::exit(1),
            }
        }
    };

    let result = match cli.into_request() {
        Ok(request) => review::run_review(&request).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        let code = e.exit_code();
        let e = anyhow::Error::new(e);
        eprintln!();
        eprintln!("  {} {}", "✗".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        eprintln!();
        std::process::exit(code);
    }
}
