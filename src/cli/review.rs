//! The review flow: identity → environment → decision.
//!
//! Every step is a hard stop. Nothing is submitted unless the user and the
//! environment id were both resolved.

use crate::deploy::{self, AcknowledgeResult, DeploymentRequest};
use crate::error::Result;
use crate::github::{self, GithubClient};

/// What a completed review produced.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub user: String,
    pub environment_id: u64,
    pub deployment: AcknowledgeResult,
}

/// Resolve credentials from the ambient `gh` setup, run the review and print
/// the confirmation.
pub async fn run_review(request: &DeploymentRequest) -> Result<()> {
    let credentials = github::resolve_credentials(request.host())?;
    let client = GithubClient::new(&credentials)?;

    let outcome = execute(&client, request).await?;

    println!(
        "{}",
        deploy::format_confirmation(&outcome.deployment, request.state(), &outcome.user)
    );
    Ok(())
}

/// Run the three API calls in order against an existing client.
pub async fn execute(client: &GithubClient, request: &DeploymentRequest) -> Result<ReviewOutcome> {
    let user = deploy::current_user(client).await?;
    tracing::debug!("Acting as {}", user);

    let environment_id = deploy::resolve_environment_id(
        client,
        request.repository(),
        request.run_id(),
        request.environment(),
    )
    .await?;
    tracing::debug!(
        "Environment {} resolved to id {}",
        request.environment(),
        environment_id
    );

    let deployment = deploy::acknowledge(
        client,
        request.repository(),
        request.run_id(),
        environment_id,
        request.state(),
        &user,
    )
    .await?;
    tracing::debug!(
        "Deployment {} {} ({})",
        deployment.environment,
        request.state(),
        deployment.sha
    );

    Ok(ReviewOutcome {
        user,
        environment_id,
        deployment,
    })
}
