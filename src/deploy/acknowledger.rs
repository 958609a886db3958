//! Submits the review decision and renders the confirmation.

use crate::deploy::resolver::pending_deployments_path;
use crate::deploy::types::{AcknowledgeBody, AcknowledgeResult, DesiredState};
use crate::error::{AckError, Result};
use crate::github::GithubClient;
use colored::Colorize;

/// Approve or reject one pending environment on a run.
///
/// GitHub answers with the list of deployments the review released; only the
/// first one is returned.
pub async fn acknowledge(
    client: &GithubClient,
    repository: &str,
    run_id: &str,
    environment_id: u64,
    state: DesiredState,
    user: &str,
) -> Result<AcknowledgeResult> {
    let body = AcknowledgeBody::new(environment_id, state, user);
    let deployments: Vec<AcknowledgeResult> = client
        .post(&pending_deployments_path(repository, run_id), &body)
        .await?;

    deployments
        .into_iter()
        .next()
        .ok_or(AckError::EmptyAcknowledgement)
}

/// Human-readable confirmation, values highlighted in green.
pub fn format_confirmation(result: &AcknowledgeResult, state: DesiredState, user: &str) -> String {
    format!(
        "Deployment to {} environment was {} by {}\nTask: {}\nBranch: {}",
        result.environment.to_uppercase().green(),
        state.as_str().green(),
        user.green(),
        result.task.green(),
        result.git_ref.green(),
    )
}
