//! Core types for the approval flow.
//!
//! `DeploymentRequest` is what the user asked for. The remaining types mirror
//! the JSON GitHub sends and expects on the pending_deployments endpoint.

use crate::error::{AckError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The review decision to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredState {
    Approved,
    Rejected,
}

impl DesiredState {
    /// Build the decision from the `--approve` / `--reject` flags.
    /// Exactly one of them must be set.
    pub fn from_flags(approve: bool, reject: bool) -> Result<Self> {
        match (approve, reject) {
            (true, false) => Ok(DesiredState::Approved),
            (false, true) => Ok(DesiredState::Rejected),
            _ => Err(AckError::Usage(
                "--approve and --reject are mutually exclusive".to_string(),
            )),
        }
    }

    /// Wire value for the `state` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredState::Approved => "approved",
            DesiredState::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated approval request, built once from command-line input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    host: Option<String>,
    repository: String,
    run_id: String,
    environment: String,
    state: DesiredState,
}

impl DeploymentRequest {
    pub fn new(
        repository: impl Into<String>,
        run_id: impl Into<String>,
        environment: impl Into<String>,
        state: DesiredState,
    ) -> Result<Self> {
        let repository = repository.into().trim().to_string();
        let run_id = run_id.into().trim().to_string();
        let environment = environment.into();

        let (host, repository) = split_repository(&repository)?;

        if run_id.is_empty() || !run_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AckError::Usage(format!(
                "--run-id|-i must be a numeric workflow run id, got \"{}\"",
                run_id
            )));
        }

        if environment.is_empty() {
            return Err(AckError::Usage(
                "--env|-e must not be empty".to_string(),
            ));
        }

        Ok(Self {
            host,
            repository,
            run_id,
            environment,
            state,
        })
    }

    /// Host from a `HOST/OWNER/REPO` repository, if one was given.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// `owner/name`, without any host prefix.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn state(&self) -> DesiredState {
        self.state
    }
}

/// Accepts `OWNER/REPO` or `HOST/OWNER/REPO`, the same forms `gh` takes.
fn split_repository(repository: &str) -> Result<(Option<String>, String)> {
    let parts: Vec<&str> = repository.split('/').collect();
    if parts.iter().all(|p| !p.is_empty()) {
        match parts.as_slice() {
            [owner, name] => return Ok((None, format!("{}/{}", owner, name))),
            [host, owner, name] => {
                return Ok((Some(host.to_lowercase()), format!("{}/{}", owner, name)))
            }
            _ => {}
        }
    }
    Err(AckError::Usage(format!(
        "--repo|-r must be in the form [HOST/]OWNER/REPO, got \"{}\"",
        repository
    )))
}

/// One entry of `GET .../pending_deployments`.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingDeployment {
    pub environment: PendingEnvironment,

    /// Whether the token owner is one of the required reviewers.
    pub current_user_can_approve: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PendingEnvironment {
    pub id: u64,
    pub name: String,
}

/// Body of `POST .../pending_deployments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcknowledgeBody {
    pub environment_ids: Vec<u64>,
    pub state: DesiredState,
    pub comment: String,
}

impl AcknowledgeBody {
    pub fn new(environment_id: u64, state: DesiredState, user: &str) -> Self {
        Self {
            environment_ids: vec![environment_id],
            state,
            comment: format!("Deployment {} by {}", state, user),
        }
    }
}

/// A deployment returned after the review was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AcknowledgeResult {
    #[serde(default)]
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub task: String,
    pub environment: String,
}
