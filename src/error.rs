//! Error type shared by every step of the approval flow.
//!
//! Each variant maps to a process exit code so scripts can tell a missing
//! environment apart from a network failure.

/// Everything that can stop an approval run.
#[derive(Debug, thiserror::Error)]
pub enum AckError {
    /// Bad or conflicting command-line input. Raised before any network call.
    #[error("{0}")]
    Usage(String),

    /// No token could be found for the host in any ambient credential store.
    #[error("no GitHub token found for {host}. Run `gh auth login` or set GH_TOKEN")]
    MissingCredentials { host: String },

    /// The `GET user` call failed, so there is no actor to record.
    #[error("could not determine the current GitHub user")]
    IdentityLookup(#[source] Box<AckError>),

    /// The run has nothing waiting for review.
    #[error("No pending deployments found for run: {run_id}, env: {environment}")]
    NoPendingDeployments { run_id: String, environment: String },

    /// The run has pending deployments, just not for the requested environment.
    #[error(
        "--env|-e \"{environment}\" does not match the environment of the pending deployment (pending: {})",
        .available.join(", ")
    )]
    EnvironmentNotFound {
        environment: String,
        available: Vec<String>,
    },

    /// The request never produced a response.
    #[error("request to GitHub failed")]
    Transport(#[from] reqwest::Error),

    /// GitHub answered with a non-2xx status.
    #[error("HTTP {status}: {message} ({url})")]
    Api {
        status: u16,
        message: String,
        url: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The acknowledge call succeeded but returned no deployments.
    #[error("GitHub accepted the review but returned no deployments")]
    EmptyAcknowledgement,
}

impl AckError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AckError::EnvironmentNotFound { .. } => 3,
            AckError::IdentityLookup(_) => 4,
            AckError::MissingCredentials { .. } => 5,
            AckError::Usage(_)
            | AckError::NoPendingDeployments { .. }
            | AckError::Transport(_)
            | AckError::Api { .. }
            | AckError::Decode { .. }
            | AckError::EmptyAcknowledgement => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AckError>;
