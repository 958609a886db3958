//! Who is submitting the review.

use crate::error::{AckError, Result};
use crate::github::GithubClient;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

/// Login of the token owner, via `GET user`.
///
/// Any failure, including an empty login, is reported as
/// [`AckError::IdentityLookup`] so the run stops before touching the
/// deployment.
pub async fn current_user(client: &GithubClient) -> Result<String> {
    let user: User = client
        .get("user")
        .await
        .map_err(|e| AckError::IdentityLookup(Box::new(e)))?;

    let login = user.login.trim().to_string();
    if login.is_empty() {
        return Err(AckError::IdentityLookup(Box::new(AckError::Decode {
            url: format!("{}/user", client.api_base()),
            reason: "empty login".to_string(),
        })));
    }
    Ok(login)
}
