//! Maps an environment name to the id GitHub needs.
//!
//! Entries are scanned in the order the API returns them and the first exact,
//! case-sensitive name match wins.

use crate::deploy::types::PendingDeployment;
use crate::error::{AckError, Result};
use crate::github::GithubClient;

/// API path for the pending deployments of a run. Shared by the read and the
/// acknowledge call.
pub fn pending_deployments_path(repository: &str, run_id: &str) -> String {
    format!("repos/{}/actions/runs/{}/pending_deployments", repository, run_id)
}

/// Fetch the pending deployments of a run and return the id of `environment`.
pub async fn resolve_environment_id(
    client: &GithubClient,
    repository: &str,
    run_id: &str,
    environment: &str,
) -> Result<u64> {
    let pending: Vec<PendingDeployment> = client
        .get(&pending_deployments_path(repository, run_id))
        .await?;

    tracing::debug!("{} pending deployment(s) on run {}", pending.len(), run_id);

    let matched = find_environment(&pending, run_id, environment)?;
    if matched.current_user_can_approve == Some(false) {
        tracing::warn!(
            "GitHub reports you are not a required reviewer for {}; the review may be refused",
            environment
        );
    }
    Ok(matched.environment.id)
}

/// Pick the entry for `environment` out of an already fetched list.
pub fn find_environment<'a>(
    pending: &'a [PendingDeployment],
    run_id: &str,
    environment: &str,
) -> Result<&'a PendingDeployment> {
    if pending.is_empty() {
        return Err(AckError::NoPendingDeployments {
            run_id: run_id.to_string(),
            environment: environment.to_string(),
        });
    }

    pending
        .iter()
        .find(|p| p.environment.name == environment)
        .ok_or_else(|| AckError::EnvironmentNotFound {
            environment: environment.to_string(),
            available: pending.iter().map(|p| p.environment.name.clone()).collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::types::PendingEnvironment;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pending(id: u64, name: &str) -> PendingDeployment {
        PendingDeployment {
            environment: PendingEnvironment {
                id,
                name: name.to_string(),
            },
            current_user_can_approve: Some(true),
        }
    }

    #[test]
    fn test_finds_matching_environment() {
        let list = vec![pending(7, "staging"), pending(42, "production")];
        let found = find_environment(&list, "1", "production").unwrap();
        assert_eq!(found.environment.id, 42);
    }

    #[test]
    fn test_first_match_wins() {
        let list = vec![pending(1, "production"), pending(2, "production")];
        assert_eq!(find_environment(&list, "1", "production").unwrap().environment.id, 1);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let list = vec![pending(42, "production")];
        assert!(matches!(
            find_environment(&list, "1", "Production"),
            Err(AckError::EnvironmentNotFound { .. })
        ));
    }

    #[test]
    fn test_absent_environment_is_an_error() {
        let list = vec![pending(42, "production")];
        match find_environment(&list, "1", "staging") {
            Err(AckError::EnvironmentNotFound { environment, available }) => {
                assert_eq!(environment, "staging");
                assert_eq!(available, vec!["production".to_string()]);
            }
            other => panic!("expected EnvironmentNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_list_is_no_pending() {
        assert!(matches!(
            find_environment(&[], "99", "production"),
            Err(AckError::NoPendingDeployments { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_against_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/actions/runs/1234/pending_deployments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"environment": {"id": 42, "name": "production"}, "current_user_can_approve": false}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClient::with_base_url(server.uri(), "t").unwrap();
        let id = resolve_environment_id(&client, "octo/app", "1234", "production")
            .await
            .unwrap();
        assert_eq!(id, 42);
    }
}
