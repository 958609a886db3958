//! Minimal GitHub REST client.
//!
//! One `reqwest::Client` per process, shared by every call. Paths are given
//! relative to the API root (`user`, `repos/{owner}/{repo}/...`) the same way
//! the `gh api` command takes them.

use crate::error::{AckError, Result};
use crate::github::auth::Credentials;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2022-11-28";

/// Authenticated client for one GitHub host.
pub struct GithubClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

/// GitHub's JSON error body.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GithubClient {
    /// Create a client for the host the credentials were issued for.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_base_url(api_base_for_host(&credentials.host), &credentials.token)
    }

    /// Create a client against an explicit API root (used by tests).
    pub fn with_base_url(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("gh-approve-deploy/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `GET {path}` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let response = self.request(Method::GET, &url).send().await?;
        decode(&url, response).await
    }

    /// `POST {path}` with a JSON body and decode the JSON response.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self
            .request(Method::POST, &url)
            .json(body)
            .send()
            .await?;
        decode(&url, response).await
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("token {}", self.token))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

/// REST root for a GitHub host: `api.` subdomain for github.com and
/// `*.ghe.com` tenants, `/api/v3` under the host for Enterprise Server.
pub fn api_base_for_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/').to_lowercase();
    if host == "github.com" || host == "api.github.com" {
        "https://api.github.com".to_string()
    } else if host.ends_with(".ghe.com") {
        format!("https://api.{}", host)
    } else {
        format!("https://{}/api/v3", host)
    }
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
        return Err(AckError::Api {
            status: status.as_u16(),
            message,
            url: url.to_string(),
        });
    }

    serde_json::from_str(&body).map_err(|e| AckError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
