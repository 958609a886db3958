//! Ambient credential lookup.
//!
//! Tokens are never stored or refreshed here. They are read from the same
//! places the `gh` CLI keeps them, in this order:
//!
//! 1. `GH_TOKEN` / `GITHUB_TOKEN` (or the `*_ENTERPRISE_TOKEN` pair for
//!    Enterprise Server hosts)
//! 2. `oauth_token` in the `gh` config `hosts.yml`
//! 3. `gh auth token --hostname <host>` (keyring-backed logins)

use crate::error::{AckError, Result};
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const DEFAULT_HOST: &str = "github.com";

/// Where a token came from. Only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Env(&'static str),
    ConfigFile(PathBuf),
    GhCli,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Env(var) => write!(f, "{}", var),
            TokenSource::ConfigFile(path) => write!(f, "{}", path.display()),
            TokenSource::GhCli => write!(f, "gh auth token"),
        }
    }
}

/// A token for one host.
#[derive(Clone)]
pub struct Credentials {
    pub host: String,
    pub token: String,
    pub source: TokenSource,
}

// Keep the token out of debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// One host entry in `hosts.yml`.
#[derive(Debug, Deserialize)]
struct HostEntry {
    #[serde(default)]
    oauth_token: Option<String>,
}

/// Resolve credentials from the process environment, the `gh` config and
/// finally the `gh` binary itself.
///
/// `host` comes from a `HOST/OWNER/REPO` repository and beats `GH_HOST`.
pub fn resolve_credentials(host: Option<&str>) -> Result<Credentials> {
    let env = |key: &str| std::env::var(key).ok();
    let host = match host {
        Some(host) => host.to_string(),
        None => host_from_env(&env),
    };

    if let Some(credentials) = lookup_stored(&host, &env) {
        tracing::debug!("Using token for {} from {}", host, credentials.source);
        return Ok(credentials);
    }

    if let Some(token) = token_from_gh_cli(&host) {
        tracing::debug!("Using token for {} from gh auth token", host);
        return Ok(Credentials {
            host,
            token,
            source: TokenSource::GhCli,
        });
    }

    Err(AckError::MissingCredentials { host })
}

/// The target host: `GH_HOST` if set, otherwise github.com.
pub fn host_from_env(env: &impl Fn(&str) -> Option<String>) -> String {
    non_empty(env("GH_HOST")).unwrap_or_else(|| DEFAULT_HOST.to_string())
}

/// Look for a token in environment variables, then in `hosts.yml`.
pub fn lookup_stored(host: &str, env: &impl Fn(&str) -> Option<String>) -> Option<Credentials> {
    if let Some((var, token)) = token_from_env(host, env) {
        return Some(Credentials {
            host: host.to_string(),
            token,
            source: TokenSource::Env(var),
        });
    }

    let path = config_dir(env)?.join("hosts.yml");
    match token_from_hosts_file(&path, host) {
        Ok(Some(token)) => Some(Credentials {
            host: host.to_string(),
            token,
            source: TokenSource::ConfigFile(path),
        }),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("Skipping gh config: {:#}", e);
            None
        }
    }
}

/// Hosts served by github.com infrastructure use the plain token variables.
fn is_github_hosted(host: &str) -> bool {
    let host = host.to_lowercase();
    host == DEFAULT_HOST || host.ends_with(".ghe.com")
}

fn token_from_env(
    host: &str,
    env: &impl Fn(&str) -> Option<String>,
) -> Option<(&'static str, String)> {
    let vars: [&'static str; 2] = if is_github_hosted(host) {
        ["GH_TOKEN", "GITHUB_TOKEN"]
    } else {
        ["GH_ENTERPRISE_TOKEN", "GITHUB_ENTERPRISE_TOKEN"]
    };

    vars.iter()
        .find_map(|var| non_empty(env(*var)).map(|token| (*var, token)))
}

/// `GH_CONFIG_DIR`, then `$XDG_CONFIG_HOME/gh`, then `~/.config/gh`.
fn config_dir(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(dir) = non_empty(env("GH_CONFIG_DIR")) {
        return Some(PathBuf::from(dir));
    }
    if let Some(dir) = non_empty(env("XDG_CONFIG_HOME")) {
        return Some(PathBuf::from(dir).join("gh"));
    }
    if cfg!(windows) {
        if let Some(dir) = non_empty(env("AppData")) {
            return Some(PathBuf::from(dir).join("GitHub CLI"));
        }
    }
    dirs::home_dir().map(|home| home.join(".config").join("gh"))
}

fn token_from_hosts_file(path: &Path, host: &str) -> anyhow::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let hosts: HashMap<String, HostEntry> = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(hosts
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(host))
        .and_then(|(_, entry)| non_empty(entry.oauth_token)))
}

fn token_from_gh_cli(host: &str) -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(out) if out.status.success() => {
            non_empty(Some(String::from_utf8_lossy(&out.stdout).to_string()))
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("gh CLI not available: {}", e);
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
