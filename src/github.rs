use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::ErrorKind;
use std::process::Command;
use tracing::{debug, info, warn};

use crate::api::SubscriptionApi;
use crate::config::Config;
use crate::repo::RepoId;

/// Environment variables checked for a token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["PAT_TOKEN", "GITHUB_TOKEN"];

/// GitHub client wrapper with authentication management
pub struct GitHubClient {
    client: Octocrab,
}

/// GitHub authentication strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Use GitHub CLI authentication
    GitHubCLI,
    /// Use environment variable token
    EnvironmentToken,
}

/// Query parameters for `GET /user/subscriptions`
#[derive(Debug, Serialize)]
struct PageParams {
    page: u32,
    per_page: u8,
}

/// The part of a subscription listing entry we read
#[derive(Debug, Deserialize)]
struct WatchedRepo {
    full_name: RepoId,
}

/// Body for `PUT /repos/{owner}/{repo}/subscription`
#[derive(Debug, Serialize)]
struct SubscriptionUpdate {
    subscribed: bool,
    ignored: bool,
}

impl SubscriptionUpdate {
    const IGNORE: Self = Self {
        subscribed: false,
        ignored: true,
    };
}

impl GitHubClient {
    /// Create a new GitHub client with automatic authentication
    ///
    /// No request is made here; a missing credential fails before any
    /// network traffic.
    pub fn new(config: &Config) -> Result<Self> {
        let (auth_strategy, token) = Self::detect_authentication(config)?;

        info!("Using authentication strategy: {:?}", auth_strategy);

        Self::with_token(token, config)
    }

    /// Create a client for an already known token
    ///
    /// octocrab sends its own `X-GitHub-Api-Version` header on every request.
    pub fn with_token(token: String, config: &Config) -> Result<Self> {
        let mut builder = Octocrab::builder();

        if let Some(base_uri) = &config.github.base_uri {
            debug!("Using GitHub API at {}", base_uri);
            builder = builder
                .base_uri(base_uri.clone())
                .with_context(|| format!("Invalid GitHub base URI: {}", base_uri))?;
        }

        let client = builder
            .personal_token(token)
            .build()
            .context("Failed to create GitHub client")?;

        Ok(Self { client })
    }

    /// Detect and obtain GitHub authentication
    fn detect_authentication(config: &Config) -> Result<(AuthStrategy, String)> {
        match config.github.auth_method.as_str() {
            "auto" => {
                // Environment token first, then GitHub CLI
                if let Ok(token) = Self::try_environment_token() {
                    Ok((AuthStrategy::EnvironmentToken, token))
                } else if let Ok(token) = Self::try_github_cli() {
                    Ok((AuthStrategy::GitHubCLI, token))
                } else {
                    Err(anyhow!(
                        "No GitHub authentication found. Please either:\n\
                         1. Set the PAT_TOKEN (or GITHUB_TOKEN) environment variable\n\
                         2. Install and authenticate GitHub CLI: gh auth login"
                    ))
                }
            }
            "gh_cli" => {
                let token = Self::try_github_cli()
                    .context("GitHub CLI authentication failed. Run: gh auth login")?;
                Ok((AuthStrategy::GitHubCLI, token))
            }
            "token" => {
                let token = Self::try_environment_token()
                    .context("Please provide the PAT_TOKEN (or GITHUB_TOKEN) environment variable")?;
                Ok((AuthStrategy::EnvironmentToken, token))
            }
            other => Err(anyhow!("Unknown auth method: {}", other)),
        }
    }

    /// Try to get token from `gh auth token`
    fn try_github_cli() -> Result<String> {
        debug!("Attempting GitHub CLI authentication");

        let output = match Command::new("gh").args(["auth", "token"]).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                bail!("GitHub CLI (gh) is not installed")
            }
            Err(e) => return Err(e).context("Failed to run gh auth token"),
        };

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || token.is_empty() {
            bail!(
                "gh auth token returned no token: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(token)
    }

    /// Try to get token from environment variables
    fn try_environment_token() -> Result<String> {
        debug!("Attempting environment variable authentication");

        let (var, token) = TOKEN_ENV_VARS
            .iter()
            .find_map(|&var| {
                env::var(var)
                    .ok()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .map(|t| (var, t))
            })
            .ok_or_else(|| anyhow!("Neither PAT_TOKEN nor GITHUB_TOKEN is set"))?;

        if !looks_like_github_token(&token) {
            warn!(
                "{} doesn't look like a valid GitHub token \
                 (should start with ghp_, github_pat_, gho_, or ghs_)",
                var
            );
        }

        debug!("Successfully found {} environment variable", var);
        Ok(token)
    }
}

fn looks_like_github_token(token: &str) -> bool {
    ["ghp_", "github_pat_", "gho_", "ghs_", "ghu_"]
        .iter()
        .any(|prefix| token.starts_with(prefix))
}

#[async_trait]
impl SubscriptionApi for GitHubClient {
    async fn list_subscriptions(&self, page: u32, per_page: u8) -> Result<Vec<RepoId>> {
        let repos: Vec<WatchedRepo> = self
            .client
            .get("/user/subscriptions", Some(&PageParams { page, per_page }))
            .await
            .with_context(|| format!("GET /user/subscriptions page {} failed", page))?;

        Ok(repos.into_iter().map(|r| r.full_name).collect())
    }

    async fn ignore_repo(&self, owner: &str, name: &str) -> Result<()> {
        let route = format!("/repos/{}/{}/subscription", owner, name);

        let _: serde_json::Value = self
            .client
            .put(&route, Some(&SubscriptionUpdate::IGNORE))
            .await
            .with_context(|| format!("PUT {} failed", route))?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "GitHub"
    }
}
