//! Common test utilities and helpers for unwatch tests
#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use unwatch::{Config, GitHubClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "ghp_test_token";

/// Scratch directory for whitelist and config files
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn create_whitelist(&self, repos: &[&str]) -> PathBuf {
        let path = self.temp_dir.path().join("whitelist.txt");
        std::fs::write(&path, repos.join("\n")).expect("Failed to write whitelist");
        path
    }

    pub fn create_config(&self, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join("config.yml");
        std::fs::write(&path, content).expect("Failed to write test config");
        path
    }

    /// Config that talks to `server` with token auth
    pub fn create_mock_config(&self, server: &MockServer) -> PathBuf {
        self.create_config(&format!(
            "github:\n  auth_method: \"token\"\n  base_uri: \"{}\"\nlogging:\n  color: false\n",
            server.uri()
        ))
    }
}

/// Config pointing the client at a mock server
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.github.base_uri = Some(server.uri());
    config
}

pub fn mock_client(server: &MockServer) -> GitHubClient {
    GitHubClient::with_token(TEST_TOKEN.to_string(), &mock_config(server))
        .expect("Failed to build client")
}

/// Subscription listing entries, shaped like GitHub's repository objects
pub fn subscription_page(full_names: &[&str]) -> Value {
    Value::Array(
        full_names
            .iter()
            .enumerate()
            .map(|(i, full_name)| {
                let (owner, name) = full_name.split_once('/').unwrap();
                json!({
                    "id": i + 1,
                    "name": name,
                    "full_name": full_name,
                    "owner": { "login": owner },
                    "private": false
                })
            })
            .collect(),
    )
}

/// Serve `pages` as pages 1..=n of `/user/subscriptions`, then an empty page
pub async fn mount_subscription_pages(server: &MockServer, pages: &[&[&str]]) {
    for (i, page) in pages.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path("/user/subscriptions"))
            .and(query_param("page", (i + 1).to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(subscription_page(page)))
            .expect(1)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/user/subscriptions"))
        .and(query_param("page", (pages.len() + 1).to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(server)
        .await;
}

pub fn subscription_response(ignored: bool) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "subscribed": !ignored,
        "ignored": ignored,
        "reason": null,
        "created_at": "2026-10-18T00:00:00Z"
    }))
}
