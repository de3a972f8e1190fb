//! Credential sources for provider calls.
//!
//! A token is requested once per provider call; nothing is cached here.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{AccessToken, AuthError, CredentialPort};

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Fixed token from configuration.
pub struct StaticTokenCredentials {
    token: String,
}

impl StaticTokenCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialPort for StaticTokenCredentials {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(AuthError::NotConfigured { provider: "static" });
        }
        Ok(AccessToken::new(token))
    }
}

/// Token from the local `gcloud` CLI (`gcloud auth print-access-token`).
pub struct GcloudCliCredentials {
    program: String,
}

impl GcloudCliCredentials {
    pub fn new() -> Self {
        Self::with_program("gcloud")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GcloudCliCredentials {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialPort for GcloudCliCredentials {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        let output = tokio::process::Command::new(&self.program)
            .args(["auth", "print-access-token"])
            .output()
            .await
            .map_err(|e| AuthError::source_failed("gcloud", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuthError::source_failed("gcloud", stderr.trim()));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(AuthError::source_failed("gcloud", "empty token"));
        }
        Ok(AccessToken::new(token))
    }
}

/// Service identity token from the GCE / Cloud Run metadata server.
pub struct MetadataServerCredentials {
    client: Client,
    token_url: String,
}

impl MetadataServerCredentials {
    pub fn new() -> Self {
        Self::with_url(METADATA_TOKEN_URL)
    }

    pub fn with_url(token_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token_url: token_url.to_string(),
        }
    }
}

impl Default for MetadataServerCredentials {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialPort for MetadataServerCredentials {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        let response = self
            .client
            .get(&self.token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| AuthError::source_failed("metadata", e))?;

        if !response.status().is_success() {
            return Err(AuthError::source_failed(
                "metadata",
                format!("status {}", response.status()),
            ));
        }

        let body: MetadataTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::source_failed("metadata", e))?;

        if body.access_token.trim().is_empty() {
            return Err(AuthError::source_failed("metadata", "empty token"));
        }
        Ok(AccessToken::new(body.access_token))
    }
}

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
}

/// Tries each source in order; the first token wins.
pub struct ChainedCredentials {
    sources: Vec<(&'static str, Arc<dyn CredentialPort>)>,
}

impl ChainedCredentials {
    pub fn new(sources: Vec<(&'static str, Arc<dyn CredentialPort>)>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl CredentialPort for ChainedCredentials {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        let mut failures = Vec::with_capacity(self.sources.len());

        for (name, source) in &self.sources {
            match source.access_token().await {
                Ok(token) => return Ok(token),
                Err(e) => {
                    tracing::debug!(source = *name, error = %e, "Credential source failed");
                    failures.push(e.to_string());
                }
            }
        }

        tracing::error!(attempted = self.sources.len(), "No credential source succeeded");
        Err(AuthError::Exhausted(failures.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCredentialPort;
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};

    #[tokio::test]
    async fn static_token_is_returned_trimmed() {
        let token = StaticTokenCredentials::new("  ya29.token \n")
            .access_token()
            .await
            .unwrap();
        assert_eq!(token.secret(), "ya29.token");
    }

    #[tokio::test]
    async fn blank_static_token_is_not_configured() {
        let err = StaticTokenCredentials::new("   ")
            .access_token()
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotConfigured { provider: "static" }));
    }

    #[tokio::test]
    async fn missing_gcloud_binary_fails() {
        let err = GcloudCliCredentials::with_program("definitely-not-gcloud-7f3a")
            .access_token()
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SourceFailed { provider: "gcloud", .. }));
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("secret-value");
        assert!(!format!("{token:?}").contains("secret-value"));
    }

    #[tokio::test]
    async fn chain_falls_through_to_next_source() {
        let mut first = MockCredentialPort::new();
        first
            .expect_access_token()
            .times(1)
            .returning(|| Err(AuthError::source_failed("gcloud", "not installed")));
        let mut second = MockCredentialPort::new();
        second
            .expect_access_token()
            .times(1)
            .returning(|| Ok(AccessToken::new("from-metadata")));

        let chain = ChainedCredentials::new(vec![
            ("gcloud", Arc::new(first) as Arc<dyn CredentialPort>),
            ("metadata", Arc::new(second)),
        ]);

        assert_eq!(chain.access_token().await.unwrap().secret(), "from-metadata");
    }

    #[tokio::test]
    async fn chain_reports_every_failure() {
        let mut first = MockCredentialPort::new();
        first
            .expect_access_token()
            .returning(|| Err(AuthError::source_failed("gcloud", "not installed")));
        let mut second = MockCredentialPort::new();
        second
            .expect_access_token()
            .returning(|| Err(AuthError::source_failed("metadata", "unreachable")));

        let chain = ChainedCredentials::new(vec![
            ("gcloud", Arc::new(first) as Arc<dyn CredentialPort>),
            ("metadata", Arc::new(second)),
        ]);

        match chain.access_token().await.unwrap_err() {
            AuthError::Exhausted(message) => {
                assert!(message.contains("not installed"));
                assert!(message.contains("unreachable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn metadata_server_requires_flavor_header() {
        async fn token(headers: HeaderMap) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
            match headers.get("metadata-flavor").and_then(|v| v.to_str().ok()) {
                Some("Google") => Ok(Json(serde_json::json!({
                    "access_token": "meta-token",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                }))),
                _ => Err(axum::http::StatusCode::FORBIDDEN),
            }
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route("/token", get(token));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let credentials = MetadataServerCredentials::with_url(&format!("http://{addr}/token"));
        assert_eq!(credentials.access_token().await.unwrap().secret(), "meta-token");
    }
}
