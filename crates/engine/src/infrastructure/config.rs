//! Engine configuration from environment variables.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use veodirector_domain::{GenerationParameters, PollPolicy};

use crate::infrastructure::credentials::{
    ChainedCredentials, GcloudCliCredentials, MetadataServerCredentials, StaticTokenCredentials,
};
use crate::infrastructure::ports::CredentialPort;
use crate::infrastructure::storage::DEFAULT_PUBLIC_BASE;
use crate::infrastructure::vertex::VertexConfig;

pub const DEFAULT_SERVER_PORT: u16 = 3001;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            var,
            message: message.to_string(),
        }
    }
}

/// Where provider tokens come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialSource {
    /// Static token if set, then gcloud, then the metadata server
    #[default]
    Auto,
    Gcloud,
    Metadata,
    Static,
}

impl FromStr for CredentialSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "gcloud" => Ok(Self::Gcloud),
            "metadata" => Ok(Self::Metadata),
            "static" => Ok(Self::Static),
            other => Err(format!("expected auto|gcloud|metadata|static, got {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub vertex: VertexConfig,
    pub credential_source: CredentialSource,
    pub static_token: Option<String>,
    pub storage_public_base: String,
    pub generation: GenerationParameters,
    pub poll_policy: PollPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: DEFAULT_SERVER_PORT,
            vertex: VertexConfig::default(),
            credential_source: CredentialSource::Auto,
            static_token: None,
            storage_public_base: DEFAULT_PUBLIC_BASE.to_string(),
            generation: GenerationParameters::default(),
            poll_policy: PollPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let server_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(port) => port
                .parse()
                .map_err(|e| ConfigError::invalid("SERVER_PORT", e))?,
            None => defaults.server_port,
        };

        let vertex = VertexConfig {
            project_id: get("VEO_PROJECT_ID").unwrap_or(defaults.vertex.project_id),
            location: get("VEO_LOCATION").unwrap_or(defaults.vertex.location),
            model_id: get("VEO_MODEL_ID").unwrap_or(defaults.vertex.model_id),
            api_base: get("VEO_API_BASE_URL"),
            request_timeout: defaults.vertex.request_timeout,
        };

        let credential_source = match get("VEO_CREDENTIAL_SOURCE") {
            Some(source) => source
                .parse()
                .map_err(|e| ConfigError::invalid("VEO_CREDENTIAL_SOURCE", e))?,
            None => CredentialSource::Auto,
        };
        let static_token = get("VEO_ACCESS_TOKEN");
        if credential_source == CredentialSource::Static && static_token.is_none() {
            return Err(ConfigError::invalid(
                "VEO_ACCESS_TOKEN",
                "required when VEO_CREDENTIAL_SOURCE=static",
            ));
        }

        let mut poll_policy = defaults.poll_policy;
        if let Some(secs) = get("VEO_POLL_INTERVAL_SECS") {
            poll_policy.interval = Duration::from_secs(parse_u64("VEO_POLL_INTERVAL_SECS", &secs)?);
        }
        if let Some(attempts) = get("VEO_POLL_MAX_ATTEMPTS") {
            poll_policy.max_attempts = attempts
                .parse()
                .map_err(|e| ConfigError::invalid("VEO_POLL_MAX_ATTEMPTS", e))?;
        }
        if let Some(secs) = get("VEO_NOT_FOUND_GRACE_SECS") {
            poll_policy.not_found_grace =
                Duration::from_secs(parse_u64("VEO_NOT_FOUND_GRACE_SECS", &secs)?);
        }
        poll_policy
            .validate()
            .map_err(|e| ConfigError::invalid("VEO_POLL_*", e))?;

        let generation = defaults.generation;
        generation
            .validate()
            .map_err(|e| ConfigError::invalid("generation parameters", e))?;

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            vertex,
            credential_source,
            static_token,
            storage_public_base: get("VEO_STORAGE_PUBLIC_BASE")
                .unwrap_or(defaults.storage_public_base),
            generation,
            poll_policy,
        })
    }

    /// Build the credential source this configuration asks for.
    pub fn credentials(&self) -> Arc<dyn CredentialPort> {
        let token = self.static_token.clone().unwrap_or_default();
        match self.credential_source {
            CredentialSource::Static => Arc::new(StaticTokenCredentials::new(token)),
            CredentialSource::Gcloud => Arc::new(GcloudCliCredentials::new()),
            CredentialSource::Metadata => Arc::new(MetadataServerCredentials::new()),
            CredentialSource::Auto => {
                let mut sources: Vec<(&'static str, Arc<dyn CredentialPort>)> = Vec::new();
                if self.static_token.is_some() {
                    sources.push(("static", Arc::new(StaticTokenCredentials::new(token))));
                }
                sources.push(("gcloud", Arc::new(GcloudCliCredentials::new())));
                sources.push(("metadata", Arc::new(MetadataServerCredentials::new())));
                Arc::new(ChainedCredentials::new(sources))
            }
        }
    }
}

fn parse_u64(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|e| ConfigError::invalid(var, e))
}
