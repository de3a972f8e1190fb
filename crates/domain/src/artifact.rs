//! Generated video artifacts.
//!
//! A succeeded operation carries either inline base64 bytes or a storage
//! locator (`scheme://bucket/path`). [`Materializer`] turns the provider
//! payload into an [`ExtractedArtifact`]; once a locator has been resolved to
//! a fetchable URI the result becomes an immutable [`ArtifactDescriptor`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use thiserror::Error;

use crate::operation::SucceededPayload;

/// Mime type assumed when the provider does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "video/mp4";

/// A succeeded payload that cannot produce an artifact. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MaterializeError {
    #[error("Malformed storage locator: {locator} ({reason})")]
    MalformedLocator { locator: String, reason: &'static str },

    #[error("Operation succeeded but carried no video data")]
    NoArtifact,

    #[error("Inline video data is not valid base64: {0}")]
    InvalidInlineData(String),
}

/// Address of an object in a blob store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocator {
    scheme: String,
    bucket: String,
    path: String,
}

impl StorageLocator {
    /// Strictly decompose `scheme://bucket/path`.
    pub fn parse(locator: &str) -> Result<Self, MaterializeError> {
        let malformed = |reason| MaterializeError::MalformedLocator {
            locator: locator.to_string(),
            reason,
        };

        if locator.chars().any(char::is_whitespace) {
            return Err(malformed("contains whitespace"));
        }

        let (scheme, rest) = locator
            .split_once("://")
            .ok_or_else(|| malformed("missing scheme separator"))?;

        let mut scheme_chars = scheme.chars();
        match scheme_chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => return Err(malformed("scheme must start with a letter")),
        }
        if !scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
            return Err(malformed("invalid scheme character"));
        }

        let (bucket, path) = rest
            .split_once('/')
            .ok_or_else(|| malformed("missing object path"))?;
        if bucket.is_empty() {
            return Err(malformed("empty bucket"));
        }
        if path.is_empty() {
            return Err(malformed("empty object path"));
        }
        if path.split('/').any(str::is_empty) {
            return Err(malformed("empty path segment"));
        }

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            bucket: bucket.to_string(),
            path: path.to_string(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.path)
    }
}

/// Artifact pulled out of a succeeded payload, before any URI resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedArtifact {
    Inline { bytes: Vec<u8>, mime_type: String },
    Stored { locator: StorageLocator, mime_type: String },
}

/// Pure extraction of the first produced video.
pub struct Materializer;

impl Materializer {
    pub fn extract(payload: &SucceededPayload) -> Result<ExtractedArtifact, MaterializeError> {
        let sample = payload.samples.first().ok_or(MaterializeError::NoArtifact)?;
        let mime_type = sample
            .mime_type
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        if let Some(encoded) = sample.inline_base64.as_deref().filter(|s| !s.is_empty()) {
            let bytes = STANDARD
                .decode(encoded)
                .map_err(|e| MaterializeError::InvalidInlineData(e.to_string()))?;
            return Ok(ExtractedArtifact::Inline { bytes, mime_type });
        }

        if let Some(locator) = sample.locator.as_deref().filter(|s| !s.is_empty()) {
            let locator = StorageLocator::parse(locator)?;
            return Ok(ExtractedArtifact::Stored { locator, mime_type });
        }

        Err(MaterializeError::NoArtifact)
    }
}

/// The produced video in a form a renderer can use directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Inline {
        bytes: Vec<u8>,
        mime_type: String,
    },
    Reference {
        locator: StorageLocator,
        uri: String,
        mime_type: String,
    },
}

impl Artifact {
    pub fn mime_type(&self) -> &str {
        match self {
            Artifact::Inline { mime_type, .. } | Artifact::Reference { mime_type, .. } => mime_type,
        }
    }

    /// `data:` URI for inline artifacts.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            Artifact::Inline { bytes, mime_type } => {
                Some(format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)))
            }
            Artifact::Reference { .. } => None,
        }
    }
}

/// Terminal value of the pipeline. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub artifact: Artifact,
    pub duration_seconds: u32,
    pub resolution: String,
}
